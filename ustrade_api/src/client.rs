//! HTTP client for the Census international trade time-series API.

use std::time::Duration;

use url::Url;

use crate::{
    query::{Query, PARAM_KEY},
    types::RawTable,
    Error,
};

/// Default host of the Census data API.
pub const DEFAULT_BASE_URL: &str = "https://api.census.gov";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the Census international trade API.
///
/// Each request builds a fresh `reqwest::Client` with the configured timeout.
/// No retries, pagination or caching happen here.
#[derive(Clone, Debug)]
pub struct Client {
    /// Base URL for the API. Defaults to `https://api.census.gov`.
    base_api_url: String,
    timeout: Duration,
    api_key: Option<String>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production Census API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends `key=<api_key>` with every request.
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The exact URL a query is sent to.
    pub fn url_for(&self, query: &impl Query) -> Result<Url, Error> {
        let url = Url::parse(format!("{}{}", &self.base_api_url, query.endpoint()).as_str())
            .map_err(|e| {
                tracing::error!("Invalid URL constructed: {}", e);
                Error::InvalidUrl(e.to_string())
            })?;
        let mut url = query.add_to_url(&url);
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair(PARAM_KEY, key);
        }
        Ok(url)
    }

    fn http_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .user_agent(concat!("ustrade/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::Network(e)
            })
    }

    /// Fetches the table answered for `query`.
    ///
    /// Transport failures and non-success statuses are returned as is. A
    /// success whose body cannot be decoded (including the empty body the API
    /// sends when no data matches) is [`Error::UndecodablePayload`].
    pub async fn fetch(&self, query: &impl Query) -> Result<RawTable, Error> {
        let url = self.url_for(query)?;
        tracing::debug!("GET {}", url);
        let resp = self
            .http_client()?
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get resource: {}", e);
                Error::Network(e)
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Network(e)
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        let table = RawTable::from_json(&body).map_err(|e| {
            tracing::debug!("Undecodable payload: {} | body: {}", e, truncate_body(&body));
            e
        })?;
        tracing::debug!("Received {} rows", table.rows.len());
        Ok(table)
    }

    /// Whether the API host answers at all. Any HTTP response counts,
    /// whatever its status.
    pub async fn is_reachable(&self) -> Result<bool, Error> {
        let client = self.http_client()?;
        match client.head(&self.base_api_url).send().await {
            Ok(resp) => {
                tracing::debug!("{} answered {}", self.base_api_url, resp.status());
                Ok(true)
            }
            Err(e) => {
                tracing::debug!("{} unreachable: {}", self.base_api_url, e);
                Ok(false)
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TradeQuery;

    #[test]
    fn test_url_for_appends_key_last() {
        let client = Client::with_base_url("https://example.com/").with_api_key("secret");
        let url = client
            .url_for(&TradeQuery::exports().with_country("2010"))
            .unwrap();
        assert_eq!(url.path(), "/data/timeseries/intltrade/exports/hs");
        let last = url.query_pairs().last().unwrap();
        assert_eq!(last.0, "key");
        assert_eq!(last.1, "secret");
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short"), "short");
        let long = "é".repeat(1500);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("...[truncated]"));
        assert!(truncated.len() < long.len());
    }
}
