//! Shared query infrastructure: the [`Query`] trait and the parameter names
//! understood by the international trade endpoints.

use url::Url;

/// Comma-separated list of fields the API should return.
pub const PARAM_GET: &str = "get";
/// Census country code filter. Repeated once per country.
pub const PARAM_COUNTRY: &str = "CTY_CODE";
pub const PARAM_YEAR: &str = "YEAR";
pub const PARAM_MONTH: &str = "MONTH";
/// Range filter, formatted `from YYYY-MM to YYYY-MM`.
pub const PARAM_TIME: &str = "time";
/// Optional API key.
pub const PARAM_KEY: &str = "key";

/// Trait implemented by query builders. A query knows the endpoint path it
/// targets and the ordered parameter pairs it sends.
pub trait Query {
    /// Endpoint path relative to the API host, starting with `/`.
    fn endpoint(&self) -> String;

    /// Ordered query parameters. Keys may repeat.
    fn params(&self) -> Vec<(String, String)>;

    /// Appends this query's parameters to the given URL, returning the modified URL.
    fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        for (key, value) in self.params() {
            url.query_pairs_mut().append_pair(&key, &value);
        }
        url
    }
}
