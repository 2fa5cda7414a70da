//! High-level trade client: identifier resolution, query building and
//! response normalization around the low-level API client.

use ustrade_api::types::{Flow, Period};
use ustrade_api::{Client, TradeQuery};

use crate::codes::{CodeMatch, CodeRef, CodeTree, HsCode, SearchMode};
use crate::config::Config;
use crate::countries::{Country, CountryField, CountryIndex, CountryRef};
use crate::error::UsTradeError;
use crate::normalize::{normalize, TradeTable};
use crate::reference;

/// Resolves countries and HS codes against the reference tables, then fetches
/// and normalizes trade data.
///
/// Reference indexes are read-only after construction, so one client can be
/// shared across tasks by reference or behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TradeClient {
    api: Client,
    countries: CountryIndex,
    codes: CodeTree,
}

impl TradeClient {
    /// Client for the production API with the bundled reference data.
    pub fn new() -> Result<Self, UsTradeError> {
        Self::with_base_url(ustrade_api::DEFAULT_BASE_URL)
    }

    /// Same as [`TradeClient::new`] against a custom base URL. Used for testing.
    pub fn with_base_url(base_url: &str) -> Result<Self, UsTradeError> {
        Ok(Self::with_parts(
            Client::with_base_url(base_url),
            CountryIndex::bundled()?,
            CodeTree::bundled()?,
        ))
    }

    /// Builds the API client from `config` and loads reference tables from
    /// the configured paths, falling back to the bundled tables.
    pub fn from_config(config: &Config) -> Result<Self, UsTradeError> {
        let countries = match &config.countries_csv {
            Some(path) => CountryIndex::new(reference::read_countries_file(path)?)?,
            None => CountryIndex::bundled()?,
        };
        let codes = match &config.hs_codes_csv {
            Some(path) => CodeTree::build(reference::read_hs_codes_file(path)?)?,
            None => CodeTree::bundled()?,
        };
        tracing::debug!(
            "Loaded {} countries and {} HS codes",
            countries.len(),
            codes.len()
        );
        Ok(Self::with_parts(config.api_client(), countries, codes))
    }

    pub fn with_parts(api: Client, countries: CountryIndex, codes: CodeTree) -> Self {
        Self {
            api,
            countries,
            codes,
        }
    }

    pub fn api(&self) -> &Client {
        &self.api
    }

    pub fn countries(&self) -> &CountryIndex {
        &self.countries
    }

    pub fn codes(&self) -> &CodeTree {
        &self.codes
    }

    // Countries

    pub fn get_country_by_name(&self, name: &str) -> Result<&Country, UsTradeError> {
        self.countries.by_name(name)
    }

    pub fn get_country_by_code(&self, code: &str) -> Result<&Country, UsTradeError> {
        self.countries.by_code(code)
    }

    pub fn get_country_by_iso2(&self, iso2: &str) -> Result<&Country, UsTradeError> {
        self.countries.by_iso2(iso2)
    }

    /// Resolves a name, ISO2 or code to the requested field of the country.
    pub fn resolve_country<'c>(
        &self,
        input: impl Into<CountryRef<'c>>,
        field: CountryField,
    ) -> Result<String, UsTradeError> {
        self.countries.resolve(input.into(), field)
    }

    // HS codes

    pub fn get_desc_from_code<'c>(&self, code: impl Into<CodeRef<'c>>) -> Result<&str, UsTradeError> {
        self.codes.description_of(code.into())
    }

    pub fn get_product<'c>(&self, code: impl Into<CodeRef<'c>>) -> Result<&HsCode, UsTradeError> {
        self.codes.get(code.into())
    }

    /// Codes directly below `code`, in load order.
    pub fn get_children_codes<'c>(
        &self,
        code: impl Into<CodeRef<'c>>,
    ) -> Result<Vec<String>, UsTradeError> {
        Ok(self.codes.children_of(code.into())?.to_vec())
    }

    /// Codes directly below `code` with their descriptions.
    pub fn get_children_descriptions<'c>(
        &self,
        code: impl Into<CodeRef<'c>>,
    ) -> Result<Vec<CodeMatch>, UsTradeError> {
        self.codes.children_with_descriptions(code.into())
    }

    pub fn search_for_code<S: AsRef<str>>(
        &self,
        terms: &[S],
        mode: SearchMode,
        scope: Option<CodeRef<'_>>,
    ) -> Result<Vec<CodeMatch>, UsTradeError> {
        self.codes.search(terms, mode, scope)
    }

    // Trade data

    /// Resolves every country to its Census code and checks every product
    /// against the code tree before building the query.
    pub fn build_query(
        &self,
        countries: &[CountryRef<'_>],
        products: &[CodeRef<'_>],
        flow: Flow,
        period: Period,
    ) -> Result<TradeQuery, UsTradeError> {
        if let Period::Range { start, end } = period {
            Period::range(start, end)?;
        }
        let countries = countries
            .iter()
            .map(|country| self.countries.resolve(*country, CountryField::Code))
            .collect::<Result<Vec<_>, _>>()?;
        let products = products
            .iter()
            .map(|product| self.codes.query_code(*product))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TradeQuery::new(flow)
            .with_countries(&countries)
            .with_commodities(&products)
            .with_period(period))
    }

    /// Fetches and normalizes one flow for any number of countries and
    /// products.
    ///
    /// When the API answers with no rows (no decodable payload, or a header
    /// alone), a single-month query yields an empty table and a range query
    /// fails with [`UsTradeError::EmptyResult`].
    pub async fn get_flow(
        &self,
        countries: &[CountryRef<'_>],
        products: &[CodeRef<'_>],
        flow: Flow,
        period: Period,
    ) -> Result<TradeTable, UsTradeError> {
        let query = self.build_query(countries, products, flow, period)?;
        let raw = match self.api.fetch(&query).await {
            Ok(raw) => Some(raw),
            Err(ustrade_api::Error::UndecodablePayload(reason)) => {
                tracing::debug!("No decodable {} payload: {}", flow, reason);
                None
            }
            Err(e) => return Err(e.into()),
        };

        match (raw, period) {
            (Some(raw), _) if !raw.is_empty() => Ok(normalize(&raw, flow)?),
            (_, Period::Range { start, end }) => {
                Err(UsTradeError::EmptyResult { flow, start, end })
            }
            (Some(raw), Period::Month(_)) => Ok(normalize(&raw, flow)?),
            (None, Period::Month(month)) => {
                tracing::debug!("No {} data for {}", flow, month);
                Ok(TradeTable::empty(flow))
            }
        }
    }

    /// Imports for one country and product in a `YYYY-MM` month.
    pub async fn get_imports<'a>(
        &self,
        country: impl Into<CountryRef<'a>>,
        product: impl Into<CodeRef<'a>>,
        month: &str,
    ) -> Result<TradeTable, UsTradeError> {
        let period = Period::parse_month(month)?;
        self.get_flow(&[country.into()], &[product.into()], Flow::Imports, period)
            .await
    }

    /// Exports for one country and product in a `YYYY-MM` month.
    pub async fn get_exports<'a>(
        &self,
        country: impl Into<CountryRef<'a>>,
        product: impl Into<CodeRef<'a>>,
        month: &str,
    ) -> Result<TradeTable, UsTradeError> {
        let period = Period::parse_month(month)?;
        self.get_flow(&[country.into()], &[product.into()], Flow::Exports, period)
            .await
    }

    /// Imports between two `YYYY-MM` months, inclusive.
    pub async fn get_imports_on_period<'a>(
        &self,
        country: impl Into<CountryRef<'a>>,
        product: impl Into<CodeRef<'a>>,
        start: &str,
        end: &str,
    ) -> Result<TradeTable, UsTradeError> {
        let period = Period::parse_range(start, end)?;
        self.get_flow(&[country.into()], &[product.into()], Flow::Imports, period)
            .await
    }

    /// Exports between two `YYYY-MM` months, inclusive.
    pub async fn get_exports_on_period<'a>(
        &self,
        country: impl Into<CountryRef<'a>>,
        product: impl Into<CodeRef<'a>>,
        start: &str,
        end: &str,
    ) -> Result<TradeTable, UsTradeError> {
        let period = Period::parse_range(start, end)?;
        self.get_flow(&[country.into()], &[product.into()], Flow::Exports, period)
            .await
    }

    /// Whether the API host answers at all.
    pub async fn is_reachable(&self) -> Result<bool, UsTradeError> {
        Ok(self.api.is_reachable().await?)
    }
}
