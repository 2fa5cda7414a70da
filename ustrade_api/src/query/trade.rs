use crate::types::{Flow, Period, YearMonth};

use super::common::{Query, PARAM_COUNTRY, PARAM_GET, PARAM_MONTH, PARAM_TIME, PARAM_YEAR};

/// Query against `/data/timeseries/intltrade/{imports|exports}/hs`.
///
/// Country and commodity values are sent as given, so they must already be
/// canonical Census country codes and HS codes. Resolution from names and
/// ISO codes happens one layer up.
#[derive(Clone, Debug, PartialEq)]
pub struct TradeQuery {
    pub flow: Flow,
    pub countries: Vec<String>,
    pub commodities: Vec<String>,
    pub period: Option<Period>,
}

impl TradeQuery {
    pub fn new(flow: Flow) -> Self {
        Self {
            flow,
            countries: Vec::new(),
            commodities: Vec::new(),
            period: None,
        }
    }

    pub fn imports() -> Self {
        Self::new(Flow::Imports)
    }

    pub fn exports() -> Self {
        Self::new(Flow::Exports)
    }

    pub fn with_country(mut self, country: &str) -> Self {
        self.countries.push(country.to_string());
        self
    }
    pub fn with_countries(mut self, countries: &[String]) -> Self {
        self.countries.extend_from_slice(countries);
        self
    }

    pub fn with_commodity(mut self, commodity: &str) -> Self {
        self.commodities.push(commodity.to_string());
        self
    }
    pub fn with_commodities(mut self, commodities: &[String]) -> Self {
        self.commodities.extend_from_slice(commodities);
        self
    }

    /// Restricts the query to one month. Replaces any range set earlier.
    pub fn with_month(mut self, month: YearMonth) -> Self {
        self.period = Some(Period::Month(month));
        self
    }

    /// Restricts the query to an inclusive range. Replaces any month set earlier.
    pub fn with_range(mut self, start: YearMonth, end: YearMonth) -> Self {
        self.period = Some(Period::Range { start, end });
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = Some(period);
        self
    }

    /// Fields requested through the `get` parameter.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = vec![
            PARAM_COUNTRY,
            "CTY_NAME",
            self.flow.commodity_field(),
            self.flow.commodity_desc_field(),
        ];
        fields.extend_from_slice(self.flow.value_fields());
        fields
    }
}

impl Query for TradeQuery {
    fn endpoint(&self) -> String {
        format!("/data/timeseries/intltrade/{}/hs", self.flow.path_segment())
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![(PARAM_GET.to_string(), self.fields().join(","))];
        for commodity in self.commodities.iter() {
            params.push((self.flow.commodity_field().to_string(), commodity.clone()));
        }
        for country in self.countries.iter() {
            params.push((PARAM_COUNTRY.to_string(), country.clone()));
        }
        match self.period {
            Some(Period::Month(month)) => {
                params.push((PARAM_YEAR.to_string(), month.year().to_string()));
                params.push((PARAM_MONTH.to_string(), format!("{:02}", month.month())));
            }
            Some(Period::Range { start, end }) => {
                params.push((PARAM_TIME.to_string(), format!("from {} to {}", start, end)));
            }
            None => {}
        }
        params
    }
}
