//! Error types for the library layer.

use thiserror::Error;
use ustrade_api::types::{Flow, PeriodError, YearMonth};

use crate::countries::CountryField;
use crate::normalize::NormalizeError;
use crate::reference::ReferenceDataError;

/// Errors produced by the library layer, wrapping upstream API errors and
/// adding identifier resolution and input failures.
#[derive(Error, Debug)]
pub enum UsTradeError {
    /// No country matched the input as ISO2, name, or code.
    #[error("Unknown country: '{input}'{}", did_you_mean(.suggestion))]
    UnknownCountry {
        input: String,
        suggestion: Option<String>,
    },
    /// A keyed country lookup missed.
    #[error("No country with {key} '{value}'")]
    CountryNotFound { key: CountryField, value: String },
    /// The HS code is not in the reference set.
    #[error("HS code '{code}' not found{}", did_you_mean(.suggestion))]
    CodeNotFound {
        code: String,
        suggestion: Option<String>,
    },
    /// User-provided input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A period query came back without any rows.
    #[error("No {flow} data returned for {start} to {end}")]
    EmptyResult {
        flow: Flow,
        start: YearMonth,
        end: YearMonth,
    },
    /// An error from the underlying API client.
    #[error("API error: {0}")]
    Api(#[from] ustrade_api::Error),
    #[error(transparent)]
    Reference(#[from] ReferenceDataError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl From<PeriodError> for UsTradeError {
    fn from(e: PeriodError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{}'?", s),
        None => String::new(),
    }
}
