//! Low-level client for the U.S. Census international trade time-series API.
//!
//! Builds `imports`/`exports` HS queries and decodes the API's
//! array-of-arrays payload into a [`types::RawTable`].

mod client;
mod errors;
mod query;
pub mod types;
pub use self::client::{Client, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use self::errors::Error;
pub use self::query::{
    Query, TradeQuery, PARAM_COUNTRY, PARAM_GET, PARAM_KEY, PARAM_MONTH, PARAM_TIME, PARAM_YEAR,
};
