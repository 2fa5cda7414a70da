//! Library layer for ustrade: reference data, identifier resolution and
//! normalized trade tables.
//!
//! Wraps the `ustrade_api` crate with a country index, an HS code tree with
//! description search, and a normalizer that renames the imports and exports
//! endpoints' fields to one schema.

pub mod client;
pub mod codes;
pub mod config;
pub mod countries;
pub mod error;
pub mod normalize;
pub mod reference;

pub use ustrade_api;
pub use ustrade_api::types;
pub use ustrade_api::types::{Flow, Period, YearMonth};
pub use ustrade_api::{Query, TradeQuery};

pub use client::TradeClient;
pub use codes::{CodeMatch, CodeRef, CodeTree, HsCode, SearchMode};
pub use config::Config;
pub use countries::{Country, CountryField, CountryIndex, CountryRef};
pub use error::UsTradeError;
pub use normalize::{normalize, Column, NormalizeError, TradeRecord, TradeTable};
pub use reference::ReferenceDataError;
