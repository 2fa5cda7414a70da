//! Reference data loading.
//!
//! Country and HS code tables ship with the crate as CSV seed files embedded at
//! compile time with `include_str!`. The same formats can also be read from
//! disk to swap in a fuller or newer table.

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::codes::HsCode;
use crate::countries::Country;

/// Bundled country table: `code,name,iso2`.
pub const BUNDLED_COUNTRIES: &str = include_str!("../../seed_data/countries.csv");

/// Bundled HS code table: `section,hscode,description,parent,level`.
pub const BUNDLED_HS_CODES: &str = include_str!("../../seed_data/harmonized-system.csv");

/// Errors raised while loading or indexing reference data.
#[derive(Error, Debug)]
pub enum ReferenceDataError {
    #[error("Failed to parse reference CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Duplicate country {field} in reference data: {value}")]
    DuplicateCountry { field: &'static str, value: String },
    #[error("Duplicate HS code in reference data: {0}")]
    DuplicateCode(String),
    #[error("HS code {code} refers to unknown parent {parent}")]
    UnknownParent { code: String, parent: String },
    #[error("HS code {code} is not reachable from any root (parent cycle)")]
    Cycle { code: String },
}

fn read_records<T, R>(reader: R) -> Result<Vec<T>, ReferenceDataError>
where
    T: DeserializeOwned,
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

fn open(path: &Path) -> Result<std::fs::File, ReferenceDataError> {
    std::fs::File::open(path).map_err(|source| ReferenceDataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse country records from CSV content.
pub fn parse_countries(csv_content: &str) -> Result<Vec<Country>, ReferenceDataError> {
    read_records(csv_content.as_bytes())
}

/// Parse HS code records from CSV content. Extra columns are ignored.
pub fn parse_hs_codes(csv_content: &str) -> Result<Vec<HsCode>, ReferenceDataError> {
    read_records(csv_content.as_bytes())
}

pub fn read_countries_file(path: &Path) -> Result<Vec<Country>, ReferenceDataError> {
    let countries = read_records(open(path)?)?;
    tracing::debug!("Loaded {} countries from {}", countries.len(), path.display());
    Ok(countries)
}

pub fn read_hs_codes_file(path: &Path) -> Result<Vec<HsCode>, ReferenceDataError> {
    let codes = read_records(open(path)?)?;
    tracing::debug!("Loaded {} HS codes from {}", codes.len(), path.display());
    Ok(codes)
}

/// Load the embedded country table.
pub fn load_countries() -> Result<Vec<Country>, ReferenceDataError> {
    parse_countries(BUNDLED_COUNTRIES)
}

/// Load the embedded HS code table.
pub fn load_hs_codes() -> Result<Vec<HsCode>, ReferenceDataError> {
    parse_hs_codes(BUNDLED_HS_CODES)
}
