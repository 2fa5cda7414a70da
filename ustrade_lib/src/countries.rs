//! Country reference index and resolver.
//!
//! Maps ISO2 codes, plain names and Census country codes onto the canonical
//! code the trade API filters on.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UsTradeError;
use crate::reference::{self, ReferenceDataError};

/// Minimum Jaro-Winkler score for a "did you mean" country suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// A country as known to the trade API.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Country {
    /// Census country code, e.g. `2010` for Mexico.
    pub code: String,
    pub name: String,
    pub iso2: String,
}

/// Which field of a resolved [`Country`] to hand back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountryField {
    #[default]
    Code,
    Name,
    Iso2,
}

impl CountryField {
    pub fn select<'c>(&self, country: &'c Country) -> &'c str {
        match self {
            CountryField::Code => &country.code,
            CountryField::Name => &country.name,
            CountryField::Iso2 => &country.iso2,
        }
    }
}

impl std::fmt::Display for CountryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CountryField::Code => "code",
                CountryField::Name => "name",
                CountryField::Iso2 => "ISO2",
            }
        )
    }
}

impl FromStr for CountryField {
    type Err = UsTradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "code" => Ok(CountryField::Code),
            "name" => Ok(CountryField::Name),
            "iso2" => Ok(CountryField::Iso2),
            _ => Err(UsTradeError::InvalidInput(format!(
                "Invalid output type: '{}' (expected code, name or iso2)",
                s
            ))),
        }
    }
}

/// A country argument: either a raw identifier to resolve or a country
/// that is already resolved.
#[derive(Clone, Copy, Debug)]
pub enum CountryRef<'a> {
    Id(&'a str),
    Resolved(&'a Country),
}

impl<'a> From<&'a str> for CountryRef<'a> {
    fn from(value: &'a str) -> Self {
        CountryRef::Id(value)
    }
}

impl<'a> From<&'a String> for CountryRef<'a> {
    fn from(value: &'a String) -> Self {
        CountryRef::Id(value.as_str())
    }
}

impl<'a> From<&'a Country> for CountryRef<'a> {
    fn from(value: &'a Country) -> Self {
        CountryRef::Resolved(value)
    }
}

/// Countries indexed by code, lowercase name and uppercase ISO2.
#[derive(Debug, Clone)]
pub struct CountryIndex {
    countries: Vec<Country>,
    by_code: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    by_iso2: HashMap<String, usize>,
}

impl CountryIndex {
    /// Index `countries`, rejecting a repeated code, name or ISO2.
    pub fn new(countries: Vec<Country>) -> Result<Self, ReferenceDataError> {
        let mut by_code = HashMap::with_capacity(countries.len());
        let mut by_name = HashMap::with_capacity(countries.len());
        let mut by_iso2 = HashMap::with_capacity(countries.len());

        for (i, country) in countries.iter().enumerate() {
            if by_code.insert(country.code.clone(), i).is_some() {
                return Err(ReferenceDataError::DuplicateCountry {
                    field: "code",
                    value: country.code.clone(),
                });
            }
            if by_name.insert(country.name.to_lowercase(), i).is_some() {
                return Err(ReferenceDataError::DuplicateCountry {
                    field: "name",
                    value: country.name.clone(),
                });
            }
            if by_iso2.insert(country.iso2.to_uppercase(), i).is_some() {
                return Err(ReferenceDataError::DuplicateCountry {
                    field: "iso2",
                    value: country.iso2.clone(),
                });
            }
        }

        Ok(Self {
            countries,
            by_code,
            by_name,
            by_iso2,
        })
    }

    /// Index the embedded country table.
    pub fn bundled() -> Result<Self, ReferenceDataError> {
        Self::new(reference::load_countries()?)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Countries in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter()
    }

    pub fn by_code(&self, code: &str) -> Result<&Country, UsTradeError> {
        self.by_code
            .get(code.trim())
            .map(|&i| &self.countries[i])
            .ok_or_else(|| not_found(CountryField::Code, code))
    }

    pub fn by_name(&self, name: &str) -> Result<&Country, UsTradeError> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.countries[i])
            .ok_or_else(|| not_found(CountryField::Name, name))
    }

    pub fn by_iso2(&self, iso2: &str) -> Result<&Country, UsTradeError> {
        self.by_iso2
            .get(&iso2.trim().to_uppercase())
            .map(|&i| &self.countries[i])
            .ok_or_else(|| not_found(CountryField::Iso2, iso2))
    }

    /// Finds the country for `input`. Raw identifiers are tried as ISO2, then
    /// name, then code; the first category that matches wins.
    pub fn lookup<'s>(&'s self, input: CountryRef<'s>) -> Result<&'s Country, UsTradeError> {
        let raw = match input {
            CountryRef::Resolved(country) => return Ok(country),
            CountryRef::Id(raw) => raw,
        };
        let value = raw.trim();

        let index = self
            .by_iso2
            .get(&value.to_uppercase())
            .or_else(|| self.by_name.get(&value.to_lowercase()))
            .or_else(|| self.by_code.get(value));

        match index {
            Some(&i) => Ok(&self.countries[i]),
            None => Err(UsTradeError::UnknownCountry {
                input: raw.to_string(),
                suggestion: self.suggest(value),
            }),
        }
    }

    /// Resolves `input` and returns the requested field of the match.
    pub fn resolve(&self, input: CountryRef<'_>, field: CountryField) -> Result<String, UsTradeError> {
        let country = self.lookup(input)?;
        Ok(field.select(country).to_string())
    }

    /// Closest country name by Jaro-Winkler similarity, if close enough.
    fn suggest(&self, input: &str) -> Option<String> {
        let needle = input.to_lowercase();
        if needle.chars().count() < 3 {
            return None;
        }

        let mut best: Option<(f64, &Country)> = None;
        for country in &self.countries {
            let score = strsim::jaro_winkler(&needle, &country.name.to_lowercase());
            if score < SUGGESTION_THRESHOLD {
                continue;
            }
            match best {
                Some((best_score, _)) if best_score >= score => {}
                _ => best = Some((score, country)),
            }
        }
        best.map(|(_, country)| country.name.clone())
    }
}

fn not_found(key: CountryField, value: &str) -> UsTradeError {
    UsTradeError::CountryNotFound {
        key,
        value: value.to_string(),
    }
}
