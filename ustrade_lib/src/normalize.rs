//! Response normalization.
//!
//! The imports and exports endpoints name the same concepts differently
//! (`I_COMMODITY` vs `E_COMMODITY`, `GEN_VAL_MO` vs `ALL_VAL_MO`). This module
//! renames raw fields to one canonical schema, derives a `date` per row, and
//! projects the result onto the canonical output columns.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ustrade_api::types::{Flow, RawTable, YearMonth};

/// Errors raised while normalizing a decoded payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Row {row} has {found} cells, header has {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Payload has no YEAR/MONTH or time field to date row {row}")]
    MissingDate { row: usize },
    #[error("Row {row} has an invalid date '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("Row {row} has a non-numeric {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Canonical output columns, in output order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Date,
    CountryName,
    CountryCode,
    ProductName,
    ProductCode,
    ImportValue,
    ExportValue,
    ConsumptionImportValue,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Date,
        Column::CountryName,
        Column::CountryCode,
        Column::ProductName,
        Column::ProductCode,
        Column::ImportValue,
        Column::ExportValue,
        Column::ConsumptionImportValue,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::Date => "date",
            Column::CountryName => "country_name",
            Column::CountryCode => "country_code",
            Column::ProductName => "product_name",
            Column::ProductCode => "product_code",
            Column::ImportValue => "import_value",
            Column::ExportValue => "export_value",
            Column::ConsumptionImportValue => "consumption_import_value",
        }
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Canonical name a raw field is renamed to. Year, month and time only feed
/// the derived `date` and are not output columns themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Field {
    Out(Column),
    Year,
    Month,
    Time,
}

/// Raw API field name to canonical field. Both flows' variants map to the
/// same canonical names.
const FIELD_MAP: &[(&str, Field)] = &[
    ("CTY_CODE", Field::Out(Column::CountryCode)),
    ("CTY_NAME", Field::Out(Column::CountryName)),
    ("I_COMMODITY", Field::Out(Column::ProductCode)),
    ("E_COMMODITY", Field::Out(Column::ProductCode)),
    ("I_ENDUSE", Field::Out(Column::ProductCode)),
    ("E_ENDUSE", Field::Out(Column::ProductCode)),
    ("I_COMMODITY_SDESC", Field::Out(Column::ProductName)),
    ("E_COMMODITY_SDESC", Field::Out(Column::ProductName)),
    ("I_ENDUSE_LDESC", Field::Out(Column::ProductName)),
    ("E_ENDUSE_LDESC", Field::Out(Column::ProductName)),
    ("GEN_VAL_MO", Field::Out(Column::ImportValue)),
    ("ALL_VAL_MO", Field::Out(Column::ExportValue)),
    ("CON_VAL_MO", Field::Out(Column::ConsumptionImportValue)),
    ("YEAR", Field::Year),
    ("MONTH", Field::Month),
    ("time", Field::Time),
];

fn canonical_field(raw: &str) -> Option<Field> {
    FIELD_MAP
        .iter()
        .find(|(name, _)| *name == raw)
        .map(|(_, field)| *field)
}

/// One normalized row. Value fields the queried flow does not carry stay
/// `None` and are left out when serialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// First day of the reported month.
    pub date: NaiveDate,
    pub country_name: String,
    pub country_code: String,
    pub product_name: String,
    pub product_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumption_import_value: Option<f64>,
}

/// Normalized rows plus the columns actually present for this response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeTable {
    pub flow: Flow,
    pub columns: Vec<Column>,
    pub records: Vec<TradeRecord>,
}

impl TradeTable {
    /// A table with no columns and no rows.
    pub fn empty(flow: Flow) -> Self {
        Self {
            flow,
            columns: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }
}

/// Where each canonical field sits in the raw header. When two raw fields map
/// to the same canonical name, the first (leftmost) one is kept.
struct Layout {
    positions: HashMap<Field, usize>,
}

impl Layout {
    fn from_header(header: &[String]) -> Self {
        let mut positions = HashMap::new();
        for (i, raw) in header.iter().enumerate() {
            if let Some(field) = canonical_field(raw.trim()) {
                positions.entry(field).or_insert(i);
            }
        }
        Self { positions }
    }

    fn position(&self, field: Field) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    fn has_date(&self) -> bool {
        (self.position(Field::Year).is_some() && self.position(Field::Month).is_some())
            || self.position(Field::Time).is_some()
    }

    fn text(&self, row: &[String], column: Column) -> String {
        self.position(Field::Out(column))
            .map(|i| row[i].trim().to_string())
            .unwrap_or_default()
    }

    fn value(&self, index: usize, row: &[String], column: Column) -> Result<Option<f64>, NormalizeError> {
        let Some(i) = self.position(Field::Out(column)) else {
            return Ok(None);
        };
        let cell = row[i].trim();
        if cell.is_empty() {
            return Ok(None);
        }
        cell.parse::<f64>()
            .map(Some)
            .map_err(|_| NormalizeError::InvalidValue {
                row: index,
                column: column.name(),
                value: cell.to_string(),
            })
    }

    fn date(&self, index: usize, row: &[String]) -> Result<NaiveDate, NormalizeError> {
        let value = match (self.position(Field::Year), self.position(Field::Month)) {
            (Some(y), Some(m)) => format!("{}-{:0>2}", row[y].trim(), row[m].trim()),
            _ => match self.position(Field::Time) {
                Some(t) => row[t].trim().to_string(),
                None => return Err(NormalizeError::MissingDate { row: index }),
            },
        };
        value
            .parse::<YearMonth>()
            .map(|month| month.first_day())
            .map_err(|_| NormalizeError::InvalidDate { row: index, value })
    }
}

/// Renames, dates and projects a decoded payload.
pub fn normalize(table: &RawTable, flow: Flow) -> Result<TradeTable, NormalizeError> {
    let layout = Layout::from_header(&table.header);

    let columns: Vec<Column> = Column::ALL
        .iter()
        .copied()
        .filter(|column| match column {
            Column::Date => layout.has_date(),
            other => layout.position(Field::Out(*other)).is_some(),
        })
        .collect();

    let expected = table.header.len();
    let mut records = Vec::with_capacity(table.rows.len());
    for (index, row) in table.rows.iter().enumerate() {
        if row.len() < expected {
            return Err(NormalizeError::RowLength {
                row: index,
                expected,
                found: row.len(),
            });
        }
        records.push(TradeRecord {
            date: layout.date(index, row)?,
            country_name: layout.text(row, Column::CountryName),
            country_code: layout.text(row, Column::CountryCode),
            product_name: layout.text(row, Column::ProductName),
            product_code: layout.text(row, Column::ProductCode),
            import_value: layout.value(index, row, Column::ImportValue)?,
            export_value: layout.value(index, row, Column::ExportValue)?,
            consumption_import_value: layout.value(index, row, Column::ConsumptionImportValue)?,
        });
    }

    tracing::debug!("Normalized {} {} rows", records.len(), flow);
    Ok(TradeTable {
        flow,
        columns,
        records,
    })
}
