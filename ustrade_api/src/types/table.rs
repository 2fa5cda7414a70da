use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Error;

/// The API's tabular payload: a header row of field names followed by data
/// rows, every cell carried as text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// Decodes a JSON array of arrays. The API answers "no data" with an empty
    /// body, which is reported as [`Error::UndecodablePayload`] like any other
    /// body that is not a header-first array of rows.
    pub fn from_json(body: &str) -> Result<Self, Error> {
        if body.trim().is_empty() {
            return Err(Error::UndecodablePayload("empty body".to_string()));
        }
        let mut cells: Vec<Vec<Value>> = serde_json::from_str(body)
            .map_err(|e| Error::UndecodablePayload(e.to_string()))?;
        if cells.is_empty() {
            return Err(Error::UndecodablePayload("no header row".to_string()));
        }
        let header = cells
            .remove(0)
            .into_iter()
            .map(|cell| match cell {
                Value::String(name) => Ok(name),
                other => Err(Error::UndecodablePayload(format!(
                    "header cell is not a string: {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let rows = cells
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();
        Ok(Self { header, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a header field, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
