use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Direction of trade. Selects the endpoint, the commodity field prefix
/// (`I_` / `E_`) and the value fields requested from the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    /// Inbound trade, served by the `imports` endpoint.
    Imports,
    /// Outbound trade, served by the `exports` endpoint.
    Exports,
}

impl Flow {
    /// Path segment under `/data/timeseries/intltrade/`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Flow::Imports => "imports",
            Flow::Exports => "exports",
        }
    }

    /// Name of the commodity code field for this flow.
    pub fn commodity_field(&self) -> &'static str {
        match self {
            Flow::Imports => "I_COMMODITY",
            Flow::Exports => "E_COMMODITY",
        }
    }

    /// Name of the short commodity description field for this flow.
    pub fn commodity_desc_field(&self) -> &'static str {
        match self {
            Flow::Imports => "I_COMMODITY_SDESC",
            Flow::Exports => "E_COMMODITY_SDESC",
        }
    }

    /// Monthly value fields requested for this flow. Imports carry both the
    /// general and the consumption value; exports carry a single total.
    pub fn value_fields(&self) -> &'static [&'static str] {
        match self {
            Flow::Imports => &["GEN_VAL_MO", "CON_VAL_MO"],
            Flow::Exports => &["ALL_VAL_MO"],
        }
    }
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl FromStr for Flow {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "imports" | "import" | "inbound" => Ok(Flow::Imports),
            "exports" | "export" | "outbound" => Ok(Flow::Exports),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_fields() {
        assert_eq!(Flow::Imports.commodity_field(), "I_COMMODITY");
        assert_eq!(Flow::Exports.commodity_desc_field(), "E_COMMODITY_SDESC");
        assert_eq!(Flow::Imports.value_fields(), &["GEN_VAL_MO", "CON_VAL_MO"]);
        assert_eq!(Flow::Exports.value_fields(), &["ALL_VAL_MO"]);
    }

    #[test]
    fn test_flow_from_str() {
        assert_eq!("Outbound".parse::<Flow>(), Ok(Flow::Exports));
        assert_eq!("imports".parse::<Flow>(), Ok(Flow::Imports));
        assert!("sideways".parse::<Flow>().is_err());
    }
}
