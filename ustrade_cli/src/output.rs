use anyhow::Result;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use ustrade_lib::{CodeMatch, Column, Country, TradeRecord, TradeTable};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    /// Unknown names fall back to a plain table.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct CountryRow {
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "ISO2")]
    #[serde(rename = "ISO2")]
    iso2: String,
}

#[derive(Tabled, Serialize)]
struct CodeRow {
    #[tabled(rename = "HS Code")]
    #[serde(rename = "HS Code")]
    code: String,
    #[tabled(rename = "Description")]
    #[serde(rename = "Description")]
    description: String,
}

// -- Row builders --

fn build_country_rows(countries: &[&Country]) -> Vec<CountryRow> {
    countries
        .iter()
        .map(|c| CountryRow {
            code: c.code.clone(),
            name: c.name.clone(),
            iso2: c.iso2.clone(),
        })
        .collect()
}

fn build_code_rows(codes: &[CodeMatch]) -> Vec<CodeRow> {
    codes
        .iter()
        .map(|c| CodeRow {
            code: c.code.clone(),
            description: c.description.clone(),
        })
        .collect()
}

fn column_title(column: Column) -> &'static str {
    match column {
        Column::Date => "Date",
        Column::CountryName => "Country",
        Column::CountryCode => "Country Code",
        Column::ProductName => "Product",
        Column::ProductCode => "HS Code",
        Column::ImportValue => "General Imports",
        Column::ExportValue => "Exports",
        Column::ConsumptionImportValue => "Imports for Consumption",
    }
}

fn record_cell(record: &TradeRecord, column: Column, abbreviate: bool) -> String {
    let value = |v: Option<f64>| match v {
        Some(v) if abbreviate => format_value(v),
        Some(v) => v.to_string(),
        None => String::new(),
    };
    match column {
        Column::Date => record.date.format("%Y-%m").to_string(),
        Column::CountryName => record.country_name.clone(),
        Column::CountryCode => record.country_code.clone(),
        Column::ProductName => record.product_name.clone(),
        Column::ProductCode => record.product_code.clone(),
        Column::ImportValue => value(record.import_value),
        Column::ExportValue => value(record.export_value),
        Column::ConsumptionImportValue => value(record.consumption_import_value),
    }
}

/// Header and rows for the columns the table actually carries.
fn build_trade_rows(table: &TradeTable, abbreviate: bool) -> (Vec<String>, Vec<Vec<String>>) {
    let header = table
        .columns
        .iter()
        .map(|c| column_title(*c).to_string())
        .collect();
    let rows = table
        .records
        .iter()
        .map(|r| {
            table
                .columns
                .iter()
                .map(|c| record_cell(r, *c, abbreviate))
                .collect()
        })
        .collect();
    (header, rows)
}

fn trade_table(table: &TradeTable) -> Table {
    let (header, rows) = build_trade_rows(table, true);
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }
    builder.build()
}

// -- Trade output --

pub fn print_trade_table(table: &TradeTable, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", trade_table(table)),
        OutputFormat::Markdown => {
            let mut out = trade_table(table);
            out.with(Style::markdown());
            println!("{}", out);
        }
        OutputFormat::Json => print_json(&table.records),
        OutputFormat::Csv => {
            let (header, rows) = build_trade_rows(table, false);
            if header.is_empty() {
                return Ok(());
            }
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(&header)?;
            for row in rows {
                wtr.write_record(&row)?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

// -- Reference output --

pub fn print_countries(countries: &[&Country], format: &OutputFormat) -> Result<()> {
    print_rows(build_country_rows(countries), format)
}

pub fn print_codes(codes: &[CodeMatch], format: &OutputFormat) -> Result<()> {
    print_rows(build_code_rows(codes), format)
}

fn print_rows<T: Tabled + Serialize>(rows: Vec<T>, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_value(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    if abs >= 1_000_000_000.0 {
        format!("{}${:.1}B", sign, abs / 1_000_000_000.0)
    } else if abs >= 1_000_000.0 {
        format!("{}${:.1}M", sign, abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{}${:.1}K", sign, abs / 1_000.0)
    } else {
        format!("{}${}", sign, abs)
    }
}
