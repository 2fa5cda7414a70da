use anyhow::{bail, Result};
use clap::Args;
use ustrade_lib::{CodeRef, CountryRef, Flow, Period, TradeClient};

use crate::output::{print_trade_table, OutputFormat};

#[derive(Args)]
pub struct TradeArgs {
    /// Country by name, ISO2 or Census code (repeatable)
    #[arg(long, required = true, num_args = 1..)]
    pub country: Vec<String>,

    /// HS code (repeatable)
    #[arg(long, required = true, num_args = 1..)]
    pub product: Vec<String>,

    /// Single month, YYYY-MM
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub month: Option<String>,

    /// First month of a range, YYYY-MM
    #[arg(long, requires = "end")]
    pub start: Option<String>,

    /// Last month of a range, YYYY-MM (inclusive)
    #[arg(long, requires = "start")]
    pub end: Option<String>,

    /// Print the request URL instead of sending it
    #[arg(long)]
    pub dry_run: bool,
}

impl TradeArgs {
    fn period(&self) -> Result<Period> {
        let period = match (&self.month, &self.start, &self.end) {
            (Some(month), None, None) => Period::parse_month(month)?,
            (None, Some(start), Some(end)) => Period::parse_range(start, end)?,
            _ => bail!("Pass either --month or both --start and --end"),
        };
        Ok(period)
    }
}

pub async fn run(
    args: &TradeArgs,
    flow: Flow,
    client: &TradeClient,
    format: &OutputFormat,
) -> Result<()> {
    let period = args.period()?;
    let countries: Vec<CountryRef> = args.country.iter().map(CountryRef::from).collect();
    let products: Vec<CodeRef> = args.product.iter().map(CodeRef::from).collect();

    if args.dry_run {
        let query = client.build_query(&countries, &products, flow, period)?;
        println!("{}", client.api().url_for(&query)?);
        return Ok(());
    }

    let table = client.get_flow(&countries, &products, flow, period).await?;
    eprintln!("{} {} rows", table.len(), flow);
    print_trade_table(&table, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(month: Option<&str>, start: Option<&str>, end: Option<&str>) -> TradeArgs {
        TradeArgs {
            country: vec!["MX".to_string()],
            product: vec!["27".to_string()],
            month: month.map(String::from),
            start: start.map(String::from),
            end: end.map(String::from),
            dry_run: false,
        }
    }

    #[test]
    fn test_period_month() {
        let period = args(Some("2010-01"), None, None).period().unwrap();
        assert!(matches!(period, Period::Month(m) if m.to_string() == "2010-01"));
    }

    #[test]
    fn test_period_range() {
        let period = args(None, Some("2013-01"), Some("2014-01")).period().unwrap();
        assert!(matches!(period, Period::Range { .. }));
    }

    #[test]
    fn test_period_missing_or_reversed() {
        assert!(args(None, None, None).period().is_err());
        assert!(args(None, Some("2014-01"), Some("2013-01")).period().is_err());
        assert!(args(Some("2010/01"), None, None).period().is_err());
    }
}
