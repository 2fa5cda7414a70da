use anyhow::Result;
use clap::Args;
use ustrade_lib::{CountryField, CountryRef, TradeClient};

use crate::output::{print_countries, OutputFormat};

#[derive(Args)]
pub struct CountryArgs {
    /// Country name, ISO2 code or Census code
    pub value: String,

    /// Print only this field: code, name or iso2
    #[arg(long = "as")]
    pub field: Option<String>,
}

pub fn run(args: &CountryArgs, client: &TradeClient, format: &OutputFormat) -> Result<()> {
    let input = CountryRef::from(&args.value);
    match &args.field {
        Some(field) => {
            let field: CountryField = field.parse()?;
            println!("{}", client.resolve_country(input, field)?);
        }
        None => {
            let country = client.countries().lookup(input)?;
            print_countries(&[country], format)?;
        }
    }
    Ok(())
}
