use anyhow::Result;
use clap::Args;
use ustrade_lib::TradeClient;

use crate::output::{print_codes, OutputFormat};

#[derive(Args)]
pub struct CodeArgs {
    /// HS code, e.g. 09 or 1001
    pub code: String,
}

pub fn run(args: &CodeArgs, client: &TradeClient, format: &OutputFormat) -> Result<()> {
    let product = client.get_product(&args.code)?;
    eprintln!("{}: {}", product.hscode, product.description);

    let children = client.get_children_descriptions(product)?;
    if children.is_empty() {
        eprintln!("No codes below {}", product.hscode);
        return Ok(());
    }
    print_codes(&children, format)
}
