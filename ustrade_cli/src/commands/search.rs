use anyhow::Result;
use clap::Args;
use ustrade_lib::{CodeRef, SearchMode, TradeClient};

use crate::output::{print_codes, OutputFormat};

#[derive(Args)]
pub struct SearchArgs {
    /// Words to look for in code descriptions
    #[arg(required = true, num_args = 1..)]
    pub terms: Vec<String>,

    /// How terms combine: and, or
    #[arg(long, default_value = "and")]
    pub mode: String,

    /// Only search below this HS code
    #[arg(long)]
    pub scope: Option<String>,
}

pub fn run(args: &SearchArgs, client: &TradeClient, format: &OutputFormat) -> Result<()> {
    let mode: SearchMode = args.mode.parse()?;
    let scope = args.scope.as_ref().map(CodeRef::from);
    let matches = client.search_for_code(&args.terms, mode, scope)?;
    eprintln!("{} matching codes", matches.len());
    print_codes(&matches, format)
}
