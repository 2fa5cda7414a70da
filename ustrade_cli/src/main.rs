mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ustrade_lib::{Config, Flow, TradeClient};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "ustrade")]
#[command(about = "Query U.S. international trade data from the Census Bureau")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly imports for countries and HS codes
    Imports(commands::trade::TradeArgs),
    /// Monthly exports for countries and HS codes
    Exports(commands::trade::TradeArgs),
    /// Resolve a country by name, ISO2 or code
    Country(commands::country::CountryArgs),
    /// Describe an HS code and list the codes below it
    Code(commands::code::CodeArgs),
    /// Search HS code descriptions
    Search(commands::search::SearchArgs),
    /// Check that the Census API host answers
    Ping,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("ustrade=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);

    let config = Config::from_env()?;
    tracing::debug!("Using Census API at {}", config.base_url);
    let client = TradeClient::from_config(&config)?;

    match &cli.command {
        Commands::Imports(args) => {
            commands::trade::run(args, Flow::Imports, &client, &format).await?
        }
        Commands::Exports(args) => {
            commands::trade::run(args, Flow::Exports, &client, &format).await?
        }
        Commands::Country(args) => commands::country::run(args, &client, &format)?,
        Commands::Code(args) => commands::code::run(args, &client, &format)?,
        Commands::Search(args) => commands::search::run(args, &client, &format)?,
        Commands::Ping => commands::ping::run(&client).await?,
    }

    Ok(())
}
