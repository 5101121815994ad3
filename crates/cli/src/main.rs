//! Tanuki Shop CLI - pricing calculator, catalog and exchange rates.
//!
//! # Usage
//!
//! ```bash
//! # Price a t-shirt sold directly
//! tanuki calc --base-cost 100 --paper 20 --ink 15 --minutes 30 --seconds 60
//!
//! # Same product sold on a marketplace with a 15% commission, saved to the catalog
//! tanuki calc --marketplace --commission 15 --save --name "Remera" --category textil
//!
//! # Refresh BCV/Paralelo rates and convert a price
//! tanuki rates refresh
//! tanuki convert 609 --rate paralelo
//! ```
//!
//! # Commands
//!
//! - `calc` - Price a product from the calculator draft plus flags
//! - `catalog` - List, show, edit, delete and summarize saved products
//! - `rates` - Show, refresh or override exchange rates
//! - `settings` - Show or change the default labor and electricity rates
//! - `convert` - Convert a USD amount to bolívares
//!
//! # Environment Variables
//!
//! - `TANUKI_DATA_DIR` - Directory for saved data (default `.tanuki`)
//! - `TANUKI_RATES_URL` - Exchange rate endpoint
//! - `TANUKI_HTTP_TIMEOUT_SECS` - Request timeout for the rate endpoint
//! - `TANUKI_LOG_FORMAT` - `pretty` or `json`
//! - `RUST_LOG` - Log filter (default `info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tanuki_admin::config::{ConfigError, LogFormat};
use tanuki_admin::rates::RateSource;
use tanuki_admin::{AdminConfig, AppState};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::CommandResult;
use commands::calc::CalcArgs;
use commands::catalog::CatalogAction;
use commands::rates::{RateArg, RatesAction};
use commands::settings::SettingsAction;

#[derive(Parser)]
#[command(name = "tanuki")]
#[command(author, version, about = "Tanuki Shop admin tools")]
struct Cli {
    /// Directory for saved data (overrides `TANUKI_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a product
    Calc(CalcArgs),
    /// Manage saved products
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Show or change exchange rates
    Rates {
        #[command(subcommand)]
        action: RatesAction,
    },
    /// Show or change shop settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Convert a USD amount to bolívares
    Convert {
        /// Amount in USD
        amount: String,

        /// Which rate to use
        #[arg(long, value_enum, default_value_t = RateArg::Bcv)]
        rate: RateArg,
    },
}

#[tokio::main]
async fn main() {
    let config = AdminConfig::from_env();
    init_tracing(config.as_ref().map_or(LogFormat::default(), |c| c.log_format));

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn run(
    cli: Cli,
    config: Result<AdminConfig, ConfigError>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = config?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let state = AppState::from_config(config)?;
    let mut out = std::io::stdout().lock();

    let result = dispatch(&state, cli.command, &mut out).await;
    out.flush()?;
    commands::write_notices(state.board(), &mut std::io::stderr().lock())?;
    result?;
    Ok(())
}

async fn dispatch<S: RateSource>(
    state: &AppState<S>,
    command: Commands,
    out: &mut impl Write,
) -> CommandResult {
    match command {
        Commands::Calc(args) => commands::calc::run(state, args, out).await,
        Commands::Catalog { action } => commands::catalog::run(state, action, out).await,
        Commands::Rates { action } => commands::rates::run(state, action, out).await,
        Commands::Settings { action } => commands::settings::run(state, action, out).await,
        Commands::Convert { amount, rate } => {
            commands::rates::convert(state, &amount, rate.into(), out).await
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_calc_flags_as_strings() {
        let parsed = Cli::try_parse_from([
            "tanuki",
            "calc",
            "--base-cost",
            "12,5",
            "--marketplace",
            "--commission",
            "abc",
        ]);
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_marketplace_conflicts_with_direct() {
        let result = Cli::try_parse_from(["tanuki", "calc", "--marketplace", "--direct"]);
        assert!(result.is_err());
    }
}
