//! Shop settings commands.

use std::io::Write;

use clap::Subcommand;
use tanuki_admin::AppState;
use tanuki_admin::rates::RateSource;
use tanuki_core::{Price, coerce_optional};

use super::CommandResult;

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Show the default rates used by new calculations
    Show,
    /// Change the default rates
    Set {
        /// Hourly labor rate
        #[arg(long)]
        hourly_rate: Option<String>,
        /// Electricity cost per hour
        #[arg(long)]
        electricity: Option<String>,
    },
}

/// Run a settings command.
///
/// # Errors
///
/// Returns an error if output cannot be written.
pub async fn run<S: RateSource>(
    state: &AppState<S>,
    action: SettingsAction,
    out: &mut impl Write,
) -> CommandResult {
    let mut service = state.settings().lock().await;
    if let SettingsAction::Set {
        hourly_rate,
        electricity,
    } = action
    {
        let mut settings = *service.current();
        if let Some(rate) = coerce_optional(hourly_rate.as_deref()) {
            settings.hourly_rate = rate;
        }
        if let Some(cost) = coerce_optional(electricity.as_deref()) {
            settings.electricity_cost_per_hour = cost;
        }
        if service.save(settings) {
            writeln!(out, "Settings saved")?;
        }
    }

    let settings = service.current();
    writeln!(
        out,
        "{:<26}{}",
        "Hourly labor rate",
        Price::usd(settings.hourly_rate)
    )?;
    writeln!(
        out,
        "{:<26}{}",
        "Electricity cost per hour",
        Price::usd(settings.electricity_cost_per_hour)
    )?;
    Ok(())
}
