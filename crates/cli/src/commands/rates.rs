//! Exchange rate commands.

use std::io::Write;

use clap::{Subcommand, ValueEnum};
use rust_decimal::Decimal;
use tanuki_admin::rates::RateSource;
use tanuki_admin::services::RefreshOutcome;
use tanuki_admin::{AppError, AppState};
use tanuki_core::{FetchedRate, Price, RateKind, coerce_decimal, coerce_optional, format_amount};

use super::{CommandResult, RatePair};

#[derive(Debug, Subcommand)]
pub enum RatesAction {
    /// Show the rates in use and where they come from
    Show,
    /// Fetch fresh rates (ignored in manual mode)
    Refresh,
    /// Set manual rates; flags left out keep their current value, 0 clears
    Manual {
        #[arg(long)]
        bcv: Option<String>,
        #[arg(long)]
        paralelo: Option<String>,
    },
    /// Switch between fetched and manual rates
    Mode {
        #[arg(value_enum)]
        mode: RateMode,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RateMode {
    Auto,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RateArg {
    Bcv,
    Paralelo,
}

impl From<RateArg> for RateKind {
    fn from(arg: RateArg) -> Self {
        match arg {
            RateArg::Bcv => Self::Bcv,
            RateArg::Paralelo => Self::Paralelo,
        }
    }
}

/// Run a rates command.
///
/// # Errors
///
/// Returns an error if a refresh fails or output cannot be written.
pub async fn run<S: RateSource>(
    state: &AppState<S>,
    action: RatesAction,
    out: &mut impl Write,
) -> CommandResult {
    let resolver = state.rates();
    match action {
        RatesAction::Show => write_rates(state, out).await?,
        RatesAction::Refresh => {
            let outcome = resolver.refresh().await?;
            write_outcome(&outcome, out)?;
        }
        RatesAction::Manual { bcv, paralelo } => {
            let current = resolver.snapshot().await;
            let bcv = manual_value(bcv.as_deref(), current.manual_bcv);
            let paralelo = manual_value(paralelo.as_deref(), current.manual_paralelo);
            resolver.set_manual_rates(bcv, paralelo).await;
            if !current.use_manual_rates {
                writeln!(
                    out,
                    "Manual rates saved. They apply after `tanuki rates mode manual`."
                )?;
            }
            write_rates(state, out).await?;
        }
        RatesAction::Mode { mode } => {
            let outcome = resolver.toggle_mode(mode == RateMode::Manual).await?;
            write_outcome(&outcome, out)?;
        }
    }
    Ok(())
}

/// Convert `amount` USD to bolívares at the current `kind` rate.
///
/// # Errors
///
/// Returns `AppError::BadRequest` when no rate of that kind is available or
/// the converted amount is out of range.
pub async fn convert<S: RateSource>(
    state: &AppState<S>,
    amount: &str,
    kind: RateKind,
    out: &mut impl Write,
) -> CommandResult {
    let rate = match kind {
        RateKind::Bcv => state.rates().current_bcv_rate().await,
        RateKind::Paralelo => state.rates().current_paralelo_rate().await,
    };
    if rate <= Decimal::ZERO {
        return Err(AppError::BadRequest(format!(
            "no {kind} rate available; run `tanuki rates refresh` or set a manual rate"
        ))
        .into());
    }

    let usd = Price::usd(coerce_decimal(amount));
    let bolivares = usd
        .to_bolivares(rate)
        .ok_or_else(|| AppError::BadRequest(format!("{usd} is too large to convert")))?;
    writeln!(out, "{usd} = {bolivares} ({kind} {})", format_amount(rate))?;
    Ok(())
}

/// Zero or negative clears the manual rate.
fn manual_value(raw: Option<&str>, current: Option<Decimal>) -> Option<Decimal> {
    match coerce_optional(raw) {
        Some(value) if value > Decimal::ZERO => Some(value),
        Some(_) => None,
        None => current,
    }
}

fn write_outcome(outcome: &RefreshOutcome, out: &mut impl Write) -> std::io::Result<()> {
    match outcome {
        RefreshOutcome::Updated { bcv, paralelo } => writeln!(
            out,
            "Rates updated: BCV {}, Paralelo {}",
            format_amount(*bcv),
            format_amount(*paralelo)
        ),
        RefreshOutcome::SkippedManual => writeln!(out, "Manual rates in use; nothing fetched"),
        RefreshOutcome::Coalesced => writeln!(out, "Rates refreshed by a concurrent request"),
    }
}

async fn write_rates<S: RateSource>(state: &AppState<S>, out: &mut impl Write) -> std::io::Result<()> {
    let snapshot = state.rates().snapshot().await;
    let current = RatePair::current(state).await;

    let mode = if snapshot.use_manual_rates {
        "manual"
    } else {
        "automatic"
    };
    writeln!(out, "{:<14}{mode}", "Mode")?;
    writeln!(out, "{:<14}{}", "Source", state.config().rates_url)?;
    writeln!(out, "{:<14}{}", "BCV", rate_or_dash(current.bcv))?;
    writeln!(out, "{:<14}{}", "Paralelo", rate_or_dash(current.paralelo))?;

    writeln!(
        out,
        "{:<14}{}",
        "Fetched BCV",
        fetched_line(snapshot.fetched_bcv.as_ref())
    )?;
    writeln!(
        out,
        "{:<14}{}",
        "Fetched Par.",
        fetched_line(snapshot.fetched_paralelo.as_ref())
    )?;
    writeln!(
        out,
        "{:<14}{} / {}",
        "Manual",
        snapshot.manual_bcv.map_or_else(|| "-".to_string(), format_amount),
        snapshot
            .manual_paralelo
            .map_or_else(|| "-".to_string(), format_amount)
    )?;
    if let Some(last_update) = snapshot.last_update {
        writeln!(out, "{:<14}{}", "Last update", last_update.to_rfc3339())?;
    }
    if let Some(error) = &snapshot.last_error {
        writeln!(out, "{:<14}{error}", "Last error")?;
    }
    Ok(())
}

fn rate_or_dash(rate: Decimal) -> String {
    if rate > Decimal::ZERO {
        format_amount(rate)
    } else {
        "-".to_string()
    }
}

fn fetched_line(rate: Option<&FetchedRate>) -> String {
    rate.map_or_else(
        || "-".to_string(),
        |rate| match &rate.fecha_actualizacion {
            Some(published) => format!("{} (published {published})", format_amount(rate.promedio)),
            None => format_amount(rate.promedio),
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::CommandError;
    use crate::commands::test_support::{output, state};

    #[test]
    fn test_manual_value() {
        let current = Some(Decimal::new(40, 0));
        assert_eq!(manual_value(None, current), current);
        assert_eq!(manual_value(Some("0"), current), None);
        assert_eq!(
            manual_value(Some("1234,5"), None),
            Some(Decimal::new(12345, 1))
        );
    }

    #[tokio::test]
    async fn test_convert_without_rate_fails() {
        let state = state();
        let err = convert(&state, "10", RateKind::Bcv, &mut Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::App(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_manual_mode_drives_convert() {
        let state = state();
        let manual = RatesAction::Manual {
            bcv: Some("36,5".to_string()),
            paralelo: None,
        };
        run(&state, manual, &mut Vec::new()).await.unwrap();
        let mode = RatesAction::Mode {
            mode: RateMode::Manual,
        };
        let mut out = Vec::new();
        run(&state, mode, &mut out).await.unwrap();
        assert_eq!(output(out), "Manual rates in use; nothing fetched\n");

        let mut out = Vec::new();
        convert(&state, "10", RateKind::Bcv, &mut out).await.unwrap();
        assert_eq!(output(out), "$ 10,00 = Bs 365,00 (BCV 36,50)\n");
    }

    #[tokio::test]
    async fn test_convert_out_of_range_amount_fails() {
        let state = state();
        state
            .rates()
            .set_manual_rates(Some(Decimal::new(365, 1)), None)
            .await;
        state.rates().toggle_mode(true).await.unwrap();

        let err = convert(&state, "79228162514264337593543950335", RateKind::Bcv, &mut Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::App(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_show_fresh_state() {
        let state = state();
        let mut out = Vec::new();
        run(&state, RatesAction::Show, &mut out).await.unwrap();
        let text = output(out);
        assert!(text.starts_with("Mode          automatic\n"), "{text}");
        assert!(
            text.contains("Source        http://127.0.0.1:9/v1/dolares\n"),
            "{text}"
        );
        assert!(text.contains("BCV           -\n"));
    }

    #[tokio::test]
    async fn test_refresh_failure_is_reported() {
        let state = state();
        let err = run(&state, RatesAction::Refresh, &mut Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::App(AppError::Rates(_))));
        assert!(state.rates().snapshot().await.last_error.is_some());
    }
}
