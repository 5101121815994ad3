//! Subcommand implementations.
//!
//! Every command writes its result to `out` and leaves status notices on
//! the state's board for `main` to print afterwards.

pub mod calc;
pub mod catalog;
pub mod rates;
pub mod settings;

use std::io::{self, Write};

use rust_decimal::Decimal;
use tanuki_admin::rates::{RateError, RateSource};
use tanuki_admin::{AppError, AppState};
use tanuki_admin::services::{NoticeLevel, StatusBoard};
use tanuki_core::{Price, PricingError, RateKind};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl From<PricingError> for CommandError {
    fn from(e: PricingError) -> Self {
        Self::App(e.into())
    }
}

impl From<RateError> for CommandError {
    fn from(e: RateError) -> Self {
        Self::App(e.into())
    }
}

pub type CommandResult = Result<(), CommandError>;

/// Print and clear pending notices.
pub fn write_notices(board: &StatusBoard, out: &mut impl Write) -> io::Result<()> {
    for notice in board.drain() {
        let label = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        writeln!(out, "[{label}] {}", notice.message)?;
    }
    Ok(())
}

/// Current BCV and Paralelo rates; zero means unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatePair {
    pub bcv: Decimal,
    pub paralelo: Decimal,
}

impl RatePair {
    pub async fn current<S: RateSource>(state: &AppState<S>) -> Self {
        let snapshot = state.rates().snapshot().await;
        Self {
            bcv: snapshot.current_bcv_rate(),
            paralelo: snapshot.current_paralelo_rate(),
        }
    }

    const fn get(self, kind: RateKind) -> Decimal {
        match kind {
            RateKind::Bcv => self.bcv,
            RateKind::Paralelo => self.paralelo,
        }
    }
}

/// `$ 609,00 (Bs 22.228,50 BCV, Bs 27.405,00 Paralelo)`, leaving out
/// unavailable rates and amounts too large to convert.
pub fn with_bolivares(amount: Decimal, rates: RatePair) -> String {
    let usd = Price::usd(amount);
    let equivalents: Vec<String> = [RateKind::Bcv, RateKind::Paralelo]
        .into_iter()
        .filter(|kind| rates.get(*kind) > Decimal::ZERO)
        .filter_map(|kind| {
            let bolivares = usd.to_bolivares(rates.get(kind))?;
            Some(format!("{bolivares} {kind}"))
        })
        .collect();

    if equivalents.is_empty() {
        usd.to_string()
    } else {
        format!("{usd} ({})", equivalents.join(", "))
    }
}
