//! CLI command handlers.
//!
//! Each handler prints its results to stdout as JSON lines and reports
//! whether the final outcome was `Ok` through [`ProcessExit`].

mod account;
mod languages;
mod search;

pub use account::{run_download_command, run_user_info_command};
pub use languages::run_languages_command;
pub use search::run_search_command;

use std::io::{self, Write};

use anyhow::{Context, Result};
use opensubtitles_core::Outcome;
use serde::Serialize;
use tracing::error;

/// Process exit classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    /// Every request ended `Ok`.
    Success,
    /// The final outcome was not `Ok`.
    Failure,
}

impl ProcessExit {
    /// Maps an outcome to an exit classification, logging failures.
    pub(crate) fn from_outcome<T>(outcome: &Outcome<T>) -> Self {
        if outcome.is_ok() {
            Self::Success
        } else {
            error!(
                endpoint = %outcome.context().endpoint(),
                outcome = outcome.kind().label(),
                "{}",
                describe_failure(outcome)
            );
            Self::Failure
        }
    }
}

fn describe_failure<T>(outcome: &Outcome<T>) -> String {
    use opensubtitles_core::OutcomeKind;

    match outcome.kind() {
        OutcomeKind::Ok { .. } => "ok".to_string(),
        OutcomeKind::ValidationError { details } => format!("request rejected: {details}"),
        OutcomeKind::Unauthorized => {
            "not authorized: check the API key and account credentials".to_string()
        }
        OutcomeKind::RateLimited { retry_after } => match retry_after {
            Some(wait) => format!("rate limited: retry in {}s", wait.as_secs()),
            None => "rate limited".to_string(),
        },
        OutcomeKind::NotFound => "not found".to_string(),
        OutcomeKind::ServerError { status, detail } => match detail {
            Some(detail) => format!("server error {status}: {detail}"),
            None => format!("server error {status}"),
        },
        OutcomeKind::TransportError(failure) => failure.to_string(),
    }
}

/// Writes `value` as one JSON line on stdout.
pub(crate) fn print_json_line<T: Serialize>(value: &T) -> Result<()> {
    let line = serde_json::to_string(value).context("Failed to serialize output")?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{line}").context("Failed to write to stdout")?;
    Ok(())
}
