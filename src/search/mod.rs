//! Paginated subtitle search.
//!
//! [`OpenSubtitlesClient::search`](crate::OpenSubtitlesClient::search) walks
//! `/subtitles` page by page and folds every page into one
//! [`AggregatedSearchResult`]. The walk itself lives in [`engine`].

mod engine;

use std::fmt;

use serde::Serialize;

use crate::envelope::Outcome;
use crate::models::ResultRecord;

/// Why a page walk ended before the last reported page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// A page reported zero pages.
    NoResults,
    /// The server did not advance past `page`. Records from earlier pages
    /// are kept, the repeated page's are not, and the walk still counts as
    /// successful.
    Stalled {
        /// The page that was requested but not advanced past.
        page: u32,
    },
    /// A page produced a non-`Ok` outcome, held in
    /// [`AggregatedSearchResult::final_outcome`].
    Failed,
}

/// How a page walk finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "termination", rename_all = "snake_case")]
pub enum Termination {
    /// Every reported page was fetched.
    Completed,
    /// The walk stopped early.
    Stopped(StopReason),
}

impl Termination {
    /// Short label for logs and CLI output.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Stopped(StopReason::NoResults) => "no_results",
            Self::Stopped(StopReason::Stalled { .. }) => "stalled",
            Self::Stopped(StopReason::Failed) => "failed",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped(StopReason::Stalled { page }) => {
                write!(f, "stalled at page {page}")
            }
            other => f.write_str(other.label()),
        }
    }
}

/// Records from every fetched page plus the outcome that ended the walk.
///
/// `final_outcome` is the outcome of the last page requested. When it is not
/// `Ok`, `records` still holds everything gathered before the failure.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSearchResult {
    /// Hits in page order.
    pub records: Vec<ResultRecord>,
    /// Outcome of the last request, payload stripped.
    pub final_outcome: Outcome<()>,
    /// How the walk ended.
    pub termination: Termination,
    /// Number of page requests issued.
    pub pages_fetched: u32,
}

impl AggregatedSearchResult {
    /// True when the walk ended without a failed page.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.final_outcome.is_ok()
    }

    /// True when the upstream stopped advancing pages.
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        matches!(
            self.termination,
            Termination::Stopped(StopReason::Stalled { .. })
        )
    }
}
