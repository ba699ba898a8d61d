//! The page walk behind [`OpenSubtitlesClient::search`].

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::{AggregatedSearchResult, StopReason, Termination};
use crate::client::{OpenSubtitlesClient, Target};
use crate::envelope::{Outcome, OutcomeKind, RequestContext};
use crate::error::ClientError;
use crate::models::SearchPage;
use crate::query::SearchOptions;
use crate::transport::HttpMethod;

const SEARCH_ENDPOINT: &str = "/subtitles";

/// Transition taken after each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageWalk {
    Fetching { page: u32 },
    Stopped(StopReason),
    Completed,
}

impl OpenSubtitlesClient {
    /// Runs a search and collects every page into one result.
    ///
    /// Options are normalized (lower-cased) first. Pages are fetched
    /// sequentially starting at 1 until the page count reported by the first
    /// page is reached. The walk stops early on:
    ///
    /// - a page reporting zero pages ([`StopReason::NoResults`]);
    /// - a server that does not advance the page number
    ///   ([`StopReason::Stalled`], still a success);
    /// - any non-`Ok` page ([`StopReason::Failed`]), including cancellation.
    ///
    /// The page that triggers a stop contributes no records. Failed pages are
    /// not retried. Records gathered before the stop are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingApiKey`] when no API key is configured.
    #[instrument(skip(self, cancel), fields(query = %options))]
    pub async fn search(
        &self,
        options: &SearchOptions,
        cancel: &CancellationToken,
    ) -> Result<AggregatedSearchResult, ClientError> {
        self.require_api_key("search")?;

        let mut query = options.normalize();
        let mut records = Vec::new();
        let mut max_page: Option<u32> = None;
        let mut pages_fetched: u32 = 0;
        let mut page: u32 = 1;

        let (termination, final_outcome) = loop {
            if page > 1 {
                query.set("page", page.to_string());
            }
            let path = query.apply_to(SEARCH_ENDPOINT);
            let context = RequestContext::new(HttpMethod::Get, path.as_str())
                .with_note(format!("url: {}", self.config().endpoint_url(&path)))
                .with_note(format!("page: {page}"));

            let outcome: Outcome<SearchPage> = self.dispatch(Target::Api, context, cancel).await;
            pages_fetched += 1;

            let (context, kind) = outcome.into_parts();
            let (walk, final_kind) = match kind {
                OutcomeKind::Ok { data, is_empty } => {
                    let walk = next_step(page, &data, &mut max_page);
                    debug!(
                        page,
                        reported_page = data.current_page,
                        total_pages = data.total_pages,
                        hits = data.records.len(),
                        "search page fetched"
                    );
                    // The page that ends the walk early contributes nothing.
                    if !matches!(walk, PageWalk::Stopped(_)) {
                        records.extend(data.records);
                    }
                    (walk, OutcomeKind::Ok { data: (), is_empty })
                }
                other => (PageWalk::Stopped(StopReason::Failed), other.map(|_| ())),
            };
            let final_outcome = Outcome::new(context, final_kind);

            match walk {
                PageWalk::Fetching { page: next } => page = next,
                PageWalk::Stopped(reason) => break (Termination::Stopped(reason), final_outcome),
                PageWalk::Completed => break (Termination::Completed, final_outcome),
            }
        };

        info!(
            termination = %termination,
            pages_fetched,
            records = records.len(),
            "search finished"
        );

        Ok(AggregatedSearchResult {
            records,
            final_outcome,
            termination,
            pages_fetched,
        })
    }
}

/// Decides what follows a successful page.
///
/// The page count is latched from the first successful page. The next page
/// is derived from the page number the server reports, not the one requested.
fn next_step(requested: u32, data: &SearchPage, max_page: &mut Option<u32>) -> PageWalk {
    if data.total_pages == 0 {
        return PageWalk::Stopped(StopReason::NoResults);
    }
    let max_page = *max_page.get_or_insert(data.total_pages);

    let next = data.current_page.saturating_add(1);
    // A server that repeats or rewinds the page number would loop forever.
    if next <= requested {
        return PageWalk::Stopped(StopReason::Stalled { page: requested });
    }
    if next <= max_page {
        PageWalk::Fetching { page: next }
    } else {
        PageWalk::Completed
    }
}
