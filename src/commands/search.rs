//! Search command handler: walk every result page and print each hit.

use anyhow::Result;
use opensubtitles_core::{OpenSubtitlesClient, SearchOptions};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{ProcessExit, print_json_line};
use crate::cli::SearchArgs;

pub async fn run_search_command(
    client: &OpenSubtitlesClient,
    args: &SearchArgs,
    cancel: &CancellationToken,
) -> Result<ProcessExit> {
    let options: SearchOptions = args.options.iter().cloned().collect();
    let result = client.search(&options, cancel).await?;

    for record in &result.records {
        print_json_line(record)?;
    }

    if result.is_stalled() {
        warn!(
            termination = %result.termination,
            "server stopped advancing pages; results may be incomplete"
        );
    }
    info!(
        hits = result.records.len(),
        pages = result.pages_fetched,
        termination = %result.termination,
        "Search complete"
    );

    Ok(ProcessExit::from_outcome(&result.final_outcome))
}
