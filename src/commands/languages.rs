//! Languages command handler: print supported subtitle languages.

use anyhow::Result;
use opensubtitles_core::OpenSubtitlesClient;
use tokio_util::sync::CancellationToken;

use super::{ProcessExit, print_json_line};

pub async fn run_languages_command(
    client: &OpenSubtitlesClient,
    cancel: &CancellationToken,
) -> Result<ProcessExit> {
    let outcome = client.languages(cancel).await?;
    if let Some(list) = outcome.data() {
        for language in &list.data {
            print_json_line(language)?;
        }
    }
    Ok(ProcessExit::from_outcome(&outcome))
}
