//! Authenticated command handlers: each logs in, does its work, logs out.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use opensubtitles_core::{Credential, OpenSubtitlesClient};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{ProcessExit, print_json_line};
use crate::cli::{AccountArgs, DownloadArgs};

pub async fn run_user_info_command(
    client: &OpenSubtitlesClient,
    account: &AccountArgs,
    default_username: Option<&str>,
    cancel: &CancellationToken,
) -> Result<ProcessExit> {
    let Some(mut credential) = login(client, account, default_username, cancel).await? else {
        return Ok(ProcessExit::Failure);
    };

    let outcome = client.user_info(&credential, cancel).await?;
    if let Some(info) = outcome.data() {
        print_json_line(&serde_json::json!({
            "user_id": info.data.user_id,
            "level": info.data.level,
            "allowed_downloads": info.data.allowed_downloads,
            "downloads_count": info.data.downloads_count,
            "remaining_downloads": info.data.remaining_downloads,
            "vip": info.data.vip,
        }))?;
    }
    let exit = ProcessExit::from_outcome(&outcome);

    logout(client, &mut credential).await?;
    Ok(exit)
}

pub async fn run_download_command(
    client: &OpenSubtitlesClient,
    args: &DownloadArgs,
    default_username: Option<&str>,
    cancel: &CancellationToken,
) -> Result<ProcessExit> {
    let Some(mut credential) = login(client, &args.account, default_username, cancel).await?
    else {
        return Ok(ProcessExit::Failure);
    };

    let exit = fetch_file(client, args, &credential, cancel).await;
    logout(client, &mut credential).await?;
    exit
}

async fn fetch_file(
    client: &OpenSubtitlesClient,
    args: &DownloadArgs,
    credential: &Credential,
    cancel: &CancellationToken,
) -> Result<ProcessExit> {
    let link = client.subtitle_link(args.file_id, credential, cancel).await?;
    let Some(info) = link.data() else {
        return Ok(ProcessExit::from_outcome(&link));
    };

    let file = client.download_subtitle(&info.link, cancel).await;
    let exit = ProcessExit::from_outcome(&file);
    let Some(bytes) = file.into_data() else {
        return Ok(exit);
    };

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&info.file_name, args.file_id));
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("Failed to write subtitle file '{}'", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "Subtitle saved");

    print_json_line(&serde_json::json!({
        "file_id": args.file_id,
        "path": path.display().to_string(),
        "bytes": bytes.len(),
        "remaining": info.remaining,
    }))?;
    Ok(exit)
}

/// Logs in, returning `None` (after logging why) when the server refuses.
async fn login(
    client: &OpenSubtitlesClient,
    account: &AccountArgs,
    default_username: Option<&str>,
    cancel: &CancellationToken,
) -> Result<Option<Credential>> {
    let Some(username) = account.username.as_deref().or(default_username) else {
        bail!("No username given\n  Suggestion: pass --username or set `username` in the config file");
    };
    let Some(password) = account.password.as_deref() else {
        bail!("No password given\n  Suggestion: pass --password or export OPENSUBTITLES_PASSWORD");
    };

    let outcome = client.login(username, password, cancel).await?;
    if ProcessExit::from_outcome(&outcome) == ProcessExit::Failure {
        return Ok(None);
    }
    Ok(outcome.into_data().map(|login| login.credential))
}

/// Ends the session. Uses a fresh token so an interrupted command still logs out.
async fn logout(client: &OpenSubtitlesClient, credential: &mut Credential) -> Result<()> {
    if credential.is_empty() {
        return Ok(());
    }
    let outcome = client.logout(credential, &CancellationToken::new()).await?;
    if !outcome.is_ok() {
        warn!(outcome = outcome.kind().label(), "Logout failed; token left to expire");
    }
    Ok(())
}

/// File name from the API, reduced to its last component.
fn default_output_path(file_name: &str, file_id: u64) -> PathBuf {
    Path::new(file_name)
        .file_name()
        .map_or_else(|| PathBuf::from(format!("{file_id}.srt")), PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path_uses_api_file_name() {
        assert_eq!(
            default_output_path("The.Matrix.1999.srt", 7),
            PathBuf::from("The.Matrix.1999.srt")
        );
    }

    #[test]
    fn test_default_output_path_strips_directories() {
        assert_eq!(
            default_output_path("../../etc/passwd", 7),
            PathBuf::from("passwd")
        );
    }

    #[test]
    fn test_default_output_path_falls_back_to_file_id() {
        assert_eq!(default_output_path("", 42), PathBuf::from("42.srt"));
    }
}
