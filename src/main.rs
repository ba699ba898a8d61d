//! CLI entry point for the opensubtitles tool.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use opensubtitles_core::{ClientConfig, OpenSubtitlesClient};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

mod app_config;
mod cli;
mod commands;

use app_config::FileConfig;
use cli::{Cli, Command};
use commands::ProcessExit;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // stdout carries JSON results; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let file_config = app_config::load_config(cli.config.as_deref())?;
    debug!(?file_config, "Configuration loaded");

    let client = OpenSubtitlesClient::with_reqwest(build_client_config(&cli, &file_config))
        .context("Failed to initialize OpenSubtitles client")?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted; cancelling in-flight request");
            interrupt.cancel();
        }
    });

    let default_username = file_config.username.as_deref();
    let exit = match &cli.command {
        Command::Search(args) => commands::run_search_command(&client, args, &cancel).await?,
        Command::Languages => commands::run_languages_command(&client, &cancel).await?,
        Command::UserInfo(account) => {
            commands::run_user_info_command(&client, account, default_username, &cancel).await?
        }
        Command::Download(args) => {
            commands::run_download_command(&client, args, default_username, &cancel).await?
        }
    };

    Ok(match exit {
        ProcessExit::Success => ExitCode::SUCCESS,
        ProcessExit::Failure => ExitCode::FAILURE,
    })
}

/// Merges CLI flags over file values over library defaults.
fn build_client_config(cli: &Cli, file: &FileConfig) -> ClientConfig {
    let api_key = cli
        .api_key
        .clone()
        .or_else(|| file.api_key.clone())
        .unwrap_or_default();
    let mut config = ClientConfig::new(api_key);

    if let Some(base_url) = cli.base_url.as_ref().or(file.base_url.as_ref()) {
        config = config.with_base_url(base_url.clone());
    }
    if file.connect_timeout_secs.is_some() || file.read_timeout_secs.is_some() {
        config = config.with_timeouts(
            file.connect_timeout_secs
                .unwrap_or(opensubtitles_core::DEFAULT_CONNECT_TIMEOUT_SECS),
            file.read_timeout_secs
                .unwrap_or(opensubtitles_core::DEFAULT_READ_TIMEOUT_SECS),
        );
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};

    /// Parses `args` with every environment fallback disabled.
    fn parse_without_env(args: &[&str]) -> Cli {
        let matches = Cli::command()
            .mut_arg("api_key", |arg| arg.env(None::<&'static str>))
            .try_get_matches_from(args.iter().copied())
            .unwrap();
        Cli::from_arg_matches(&matches).unwrap()
    }

    #[test]
    fn test_cli_api_key_overrides_file() {
        let cli = Cli::try_parse_from(["opensubtitles", "--api-key", "from-cli", "languages"])
            .unwrap();
        let file = FileConfig {
            api_key: Some("from-file".to_string()),
            ..FileConfig::default()
        };
        assert_eq!(build_client_config(&cli, &file).api_key(), "from-cli");
    }

    #[test]
    fn test_file_values_fill_gaps() {
        let cli = parse_without_env(&["opensubtitles", "languages"]);
        let file = FileConfig {
            api_key: Some("from-file".to_string()),
            base_url: Some("http://127.0.0.1:8080/api/v1".to_string()),
            read_timeout_secs: Some(90),
            ..FileConfig::default()
        };
        let config = build_client_config(&cli, &file);
        assert_eq!(config.api_key(), "from-file");
        assert_eq!(config.base_url(), "http://127.0.0.1:8080/api/v1");
        assert_eq!(config.read_timeout_secs(), 90);
        assert_eq!(
            config.connect_timeout_secs(),
            opensubtitles_core::DEFAULT_CONNECT_TIMEOUT_SECS
        );
    }
}
