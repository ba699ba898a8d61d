//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Search and download subtitles from OpenSubtitles.
///
/// Results are printed to stdout as JSON lines; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "opensubtitles")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: $XDG_CONFIG_HOME/opensubtitles/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Consumer API key (overrides the config file)
    #[arg(long, env = "OPENSUBTITLES_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// API root override
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search subtitles and print every hit across all pages
    Search(SearchArgs),
    /// List the languages the API supports
    Languages,
    /// Log in, print account quota, log out
    UserInfo(AccountArgs),
    /// Log in, download one subtitle file, log out
    Download(DownloadArgs),
}

/// Arguments for `search`.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search options as KEY=VALUE (e.g. query=matrix languages=en)
    #[arg(required = true, value_parser = parse_key_value)]
    pub options: Vec<(String, String)>,
}

/// Account credentials for authenticated commands.
#[derive(Args, Debug)]
pub struct AccountArgs {
    /// Account name (overrides the config file)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Account password
    #[arg(long, env = "OPENSUBTITLES_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for `download`.
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// File id from a search hit (`attributes.files[].file_id`)
    pub file_id: u64,

    /// Output path (default: the file name suggested by the API)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub account: AccountArgs,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
