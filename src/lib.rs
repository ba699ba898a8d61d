//! OpenSubtitles Core Library
//!
//! An authenticated, paginated client for the OpenSubtitles REST API v1.
//! Every remote call returns an [`Outcome`]: the classified result paired
//! with the [`RequestContext`] that produced it. Network and server
//! failures are never panics or `Err` values; only caller misuse is
//! reported as [`ClientError`].
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`client`] - The client and its single dispatch path
//! - [`config`] - API key, base URL, timeouts
//! - [`envelope`] - Response classification into [`OutcomeKind`]
//! - [`search`] - Multi-page search aggregation
//! - [`session`] - Login, logout, user info
//! - [`lookups`] - Download links, languages, file fetches
//! - [`transport`] - Injectable HTTP capability and the reqwest implementation
//! - [`query`] - Search option normalization

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod lookups;
pub mod models;
pub mod query;
pub mod search;
pub mod session;
pub mod transport;

pub(crate) mod user_agent;

#[cfg(test)]
pub mod test_support;

// Re-export commonly used types
pub use client::{API_KEY_HEADER, AUTHORIZATION_HEADER, OpenSubtitlesClient};
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_BODY_BYTES,
    DEFAULT_READ_TIMEOUT_SECS,
};
pub use envelope::{ApiPayload, Outcome, OutcomeKind, RequestContext, classify, parse_retry_after};
pub use error::ClientError;
pub use models::{
    Credential, LanguageInfo, LanguageList, LoginInfo, LoginUser, ResultRecord, SearchPage,
    SubtitleDownloadInfo, UserInfo, UserInfoResponse,
};
pub use query::SearchOptions;
pub use search::{AggregatedSearchResult, StopReason, Termination};
pub use transport::{
    HttpMethod, HttpTransport, RawResponse, ReqwestTransport, TransportFailure, TransportRequest,
};
