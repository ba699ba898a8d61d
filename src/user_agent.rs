//! Shared User-Agent string for API and file-download traffic.
//!
//! OpenSubtitles rejects requests without a descriptive User-Agent, so every
//! client built by this crate identifies itself with the crate name and version.

/// Repository URL from `Cargo.toml`; empty when the manifest has none.
const PROJECT_REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");

/// Default User-Agent for every request issued by [`ReqwestTransport`](crate::transport::ReqwestTransport).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    if PROJECT_REPOSITORY.is_empty() {
        format!("opensubtitles/{version}")
    } else {
        format!("opensubtitles/{version} (+{PROJECT_REPOSITORY})")
    }
}
