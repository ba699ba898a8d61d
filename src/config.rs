//! Client configuration.
//!
//! [`ClientConfig`] carries the API key and endpoint settings consumed by
//! [`OpenSubtitlesClient`](crate::OpenSubtitlesClient) and
//! [`ReqwestTransport`](crate::transport::ReqwestTransport). An empty API key
//! is accepted here and rejected per call, so a client can be constructed
//! before the key is known.

use std::fmt;

use url::Url;

use crate::error::ClientError;
use crate::user_agent;

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.opensubtitles.com/api/v1";

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default whole-request timeout in seconds.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Default cap on response body size (16 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

const MAX_TIMEOUT_SECS: u64 = 3600;

/// Settings shared by the client and its transport.
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    user_agent: String,
    connect_timeout_secs: u64,
    read_timeout_secs: u64,
    max_body_bytes: usize,
}

impl ClientConfig {
    /// Creates a config for the production API with default timeouts.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: user_agent::default_user_agent(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Overrides the API root (used with wiremock in tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Overrides connect and read timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        self.connect_timeout_secs = connect_timeout_secs;
        self.read_timeout_secs = read_timeout_secs;
        self
    }

    /// Overrides the response body cap.
    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// The configured API key (may be empty).
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// True when a non-blank API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// The API root without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The User-Agent sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Connect timeout in seconds.
    #[must_use]
    pub fn connect_timeout_secs(&self) -> u64 {
        self.connect_timeout_secs
    }

    /// Whole-request timeout in seconds.
    #[must_use]
    pub fn read_timeout_secs(&self) -> u64 {
        self.read_timeout_secs
    }

    /// Maximum accepted response body size in bytes.
    #[must_use]
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Joins an endpoint path (with optional query) onto the API root.
    #[must_use]
    pub fn endpoint_url(&self, path_and_query: &str) -> String {
        if path_and_query.starts_with('/') {
            format!("{}{path_and_query}", self.base_url)
        } else {
            format!("{}/{path_and_query}", self.base_url)
        }
    }

    /// Checks the base URL and timeout ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), ClientError> {
        let parsed = Url::parse(&self.base_url)
            .map_err(|e| ClientError::invalid_config("base_url", e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::invalid_config(
                "base_url",
                format!("unsupported scheme `{}`", parsed.scheme()),
            ));
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        if self.max_body_bytes == 0 {
            return Err(ClientError::invalid_config(
                "max_body_bytes",
                "must be greater than zero",
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ClientError::invalid_config(
                "user_agent",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

fn validate_timeout_secs(field: &'static str, value: u64) -> Result<(), ClientError> {
    if !(1..=MAX_TIMEOUT_SECS).contains(&value) {
        return Err(ClientError::invalid_config(
            field,
            format!("{value}. Expected range: 1..={MAX_TIMEOUT_SECS}"),
        ));
    }
    Ok(())
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &if self.has_api_key() { "<set>" } else { "<empty>" })
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("read_timeout_secs", &self.read_timeout_secs)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::new("key");
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.connect_timeout_secs(), DEFAULT_CONNECT_TIMEOUT_SECS);
        assert_eq!(config.read_timeout_secs(), DEFAULT_READ_TIMEOUT_SECS);
        assert!(config.user_agent().starts_with("opensubtitles/"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_api_key_is_not_set() {
        assert!(!ClientConfig::new("").has_api_key());
        assert!(!ClientConfig::new("   ").has_api_key());
        assert!(ClientConfig::new("abc").has_api_key());
    }

    #[test]
    fn test_endpoint_url_joins_with_single_slash() {
        let config = ClientConfig::new("key").with_base_url("http://127.0.0.1:9000/api/v1/");
        assert_eq!(
            config.endpoint_url("/login"),
            "http://127.0.0.1:9000/api/v1/login"
        );
        assert_eq!(
            config.endpoint_url("subtitles?query=x"),
            "http://127.0.0.1:9000/api/v1/subtitles?query=x"
        );
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let err = ClientConfig::new("key")
            .with_base_url("not a url")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfig { field: "base_url", .. }));

        let err = ClientConfig::new("key")
            .with_base_url("ftp://example.com")
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_timeouts() {
        let err = ClientConfig::new("key").with_timeouts(0, 30).validate().unwrap_err();
        assert!(matches!(
            err,
            ClientError::InvalidConfig { field: "connect_timeout_secs", .. }
        ));

        let err = ClientConfig::new("key").with_timeouts(10, 3601).validate().unwrap_err();
        assert!(matches!(
            err,
            ClientError::InvalidConfig { field: "read_timeout_secs", .. }
        ));
    }

    #[test]
    fn test_debug_does_not_leak_api_key() {
        let rendered = format!("{:?}", ClientConfig::new("super-secret-key"));
        assert!(!rendered.contains("super-secret-key"), "{rendered}");
        assert!(rendered.contains("<set>"));
    }
}
