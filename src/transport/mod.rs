//! HTTP transport capability.
//!
//! The client never talks to the network directly: every request goes
//! through an injected [`HttpTransport`]. [`ReqwestTransport`] is the
//! production implementation; tests substitute in-memory fakes.
//!
//! A transport performs exactly one request per [`send`](HttpTransport::send)
//! call and never retries. Cancellation is handled by the caller dropping
//! the returned future.

mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;

use std::fmt;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use thiserror::Error;

/// HTTP methods used by the OpenSubtitles API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Upper-case method name as sent on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fully-formed request handed to a transport.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Request method.
    pub method: HttpMethod,
    /// Absolute request URL, query string included.
    pub url: String,
    /// Extra request headers (name, value).
    pub headers: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<serde_json::Value>,
}

impl TransportRequest {
    /// Returns the value of the first header matching `name` case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status, headers and body of a completed exchange.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a response with no headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Creates a response whose body is the serialized `value`.
    #[must_use]
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// Returns a header value as text when present and valid UTF-8.
    #[must_use]
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A request that produced no HTTP status at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    /// The caller's cancellation signal fired before a response arrived.
    #[error("request cancelled")]
    Cancelled,

    /// The request exceeded its deadline.
    #[error("request timed out")]
    Timeout,

    /// The connection could not be established.
    #[error("connection failed: {message}")]
    Connect {
        /// Underlying error description.
        message: String,
    },

    /// The response body exceeded the configured size cap.
    #[error("response body exceeded {limit} bytes")]
    BodyTooLarge {
        /// The configured cap in bytes.
        limit: usize,
    },

    /// The request could not be built (malformed URL or header).
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Why the request was rejected.
        message: String,
    },

    /// Any other network-level failure.
    #[error("network error: {message}")]
    Other {
        /// Underlying error description.
        message: String,
    },
}

impl TransportFailure {
    /// Creates a `Connect` failure.
    #[must_use]
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect {
            message: message.into(),
        }
    }

    /// Creates an `InvalidRequest` failure.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates an `Other` failure.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Performs single HTTP exchanges for the client.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends `request` and returns the raw response or a transport failure.
    ///
    /// Non-2xx statuses are responses, not failures.
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportFailure>;
}
