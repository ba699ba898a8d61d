//! The API client and its single dispatch path.
//!
//! [`OpenSubtitlesClient`] owns the configuration and an injected
//! [`HttpTransport`]. Operations live in [`session`](crate::session),
//! [`search`](crate::search) and [`lookups`](crate::lookups); all of them
//! send through [`OpenSubtitlesClient::dispatch`], which applies the common
//! headers, races the transport against the caller's cancellation token and
//! classifies the result.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::config::ClientConfig;
use crate::envelope::{ApiPayload, Outcome, RequestContext, classify};
use crate::error::ClientError;
use crate::models::Credential;
use crate::transport::{HttpTransport, ReqwestTransport, TransportFailure, TransportRequest};

/// Header carrying the consumer API key.
pub const API_KEY_HEADER: &str = "Api-Key";

/// Header carrying the session token (no `Bearer ` prefix).
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Where a request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    /// Relative to the configured API root; carries the API key.
    Api,
    /// Absolute URL outside the API (file downloads); no API key.
    External,
}

/// Client for the OpenSubtitles REST API.
///
/// Cheap to clone; clones share the transport.
///
/// # Example
///
/// ```no_run
/// use opensubtitles_core::{ClientConfig, OpenSubtitlesClient, SearchOptions};
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = OpenSubtitlesClient::with_reqwest(ClientConfig::new("my-api-key"))?;
/// let options = SearchOptions::new().with("query", "The Matrix").with("languages", "en");
/// let result = client.search(&options, &CancellationToken::new()).await?;
/// println!("{} hits, complete: {}", result.records.len(), result.is_complete());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct OpenSubtitlesClient {
    config: ClientConfig,
    transport: Arc<dyn HttpTransport>,
}

impl OpenSubtitlesClient {
    /// Creates a client over an arbitrary transport.
    #[must_use]
    pub fn new(config: ClientConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    /// Creates a client over a [`ReqwestTransport`] built from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn with_reqwest(config: ClientConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fails with [`ClientError::MissingApiKey`] when no key is configured.
    pub(crate) fn require_api_key(&self, operation: &'static str) -> Result<(), ClientError> {
        if self.config.has_api_key() {
            Ok(())
        } else {
            error!(operation, "API operation called without an API key");
            Err(ClientError::missing_api_key(operation))
        }
    }

    /// Fails with [`ClientError::EmptyCredential`] for empty tokens.
    pub(crate) fn require_credential(
        credential: &Credential,
        operation: &'static str,
    ) -> Result<(), ClientError> {
        if credential.is_empty() {
            error!(operation, "authenticated operation called with an empty credential");
            Err(ClientError::empty_credential(operation))
        } else {
            Ok(())
        }
    }

    /// Sends one request described by `context` and classifies the result.
    ///
    /// An already-cancelled token short-circuits without touching the
    /// transport; cancellation during the call drops the in-flight future.
    pub(crate) async fn dispatch<T: ApiPayload>(
        &self,
        target: Target,
        context: RequestContext,
        cancel: &CancellationToken,
    ) -> Outcome<T> {
        let request = self.build_request(target, &context);
        debug!(
            method = %request.method,
            endpoint = %context.endpoint(),
            attempt = context.attempt(),
            "sending request"
        );

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(TransportFailure::Cancelled),
            result = self.transport.send(request) => result,
        };

        classify(result, context)
    }

    fn build_request(&self, target: Target, context: &RequestContext) -> TransportRequest {
        let (url, mut headers) = match target {
            Target::Api => (
                self.config.endpoint_url(context.endpoint()),
                vec![(API_KEY_HEADER.to_string(), self.config.api_key().to_string())],
            ),
            Target::External => (context.endpoint().to_string(), Vec::new()),
        };
        headers.extend(context.headers().iter().cloned());

        TransportRequest {
            method: context.method(),
            url,
            headers,
            body: context.body().cloned(),
        }
    }
}

impl fmt::Debug for OpenSubtitlesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenSubtitlesClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
