//! [`HttpTransport`] backed by a pooled `reqwest` client.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use tracing::{debug, instrument};

use super::{HttpMethod, HttpTransport, RawResponse, TransportFailure, TransportRequest};
use crate::config::ClientConfig;
use crate::error::ClientError;

/// Production transport.
///
/// Created once and shared; reqwest pools connections internally.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    max_body_bytes: usize,
}

impl ReqwestTransport {
    /// Builds a transport using the timeouts, User-Agent and body cap from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] for out-of-range settings and
    /// [`ClientError::HttpClientBuild`] when reqwest rejects the builder.
    #[instrument(level = "debug", skip_all, fields(base_url = %config.base_url()))]
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs()))
            .timeout(Duration::from_secs(config.read_timeout_secs()))
            .gzip(true)
            .user_agent(config.user_agent())
            .build()
            .map_err(|source| ClientError::HttpClientBuild { source })?;
        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes(),
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(level = "debug", skip_all, fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportFailure> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .header(ACCEPT, "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").json(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();

        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(TransportFailure::BodyTooLarge {
                limit: self.max_body_bytes,
            });
        }

        let body = read_body_capped(response, self.max_body_bytes).await?;
        debug!(status, bytes = body.len(), "response received");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

async fn read_body_capped(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, TransportFailure> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        if body.len() + chunk.len() > limit {
            return Err(TransportFailure::BodyTooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn map_reqwest_error(error: reqwest::Error) -> TransportFailure {
    if error.is_timeout() {
        TransportFailure::Timeout
    } else if error.is_connect() {
        TransportFailure::connect(error.to_string())
    } else if error.is_builder() {
        TransportFailure::invalid_request(error.to_string())
    } else {
        TransportFailure::other(error.to_string())
    }
}
