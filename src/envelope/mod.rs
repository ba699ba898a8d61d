//! Response envelope: classification of raw exchanges into [`Outcome`]s.
//!
//! Every API call funnels its transport result through [`classify`], which
//! maps it to exactly one [`OutcomeKind`]:
//!
//! | Input                               | Outcome                         |
//! |-------------------------------------|---------------------------------|
//! | 2xx, decodable body                 | `Ok { is_empty: payload empty }`|
//! | 2xx, blank body                     | `Ok { default, is_empty: true }`|
//! | 2xx, undecodable body               | `ServerError { status: 502 }`   |
//! | 400, 422                            | `ValidationError`               |
//! | 401, 403                            | `Unauthorized`                  |
//! | 404                                 | `NotFound`                      |
//! | 429                                 | `RateLimited`                   |
//! | anything else                       | `ServerError { status }`        |
//! | no status (transport failure)       | `TransportError`                |
//!
//! Classification never retries. Non-`Ok` outcomes are logged once with the
//! endpoint and attempt number from the [`RequestContext`].

mod context;
mod outcome;
mod payload;

pub use context::RequestContext;
pub use outcome::{Outcome, OutcomeKind};
pub use payload::{ApiPayload, decode_json, is_blank_json};

use std::time::Duration;

use tracing::{debug, warn};

use crate::transport::{RawResponse, TransportFailure};

/// Status reported when a 2xx body cannot be decoded (Bad Gateway).
pub const PARSE_FAILURE_STATUS: u16 = 502;

/// Longest upstream detail text kept in an outcome.
const MAX_DETAIL_CHARS: usize = 512;

/// Upper bound applied to `Retry-After` hints.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(3600);

/// Classifies one transport result.
pub fn classify<T: ApiPayload>(
    result: Result<RawResponse, TransportFailure>,
    context: RequestContext,
) -> Outcome<T> {
    let kind = match result {
        Ok(response) => classify_response(&response),
        Err(failure) => OutcomeKind::TransportError(failure),
    };

    if kind.is_ok() {
        debug!(
            endpoint = %context.endpoint(),
            method = %context.method(),
            "request succeeded"
        );
    } else {
        warn!(
            endpoint = %context.endpoint(),
            method = %context.method(),
            attempt = context.attempt(),
            outcome = kind.label(),
            notes = ?context.notes(),
            "request did not succeed"
        );
    }

    Outcome::new(context, kind)
}

fn classify_response<T: ApiPayload>(response: &RawResponse) -> OutcomeKind<T> {
    match response.status {
        200..=299 => decode_success(&response.body),
        400 | 422 => OutcomeKind::ValidationError {
            details: extract_detail(&response.body)
                .unwrap_or_else(|| format!("HTTP {} without details", response.status)),
        },
        401 | 403 => OutcomeKind::Unauthorized,
        404 => OutcomeKind::NotFound,
        429 => OutcomeKind::RateLimited {
            retry_after: response.header_str("retry-after").and_then(parse_retry_after),
        },
        status => OutcomeKind::ServerError {
            status,
            detail: extract_detail(&response.body),
        },
    }
}

fn decode_success<T: ApiPayload>(body: &[u8]) -> OutcomeKind<T> {
    if T::is_blank_body(body) {
        return OutcomeKind::Ok {
            data: T::default(),
            is_empty: true,
        };
    }

    match T::decode(body) {
        Ok(data) => {
            let is_empty = data.is_empty_payload();
            OutcomeKind::Ok { data, is_empty }
        }
        Err(error) => OutcomeKind::ServerError {
            status: PARSE_FAILURE_STATUS,
            detail: Some(format!("undecodable success body: {error}")),
        },
    }
}

/// Pulls a human-readable explanation out of an error body.
///
/// Prefers the JSON `message` field and `errors` list the API uses, falling
/// back to the raw text.
fn extract_detail(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let detail = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::Object(fields)) => {
            let mut parts = Vec::new();
            if let Some(message) = fields.get("message").and_then(|m| m.as_str()) {
                parts.push(message.to_string());
            }
            if let Some(errors) = fields.get("errors").and_then(|e| e.as_array()) {
                parts.extend(
                    errors
                        .iter()
                        .map(|e| e.as_str().map_or_else(|| e.to_string(), str::to_string)),
                );
            }
            if parts.is_empty() {
                text.to_string()
            } else {
                parts.join("; ")
            }
        }
        _ => text.to_string(),
    };

    Some(truncate_chars(&detail, MAX_DETAIL_CHARS))
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}

/// Parses a `Retry-After` value given as delta-seconds or an HTTP-date.
///
/// Negative values and dates in the past yield `None`; hints longer than one
/// hour are capped.
#[must_use]
pub fn parse_retry_after(header_value: &str) -> Option<Duration> {
    let header_value = header_value.trim();

    if let Ok(seconds) = header_value.parse::<i64>() {
        if seconds < 0 {
            debug!(seconds, "negative Retry-After value, ignoring");
            return None;
        }
        #[allow(clippy::cast_sign_loss)]
        let duration = Duration::from_secs(seconds as u64);
        return Some(duration.min(MAX_RETRY_AFTER));
    }

    let datetime = httpdate::parse_http_date(header_value).ok()?;
    match datetime.duration_since(std::time::SystemTime::now()) {
        Ok(duration) => Some(duration.min(MAX_RETRY_AFTER)),
        Err(_) => {
            debug!(header_value, "Retry-After date is in the past, ignoring");
            None
        }
    }
}
