//! Per-request diagnostic context.

use std::fmt;

use crate::transport::HttpMethod;

/// Header names whose values never appear in debug output.
const SENSITIVE_HEADERS: &[&str] = &["authorization", "api-key"];

/// Body fields whose values never appear in debug output.
const SENSITIVE_BODY_FIELDS: &[&str] = &["password", "token"];

/// Immutable description of one logical request.
///
/// Built once per operation call with the `with_*` builders and then only
/// read: it travels inside every [`Outcome`](super::Outcome) so failures can
/// be logged and inspected with the request that caused them.
#[derive(Clone, PartialEq)]
pub struct RequestContext {
    endpoint: String,
    method: HttpMethod,
    body: Option<serde_json::Value>,
    headers: Vec<(String, String)>,
    attempt: u32,
    notes: Vec<String>,
}

impl RequestContext {
    /// Creates a first-attempt context for `method endpoint`.
    #[must_use]
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            body: None,
            headers: Vec::new(),
            attempt: 1,
            notes: Vec::new(),
        }
    }

    /// Attaches a JSON request body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds a free-form diagnostic note such as `page: 2`.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Endpoint path, or the absolute URL for file downloads.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request method.
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// JSON body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Extra headers sent with the request.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Attempt number, starting at 1.
    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Diagnostic notes in insertion order.
    #[must_use]
    pub fn notes(&self) -> &[String] {
        &self.notes
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if SENSITIVE_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                    (name.as_str(), "<redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();

        f.debug_struct("RequestContext")
            .field("endpoint", &self.endpoint)
            .field("method", &self.method)
            .field("body", &self.body.as_ref().map(redact_body))
            .field("headers", &headers)
            .field("attempt", &self.attempt)
            .field("notes", &self.notes)
            .finish()
    }
}

fn redact_body(body: &serde_json::Value) -> serde_json::Value {
    let mut redacted = body.clone();
    if let Some(object) = redacted.as_object_mut() {
        for field in SENSITIVE_BODY_FIELDS {
            if let Some(value) = object.get_mut(*field) {
                *value = serde_json::Value::String("<redacted>".to_string());
            }
        }
    }
    redacted
}
