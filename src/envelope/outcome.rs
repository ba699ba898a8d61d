//! The uniform result type returned by every API operation.

use std::time::Duration;

use super::RequestContext;
use crate::transport::TransportFailure;

/// Classification of one request/response cycle.
///
/// Exactly one variant is active. `Ok { is_empty: true }` means the server
/// answered with a recognized "no data" shape; decode failures are never
/// reported as `Ok`.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeKind<T> {
    /// 2xx with a decodable body.
    Ok {
        /// Decoded payload (`T::default()` for blank bodies).
        data: T,
        /// True when the server returned a recognized empty shape.
        is_empty: bool,
    },
    /// 400 or 422.
    ValidationError {
        /// Upstream-supplied explanation.
        details: String,
    },
    /// 401 or 403.
    Unauthorized,
    /// 429. The hint is surfaced, never acted on.
    RateLimited {
        /// Parsed `Retry-After` header, capped at one hour.
        retry_after: Option<Duration>,
    },
    /// 404.
    NotFound,
    /// 5xx, unrecognized statuses and undecodable success bodies.
    ServerError {
        /// HTTP status, or [`PARSE_FAILURE_STATUS`](super::PARSE_FAILURE_STATUS).
        status: u16,
        /// Body excerpt or decoder message.
        detail: Option<String>,
    },
    /// No HTTP status was obtained.
    TransportError(TransportFailure),
}

impl<T> OutcomeKind<T> {
    /// Short stable label used in logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok { .. } => "ok",
            Self::ValidationError { .. } => "validation_error",
            Self::Unauthorized => "unauthorized",
            Self::RateLimited { .. } => "rate_limited",
            Self::NotFound => "not_found",
            Self::ServerError { .. } => "server_error",
            Self::TransportError(_) => "transport_error",
        }
    }

    /// True for the `Ok` variant.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// Maps the payload of an `Ok` kind, leaving failures untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OutcomeKind<U> {
        match self {
            Self::Ok { data, is_empty } => OutcomeKind::Ok {
                data: f(data),
                is_empty,
            },
            Self::ValidationError { details } => OutcomeKind::ValidationError { details },
            Self::Unauthorized => OutcomeKind::Unauthorized,
            Self::RateLimited { retry_after } => OutcomeKind::RateLimited { retry_after },
            Self::NotFound => OutcomeKind::NotFound,
            Self::ServerError { status, detail } => OutcomeKind::ServerError { status, detail },
            Self::TransportError(failure) => OutcomeKind::TransportError(failure),
        }
    }
}

/// An [`OutcomeKind`] together with the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    context: RequestContext,
    kind: OutcomeKind<T>,
}

impl<T> Outcome<T> {
    /// Pairs a classification with its request context.
    #[must_use]
    pub fn new(context: RequestContext, kind: OutcomeKind<T>) -> Self {
        Self { context, kind }
    }

    /// The request that produced this outcome.
    #[must_use]
    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    /// The classification.
    #[must_use]
    pub fn kind(&self) -> &OutcomeKind<T> {
        &self.kind
    }

    /// Consumes the outcome, returning the classification.
    #[must_use]
    pub fn into_kind(self) -> OutcomeKind<T> {
        self.kind
    }

    /// Consumes the outcome, returning context and classification.
    #[must_use]
    pub fn into_parts(self) -> (RequestContext, OutcomeKind<T>) {
        (self.context, self.kind)
    }

    /// True for `Ok`.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.kind.is_ok()
    }

    /// True for `Ok { is_empty: true }`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, OutcomeKind::Ok { is_empty: true, .. })
    }

    /// True when the request ended because the caller cancelled it.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self.kind,
            OutcomeKind::TransportError(TransportFailure::Cancelled)
        )
    }

    /// The payload of an `Ok` outcome.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match &self.kind {
            OutcomeKind::Ok { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Consumes the outcome, returning the payload of an `Ok` outcome.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self.kind {
            OutcomeKind::Ok { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Maps the payload, keeping the context.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            context: self.context,
            kind: self.kind.map(f),
        }
    }
}
