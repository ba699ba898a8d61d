//! In-memory transport that replays scripted replies.
//!
//! Shared by unit tests and, via `#[path]`, the integration tests; the
//! parent module supplies the transport types.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{HttpTransport, RawResponse, TransportFailure, TransportRequest};

/// One scripted reply.
pub enum Step {
    Respond(RawResponse),
    Fail(TransportFailure),
    /// Never completes; only a cancellation can end the call.
    Hang,
}

/// Replays scripted replies in order and records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<TransportRequest>>,
    cancel_on_call: Mutex<Option<(usize, CancellationToken)>>,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: Mutex::new(steps.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn json(status: u16, value: serde_json::Value) -> Step {
        Step::Respond(RawResponse::json(status, &value))
    }

    /// Cancels `token` while the `call`-th request (1-based) is in flight.
    pub fn cancel_during_call(&self, call: usize, token: CancellationToken) {
        *self.cancel_on_call.lock().unwrap() = Some((call, token));
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<RawResponse, TransportFailure> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };

        let cancel = self
            .cancel_on_call
            .lock()
            .unwrap()
            .as_ref()
            .filter(|(at, _)| *at == call)
            .map(|(_, token)| token.clone());
        if let Some(token) = cancel {
            token.cancel();
            std::future::pending::<()>().await;
        }

        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(failure)) => Err(failure),
            Some(Step::Hang) => std::future::pending().await,
            None => Err(TransportFailure::other("script exhausted")),
        }
    }
}
