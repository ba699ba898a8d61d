#![allow(clippy::unwrap_used, dead_code)]

pub mod fake_transport;
pub mod socket_guard;

use crate::transport::{HttpTransport, RawResponse, TransportFailure, TransportRequest};
