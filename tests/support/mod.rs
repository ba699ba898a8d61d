//! Shared helpers for integration tests.
//!
//! Each test binary compiles its own copy and uses a subset.

#![allow(dead_code, clippy::unwrap_used)]

#[path = "../../src/test_support/fake_transport.rs"]
pub mod fake_transport;
#[path = "../../src/test_support/socket_guard.rs"]
pub mod socket_guard;

use opensubtitles_core::{
    ClientConfig, HttpTransport, RawResponse, TransportFailure, TransportRequest,
};

/// API key used by every integration test.
pub const TEST_API_KEY: &str = "integration-key";

/// Config pointing at `base_url` with the test key.
pub fn test_config(base_url: &str) -> ClientConfig {
    ClientConfig::new(TEST_API_KEY).with_base_url(base_url)
}

/// One `/subtitles` page body.
pub fn search_page(page: u32, total_pages: u32, ids: &[&str]) -> serde_json::Value {
    let data: Vec<_> = ids
        .iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "type": "subtitle",
                "attributes": {
                    "language": "en",
                    "files": [{"file_id": 1000 + page, "file_name": format!("{id}.srt")}]
                }
            })
        })
        .collect();
    serde_json::json!({
        "total_pages": total_pages,
        "total_count": data.len(),
        "per_page": 60,
        "page": page,
        "data": data,
    })
}
