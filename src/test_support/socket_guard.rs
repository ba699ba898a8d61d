//! Skips wiremock tests in sandboxes that cannot bind a loopback socket.
//!
//! Set `OPENSUBTITLES_REQUIRE_SOCKET_TESTS=1` in CI to turn a skip into a
//! failure.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_ENV: &str = "OPENSUBTITLES_REQUIRE_SOCKET_TESTS";

fn sockets_required() -> bool {
    std::env::var(REQUIRE_ENV)
        .is_ok_and(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Starts a mock server, or returns `None` after explaining why the test is skipped.
///
/// # Panics
///
/// When loopback sockets are unavailable and the require flag is set.
#[track_caller]
pub fn start_mock_server_or_skip() -> impl Future<Output = Option<MockServer>> {
    let caller = Location::caller();
    let loopback_ok = TcpListener::bind("127.0.0.1:0").is_ok();

    if !loopback_ok {
        let reason = format!(
            "loopback bind failed; skipping wiremock test at {}:{}",
            caller.file(),
            caller.line()
        );
        assert!(!sockets_required(), "{reason} ({REQUIRE_ENV} is set)");
        eprintln!("[socket-guard] {reason}. Set {REQUIRE_ENV}=1 to fail instead.");
    }

    async move {
        if loopback_ok {
            Some(MockServer::start().await)
        } else {
            None
        }
    }
}
