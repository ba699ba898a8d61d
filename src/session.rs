//! Session operations: login, logout and current-user info.

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use crate::client::{AUTHORIZATION_HEADER, OpenSubtitlesClient, Target};
use crate::envelope::{Outcome, RequestContext};
use crate::error::ClientError;
use crate::models::{Credential, LoginInfo, UserInfoResponse};
use crate::transport::HttpMethod;

impl OpenSubtitlesClient {
    /// Exchanges account credentials for a session token.
    ///
    /// Sends `POST /login` without an `Authorization` header. The token is
    /// available as [`LoginInfo::credential`] on an `Ok` outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingApiKey`] when no API key is configured.
    #[instrument(skip(self, password, cancel))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<Outcome<LoginInfo>, ClientError> {
        self.require_api_key("login")?;

        let context = RequestContext::new(HttpMethod::Post, "/login").with_body(
            serde_json::json!({ "username": username, "password": password }),
        );
        let outcome: Outcome<LoginInfo> = self.dispatch(Target::Api, context, cancel).await;

        if let Some(login) = outcome.data() {
            info!(
                user_id = login.user.as_ref().map(|u| u.user_id),
                "logged in"
            );
        }
        Ok(outcome)
    }

    /// Ends the session behind `credential`.
    ///
    /// Sends `DELETE /logout`. On an `Ok` outcome the credential is
    /// invalidated in place and cannot be reused.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::EmptyCredential`] without any network call when
    /// `credential` is empty, and [`ClientError::MissingApiKey`] when no API
    /// key is configured.
    #[instrument(skip_all)]
    pub async fn logout(
        &self,
        credential: &mut Credential,
        cancel: &CancellationToken,
    ) -> Result<Outcome<()>, ClientError> {
        Self::require_credential(credential, "logout")?;
        self.require_api_key("logout")?;

        let context = RequestContext::new(HttpMethod::Delete, "/logout")
            .with_header(AUTHORIZATION_HEADER, credential.as_str());
        let outcome: Outcome<()> = self.dispatch(Target::Api, context, cancel).await;

        if outcome.is_ok() {
            credential.invalidate();
            info!("logged out");
        }
        Ok(outcome)
    }

    /// Fetches quota and level for the logged-in account.
    ///
    /// # Errors
    ///
    /// Same preconditions as [`logout`](Self::logout).
    #[instrument(skip_all)]
    pub async fn user_info(
        &self,
        credential: &Credential,
        cancel: &CancellationToken,
    ) -> Result<Outcome<UserInfoResponse>, ClientError> {
        Self::require_credential(credential, "user_info")?;
        self.require_api_key("user_info")?;

        let context = RequestContext::new(HttpMethod::Get, "/infos/user")
            .with_header(AUTHORIZATION_HEADER, credential.as_str());
        Ok(self.dispatch(Target::Api, context, cancel).await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::envelope::OutcomeKind;
    use crate::test_support::fake_transport::ScriptedTransport;

    fn client_with(transport: Arc<ScriptedTransport>) -> OpenSubtitlesClient {
        OpenSubtitlesClient::new(ClientConfig::new("test-key"), transport)
    }

    #[tokio::test]
    async fn test_login_posts_credentials_without_authorization() {
        let transport = Arc::new(ScriptedTransport::new([ScriptedTransport::json(
            200,
            serde_json::json!({"token": "tok-1", "status": 200, "user": {"user_id": 7}}),
        )]));
        let client = client_with(transport.clone());

        let outcome = client
            .login("alice", "hunter2", &CancellationToken::new())
            .await
            .unwrap();

        let login = outcome.data().unwrap();
        assert_eq!(login.credential.as_str(), "tok-1");
        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.url.ends_with("/login"));
        assert_eq!(request.header("Authorization"), None);
        assert_eq!(
            request.body,
            Some(serde_json::json!({"username": "alice", "password": "hunter2"}))
        );
    }

    #[tokio::test]
    async fn test_login_without_token_is_server_error() {
        let transport = Arc::new(ScriptedTransport::new([ScriptedTransport::json(
            200,
            serde_json::json!({"status": 200}),
        )]));
        let client = client_with(transport);

        let outcome = client
            .login("alice", "pw", &CancellationToken::new())
            .await
            .unwrap();

        assert!(matches!(
            outcome.kind(),
            OutcomeKind::ServerError { status: 502, .. }
        ));
    }

    #[tokio::test]
    async fn test_login_requires_api_key() {
        let transport = Arc::new(ScriptedTransport::default());
        let client = OpenSubtitlesClient::new(ClientConfig::new(""), transport.clone());

        let err = client
            .login("alice", "pw", &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.is_precondition());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_logout_sends_token_verbatim_and_invalidates() {
        let transport = Arc::new(ScriptedTransport::new([ScriptedTransport::json(
            200,
            serde_json::json!({"message": "token successfully destroyed", "status": 200}),
        )]));
        let client = client_with(transport.clone());
        let mut credential = Credential::new("tok-1");

        let outcome = client
            .logout(&mut credential, &CancellationToken::new())
            .await
            .unwrap();

        assert!(outcome.is_ok());
        assert!(credential.is_empty());
        let request = &transport.requests()[0];
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.header("Authorization"), Some("tok-1"));
    }

    #[tokio::test]
    async fn test_failed_logout_keeps_credential() {
        let transport = Arc::new(ScriptedTransport::new([ScriptedTransport::json(
            503,
            serde_json::json!({}),
        )]));
        let client = client_with(transport);
        let mut credential = Credential::new("tok-1");

        let outcome = client
            .logout(&mut credential, &CancellationToken::new())
            .await
            .unwrap();

        assert!(!outcome.is_ok());
        assert_eq!(credential.as_str(), "tok-1");
    }

    #[tokio::test]
    async fn test_empty_credential_fails_without_network_call() {
        let transport = Arc::new(ScriptedTransport::default());
        let client = client_with(transport.clone());
        let cancel = CancellationToken::new();

        let mut empty = Credential::default();
        let err = client.logout(&mut empty, &cancel).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::EmptyCredential {
                operation: "logout"
            }
        ));

        let err = client.user_info(&empty, &cancel).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::EmptyCredential {
                operation: "user_info"
            }
        ));

        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_credential_unusable_after_logout() {
        let transport = Arc::new(ScriptedTransport::new([ScriptedTransport::json(
            200,
            serde_json::json!({}),
        )]));
        let client = client_with(transport.clone());
        let cancel = CancellationToken::new();
        let mut credential = Credential::new("tok-1");

        client.logout(&mut credential, &cancel).await.unwrap();
        let err = client.user_info(&credential, &cancel).await.unwrap_err();

        assert!(err.is_precondition());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_user_info_decodes_quota() {
        let transport = Arc::new(ScriptedTransport::new([ScriptedTransport::json(
            200,
            serde_json::json!({"data": {
                "allowed_downloads": 20,
                "downloads_count": 3,
                "remaining_downloads": 17,
                "level": "Sub leecher",
                "user_id": 7,
                "ext_installed": false,
                "vip": false
            }}),
        )]));
        let client = client_with(transport.clone());

        let outcome = client
            .user_info(&Credential::new("tok-1"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.data().unwrap().data.remaining_downloads, 17);
        assert_eq!(transport.requests()[0].header("Authorization"), Some("tok-1"));
    }

    #[tokio::test]
    async fn test_user_info_unauthorized() {
        let transport = Arc::new(ScriptedTransport::new([ScriptedTransport::json(
            401,
            serde_json::json!({"message": "invalid token"}),
        )]));
        let client = client_with(transport);

        let outcome = client
            .user_info(&Credential::new("stale"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.kind(), &OutcomeKind::Unauthorized);
        assert_eq!(outcome.context().endpoint(), "/infos/user");
    }
}
