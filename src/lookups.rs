//! Single-request lookups: download links, languages and file fetches.

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::client::{AUTHORIZATION_HEADER, OpenSubtitlesClient, Target};
use crate::envelope::{Outcome, RequestContext};
use crate::error::ClientError;
use crate::models::{Credential, LanguageList, SubtitleDownloadInfo};
use crate::transport::HttpMethod;

impl OpenSubtitlesClient {
    /// Requests a temporary download link for one subtitle file.
    ///
    /// Each successful call counts against the account's daily quota.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::EmptyCredential`] for an empty credential and
    /// [`ClientError::MissingApiKey`] when no API key is configured.
    #[instrument(skip(self, credential, cancel))]
    pub async fn subtitle_link(
        &self,
        file_id: u64,
        credential: &Credential,
        cancel: &CancellationToken,
    ) -> Result<Outcome<SubtitleDownloadInfo>, ClientError> {
        Self::require_credential(credential, "subtitle_link")?;
        self.require_api_key("subtitle_link")?;

        let context = RequestContext::new(HttpMethod::Post, "/download")
            .with_header(AUTHORIZATION_HEADER, credential.as_str())
            .with_body(serde_json::json!({ "file_id": file_id }))
            .with_note(format!("file id: {file_id}"));
        let outcome: Outcome<SubtitleDownloadInfo> =
            self.dispatch(Target::Api, context, cancel).await;

        if let Some(info) = outcome.data() {
            debug!(remaining = info.remaining, "download link issued");
        }
        Ok(outcome)
    }

    /// Lists the subtitle languages the API knows about.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingApiKey`] when no API key is configured.
    #[instrument(skip_all)]
    pub async fn languages(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Outcome<LanguageList>, ClientError> {
        self.require_api_key("languages")?;
        let context = RequestContext::new(HttpMethod::Get, "/infos/languages");
        Ok(self.dispatch(Target::Api, context, cancel).await)
    }

    /// Fetches a subtitle file from a link returned by
    /// [`subtitle_link`](Self::subtitle_link).
    ///
    /// The link is absolute and already signed, so neither the API key nor a
    /// credential is sent.
    #[instrument(skip(self, cancel))]
    pub async fn download_subtitle(&self, url: &str, cancel: &CancellationToken) -> Outcome<Vec<u8>> {
        let context = RequestContext::new(HttpMethod::Get, url);
        self.dispatch(Target::External, context, cancel).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::ClientConfig;
    use crate::envelope::OutcomeKind;
    use crate::test_support::fake_transport::{ScriptedTransport, Step};
    use crate::transport::RawResponse;

    fn client_with(transport: Arc<ScriptedTransport>) -> OpenSubtitlesClient {
        OpenSubtitlesClient::new(
            ClientConfig::new("test-key").with_base_url("https://api.test/api/v1"),
            transport,
        )
    }

    #[tokio::test]
    async fn test_subtitle_link_posts_file_id_with_token() {
        let transport = Arc::new(ScriptedTransport::new([ScriptedTransport::json(
            200,
            serde_json::json!({
                "link": "https://dl.test/file/123.srt",
                "file_name": "movie.srt",
                "requests": 3,
                "remaining": 17,
                "message": "ok"
            }),
        )]));
        let client = client_with(transport.clone());

        let outcome = client
            .subtitle_link(123, &Credential::new("tok"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.data().unwrap().link, "https://dl.test/file/123.srt");
        assert!(outcome.context().notes().iter().any(|n| n == "file id: 123"));
        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://api.test/api/v1/download");
        assert_eq!(request.header("Authorization"), Some("tok"));
        assert_eq!(request.body, Some(serde_json::json!({"file_id": 123})));
    }

    #[tokio::test]
    async fn test_subtitle_link_quota_exhausted_is_server_error() {
        let transport = Arc::new(ScriptedTransport::new([ScriptedTransport::json(
            406,
            serde_json::json!({"message": "You have downloaded your allowed 20 subtitles"}),
        )]));
        let client = client_with(transport);

        let outcome = client
            .subtitle_link(1, &Credential::new("tok"), &CancellationToken::new())
            .await
            .unwrap();

        assert!(matches!(
            outcome.kind(),
            OutcomeKind::ServerError { status: 406, detail: Some(d) } if d.contains("allowed 20")
        ));
    }

    #[tokio::test]
    async fn test_subtitle_link_rejects_empty_credential() {
        let transport = Arc::new(ScriptedTransport::default());
        let client = client_with(transport.clone());

        let err = client
            .subtitle_link(1, &Credential::default(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.is_precondition());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_languages_without_credential() {
        let transport = Arc::new(ScriptedTransport::new([ScriptedTransport::json(
            200,
            serde_json::json!({"data": [
                {"language_code": "en", "language_name": "English"},
                {"language_code": "pt-BR", "language_name": "Portuguese (BR)"}
            ]}),
        )]));
        let client = client_with(transport.clone());

        let outcome = client.languages(&CancellationToken::new()).await.unwrap();

        assert_eq!(outcome.data().unwrap().data.len(), 2);
        let request = &transport.requests()[0];
        assert_eq!(request.header("Authorization"), None);
        assert_eq!(request.header("Api-Key"), Some("test-key"));
    }

    #[tokio::test]
    async fn test_languages_empty_list_is_empty_ok() {
        let transport = Arc::new(ScriptedTransport::new([ScriptedTransport::json(
            200,
            serde_json::json!({"data": []}),
        )]));
        let client = client_with(transport);

        let outcome = client.languages(&CancellationToken::new()).await.unwrap();

        assert!(outcome.is_ok());
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn test_download_subtitle_returns_raw_bytes_without_api_key() {
        let body = b"1\n00:00:01,000 --> 00:00:02,000\nHello\n".to_vec();
        let transport = Arc::new(ScriptedTransport::new([Step::Respond(RawResponse::new(
            200,
            body.clone(),
        ))]));
        let client = client_with(transport.clone());

        let outcome = client
            .download_subtitle("https://dl.test/file/123.srt", &CancellationToken::new())
            .await;

        assert_eq!(outcome.into_data().unwrap(), body);
        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://dl.test/file/123.srt");
        assert_eq!(request.header("Api-Key"), None);
    }

    #[tokio::test]
    async fn test_download_subtitle_gone_link() {
        let transport = Arc::new(ScriptedTransport::new([Step::Respond(RawResponse::new(
            404,
            "",
        ))]));
        let client = client_with(transport);

        let outcome = client
            .download_subtitle("https://dl.test/file/expired.srt", &CancellationToken::new())
            .await;

        assert_eq!(outcome.kind(), &OutcomeKind::NotFound);
    }
}
