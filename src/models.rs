//! Wire types for the OpenSubtitles REST API v1.
//!
//! Only the fields this crate needs are typed. Search hits stay opaque
//! ([`ResultRecord`]) and are passed through unmodified.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::envelope::{ApiPayload, decode_json};

// ==================== Session ====================

/// Bearer token issued by `/login`.
///
/// Sent verbatim in the `Authorization` header. Empty tokens are rejected
/// by every authenticated operation; [`invalidate`](Self::invalidate) empties
/// the token after a successful logout.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wraps an existing token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the token is missing or blank.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Clears the token so it can no longer authenticate requests.
    pub fn invalidate(&mut self) {
        self.0.clear();
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}

/// Response body of `POST /login`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoginInfo {
    /// Session token.
    #[serde(rename = "token")]
    pub credential: Credential,
    /// Account summary.
    #[serde(default)]
    pub user: Option<LoginUser>,
    /// Host VIP accounts should use instead of the public one.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Status echoed by the API.
    #[serde(default)]
    pub status: Option<u16>,
}

/// Account summary embedded in the login response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LoginUser {
    /// Daily download allowance.
    #[serde(default)]
    pub allowed_downloads: i64,
    /// Account level label.
    #[serde(default)]
    pub level: String,
    /// Numeric user id.
    #[serde(default)]
    pub user_id: i64,
    /// Whether the browser extension is installed.
    #[serde(default)]
    pub ext_installed: bool,
    /// VIP membership.
    #[serde(default)]
    pub vip: bool,
}

impl ApiPayload for LoginInfo {
    fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        decode_json(body)
    }
}

/// Response body of `GET /infos/user`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserInfoResponse {
    /// The user record.
    pub data: UserInfo,
}

/// Current account quota and level.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserInfo {
    /// Daily download allowance.
    #[serde(default)]
    pub allowed_downloads: i64,
    /// Downloads used today.
    #[serde(default)]
    pub downloads_count: i64,
    /// Downloads left today.
    #[serde(default)]
    pub remaining_downloads: i64,
    /// Account level label.
    #[serde(default)]
    pub level: String,
    /// Numeric user id.
    #[serde(default)]
    pub user_id: i64,
    /// Whether the browser extension is installed.
    #[serde(default)]
    pub ext_installed: bool,
    /// VIP membership.
    #[serde(default)]
    pub vip: bool,
}

impl ApiPayload for UserInfoResponse {
    fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        decode_json(body)
    }
}

// ==================== Lookups ====================

/// Response body of `GET /infos/languages`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LanguageList {
    /// Supported languages.
    #[serde(default)]
    pub data: Vec<LanguageInfo>,
}

/// One supported subtitle language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageInfo {
    /// Code accepted by the `languages` search option.
    pub language_code: String,
    /// English display name.
    pub language_name: String,
}

impl ApiPayload for LanguageList {
    fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        decode_json(body)
    }

    fn is_empty_payload(&self) -> bool {
        self.data.is_empty()
    }
}

/// Response body of `POST /download`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubtitleDownloadInfo {
    /// Temporary absolute URL of the subtitle file.
    pub link: String,
    /// Suggested file name.
    #[serde(default)]
    pub file_name: String,
    /// Downloads counted against the quota so far.
    #[serde(default)]
    pub requests: i64,
    /// Downloads left in the quota.
    #[serde(default)]
    pub remaining: i64,
    /// Quota message from the API.
    #[serde(default)]
    pub message: String,
    /// Human-readable quota reset time.
    #[serde(default)]
    pub reset_time: String,
    /// Quota reset time in UTC.
    #[serde(default)]
    pub reset_time_utc: String,
}

impl ApiPayload for SubtitleDownloadInfo {
    fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        decode_json(body)
    }
}

// ==================== Search ====================

/// One page of `GET /subtitles`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchPage {
    /// Hits on this page.
    #[serde(rename = "data", default)]
    pub records: Vec<ResultRecord>,
    /// Page number the server says it returned.
    #[serde(rename = "page", default)]
    pub current_page: u32,
    /// Total pages for the query; 0 means no results.
    #[serde(default)]
    pub total_pages: u32,
    /// Total hits for the query.
    #[serde(default)]
    pub total_count: u32,
}

impl ApiPayload for SearchPage {
    fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        decode_json(body)
    }

    fn is_empty_payload(&self) -> bool {
        self.records.is_empty() && self.total_pages == 0
    }
}

/// One search hit, kept exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultRecord(serde_json::Value);

impl ResultRecord {
    /// Wraps a raw JSON hit.
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The raw JSON hit.
    #[must_use]
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    /// Consumes the record, returning the raw JSON.
    #[must_use]
    pub fn into_json(self) -> serde_json::Value {
        self.0
    }

    /// The hit's `id`, which the API sends as a string.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(serde_json::Value::as_str)
    }

    /// File ids under `attributes.files[].file_id`, usable with
    /// [`subtitle_link`](crate::OpenSubtitlesClient::subtitle_link).
    #[must_use]
    pub fn file_ids(&self) -> Vec<u64> {
        self.0
            .pointer("/attributes/files")
            .and_then(serde_json::Value::as_array)
            .map(|files| {
                files
                    .iter()
                    .filter_map(|file| file.get("file_id").and_then(serde_json::Value::as_u64))
                    .collect()
            })
            .unwrap_or_default()
    }
}
