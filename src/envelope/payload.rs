//! Decoding of success bodies into typed payloads.

use serde::de::DeserializeOwned;

/// A type that can be produced from a 2xx response body.
///
/// `Default` supplies the value reported for blank bodies.
pub trait ApiPayload: Default + Sized {
    /// Decodes a non-blank body.
    ///
    /// # Errors
    ///
    /// Returns the decoder error when the body does not match the expected shape.
    fn decode(body: &[u8]) -> Result<Self, serde_json::Error>;

    /// True when `body` carries no payload at all.
    fn is_blank_body(body: &[u8]) -> bool {
        is_blank_json(body)
    }

    /// True when a decoded payload is a recognized "no data" shape.
    fn is_empty_payload(&self) -> bool {
        false
    }
}

/// Decodes a JSON body with serde.
///
/// # Errors
///
/// Returns the serde error on malformed or mismatched JSON.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Zero-length, whitespace-only, and literal `null` bodies are blank.
#[must_use]
pub fn is_blank_json(body: &[u8]) -> bool {
    let trimmed = body.trim_ascii();
    trimmed.is_empty() || trimmed == b"null"
}

/// Acknowledgement-only endpoints: any success body is accepted.
impl ApiPayload for () {
    fn decode(_body: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(())
    }
}

/// Raw bytes (subtitle files).
impl ApiPayload for Vec<u8> {
    fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        Ok(body.to_vec())
    }

    fn is_blank_body(body: &[u8]) -> bool {
        body.is_empty()
    }

    fn is_empty_payload(&self) -> bool {
        self.is_empty()
    }
}

/// Untyped JSON.
impl ApiPayload for serde_json::Value {
    fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        decode_json(body)
    }

    fn is_empty_payload(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Array(items) => items.is_empty(),
            Self::Object(fields) => fields.is_empty(),
            _ => false,
        }
    }
}
