//! Offset key codec.
//!
//! Composite sort keys are `<bucket>:<value>`; the offset key handed to
//! callers is an opaque, URL-safe token naming the last item of a page.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::Position;

/// Separator between the fields of a composite key.
pub const KEY_SEPARATOR: char = ':';

/// Upper bound on the length of an encoded offset key.
pub const MAX_CURSOR_LEN: usize = 4 * 1024;

/// Errors raised while decoding an offset key.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CursorError {
    #[error("offset key is empty")]
    Empty,
    #[error("offset key exceeds max length: {len} bytes (max {max})")]
    TooLong { len: usize, max: usize },
    #[error("offset key is not valid base64: {0}")]
    Encoding(String),
    #[error("offset key payload is invalid: {0}")]
    Payload(String),
}

/// Decoded offset key.
///
/// `value` is the value component of the sort or index key (bucket
/// stripped). `id` is the tie-break identifier, present only for
/// secondary-index pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    #[serde(rename = "v")]
    pub value: String,
    #[serde(rename = "i", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Cursor {
    pub fn new(value: impl Into<String>, id: Option<String>) -> Self {
        Self {
            value: value.into(),
            id,
        }
    }

    /// Encodes the cursor as an opaque token.
    pub fn encode(&self) -> String {
        // Serializing two strings cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decodes a token produced by [`Cursor::encode`].
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(CursorError::Empty);
        }
        if token.len() > MAX_CURSOR_LEN {
            return Err(CursorError::TooLong {
                len: token.len(),
                max: MAX_CURSOR_LEN,
            });
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| CursorError::Encoding(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| CursorError::Payload(e.to_string()))
    }
}

/// Composes and splits the keys of one query shape.
///
/// A codec with a bucket prefixes every value with `<bucket>:`; a plain
/// codec uses values as keys verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyCodec {
    bucket: Option<String>,
}

impl KeyCodec {
    /// Codec for keys without a bucket prefix.
    pub fn plain() -> Self {
        Self { bucket: None }
    }

    /// Codec for keys of the form `<bucket>:<value>`.
    pub fn bucketed(bucket: impl Into<String>) -> Self {
        Self {
            bucket: Some(bucket.into()),
        }
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// Builds the full key for a value component.
    pub fn compose(&self, value: &str) -> String {
        match &self.bucket {
            Some(bucket) => format!("{bucket}{KEY_SEPARATOR}{value}"),
            None => value.to_string(),
        }
    }

    /// Strips the bucket prefix from a full key.
    ///
    /// Returns `None` when the key does not belong to this codec's bucket.
    /// The value component may itself contain separators.
    pub fn value_component<'a>(&self, key: &'a str) -> Option<&'a str> {
        match &self.bucket {
            Some(bucket) => key
                .strip_prefix(bucket.as_str())
                .and_then(|rest| rest.strip_prefix(KEY_SEPARATOR)),
            None => Some(key),
        }
    }

    /// Cursor naming a position in the index.
    pub fn cursor_for(&self, position: &Position) -> Option<Cursor> {
        self.value_component(&position.value)
            .map(|value| Cursor::new(value, Some(position.id.clone())))
    }

    /// Position named by an index cursor; `None` if the cursor has no id.
    pub fn position_of(&self, cursor: &Cursor) -> Option<Position> {
        cursor
            .id
            .as_ref()
            .map(|id| Position::new(self.compose(&cursor.value), id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_with_bucket() {
        let codec = KeyCodec::bucketed("activity-1");
        assert_eq!(
            codec.compose("2024-03-01T09:30:00.000Z"),
            "activity-1:2024-03-01T09:30:00.000Z"
        );
    }

    #[test]
    fn test_compose_plain() {
        let codec = KeyCodec::plain();
        assert_eq!(codec.compose("2024-03-01"), "2024-03-01");
    }

    #[test]
    fn test_value_component_keeps_inner_separators() {
        let codec = KeyCodec::bucketed("referent-1:survey");
        assert_eq!(
            codec.value_component("referent-1:survey:2024-03-01T09:30:00.000Z"),
            Some("2024-03-01T09:30:00.000Z")
        );
    }

    #[test]
    fn test_value_component_rejects_other_bucket() {
        let codec = KeyCodec::bucketed("activity-1");
        assert_eq!(codec.value_component("activity-10:2024"), None);
        assert_eq!(codec.value_component("activity-2:2024"), None);
    }

    #[test]
    fn test_cursor_token_is_url_safe() {
        let cursor = Cursor::new("2024-03-01T09:30:00.000Z", Some("guid/with+chars?".into()));
        let token = cursor.encode();

        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(Cursor::decode(&token).unwrap(), cursor);
    }

    #[test]
    fn test_direct_cursor_omits_id() {
        let cursor = Cursor::new("2024-03-01", None);
        let bytes = URL_SAFE_NO_PAD.decode(cursor.encode()).unwrap();
        assert_eq!(bytes, br#"{"v":"2024-03-01"}"#);
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(Cursor::decode("  "), Err(CursorError::Empty));
    }

    #[test]
    fn test_decode_too_long() {
        let token = "a".repeat(MAX_CURSOR_LEN + 1);
        assert_eq!(
            Cursor::decode(&token),
            Err(CursorError::TooLong {
                len: MAX_CURSOR_LEN + 1,
                max: MAX_CURSOR_LEN
            })
        );
    }

    #[test]
    fn test_decode_invalid_base64() {
        assert!(matches!(
            Cursor::decode("not base64!"),
            Err(CursorError::Encoding(_))
        ));
    }

    #[test]
    fn test_decode_invalid_payload() {
        let token = URL_SAFE_NO_PAD.encode(b"[1,2,3]");
        assert!(matches!(
            Cursor::decode(&token),
            Err(CursorError::Payload(_))
        ));
    }

    #[test]
    fn test_cursor_for_and_position_of() {
        let codec = KeyCodec::bucketed("referent-1:survey");
        let position = Position::new("referent-1:survey:2024-03-01T09:30:00.000Z", "guid-7");

        let cursor = codec.cursor_for(&position).unwrap();
        assert_eq!(cursor.value, "2024-03-01T09:30:00.000Z");
        assert_eq!(cursor.id.as_deref(), Some("guid-7"));
        assert_eq!(codec.position_of(&cursor), Some(position));
    }

    #[test]
    fn test_position_of_requires_id() {
        let codec = KeyCodec::plain();
        assert_eq!(codec.position_of(&Cursor::new("2024", None)), None);
    }
}
