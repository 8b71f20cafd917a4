//! Error types shared by every translation call.

use thiserror::Error;

/// Errors returned by the AS1 translators.
///
/// Every variant is reported synchronously to the caller of the translation
/// that raised it. Translations never return partial results.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed DID, AT-URI, bech32 string or hex id.
    #[error("invalid identifier {value:?}: {reason}")]
    InvalidIdentifier { value: String, reason: String },

    /// AS1 `(objectType, verb)` combination the target platform does not model.
    #[error("unsupported AS1 activity: objectType {object_type:?}, verb {verb:?}")]
    UnsupportedActivity {
        object_type: Option<String>,
        verb: Option<String>,
    },

    /// Wire type tag the translator does not model.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// Nostr event kind the translator does not model.
    #[error("unsupported event kind: {0}")]
    UnsupportedKind(u16),

    /// Markup content where only plain-text offsets are defined.
    #[error("unsupported content: {0}")]
    UnsupportedContent(String),

    /// A field the target schema requires is absent and cannot be defaulted.
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// Combination of attachments the target format cannot express.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// Claimed event id disagrees with the recomputed canonical id.
    #[error("event id mismatch: claimed {claimed}, computed {computed}")]
    IdMismatch { claimed: String, computed: String },

    /// Wire document does not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build an [`Error::InvalidIdentifier`].
    pub fn invalid_id(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used across the translation crates.
pub type Result<T> = std::result::Result<T, Error>;
