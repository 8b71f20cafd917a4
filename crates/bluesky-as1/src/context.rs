use std::collections::BTreeMap;

use serde_json::Value;

/// PDS used for blob URLs when the caller doesn't name one.
pub const DEFAULT_PDS: &str = "https://bsky.social";

/// Context for decoding Bluesky records and views into AS1.
///
/// Records don't say whose repository they came from, so the repository's
/// DID and handle are supplied here. `type_override` names the wire type
/// for documents whose `$type` was stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeContext {
    pub repo_did: Option<String>,
    pub repo_handle: Option<String>,
    /// PDS host for blob URLs, with or without a scheme. `None` disables
    /// blob resolution.
    pub pds: Option<String>,
    pub type_override: Option<String>,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self {
            repo_did: None,
            repo_handle: None,
            pds: Some(DEFAULT_PDS.to_string()),
            type_override: None,
        }
    }
}

impl DecodeContext {
    pub fn with_repo_did(mut self, did: impl Into<String>) -> Self {
        self.repo_did = Some(did.into());
        self
    }

    pub fn with_repo_handle(mut self, handle: impl Into<String>) -> Self {
        self.repo_handle = Some(handle.into());
        self
    }

    pub fn with_pds(mut self, pds: Option<String>) -> Self {
        self.pds = pds;
        self
    }

    pub fn with_type(mut self, type_override: impl Into<String>) -> Self {
        self.type_override = Some(type_override.into());
        self
    }

    pub(crate) fn repo_did(&self) -> Option<&str> {
        self.repo_did.as_deref().filter(|did| !did.is_empty())
    }

    pub(crate) fn repo_handle(&self) -> Option<&str> {
        self.repo_handle.as_deref().filter(|handle| !handle.is_empty())
    }

    pub(crate) fn pds(&self) -> Option<&str> {
        self.pds.as_deref()
    }

    /// The same context for a nested document, which carries its own `$type`.
    pub(crate) fn nested(&self) -> Self {
        Self {
            type_override: None,
            ..self.clone()
        }
    }
}

/// Context for encoding AS1 into Bluesky records.
///
/// Record CIDs and uploaded image blobs can't be derived from AS1. When the
/// caller knows them they are supplied here, keyed by AT-URI and image URL;
/// otherwise strong refs go out without a CID and images as plain URLs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodeContext {
    /// URL the AS1 object was fetched from. Its host becomes a profile's
    /// handle.
    pub from_url: Option<String>,
    pub cids: BTreeMap<String, String>,
    pub blobs: BTreeMap<String, Value>,
}

impl EncodeContext {
    pub fn with_from_url(mut self, url: impl Into<String>) -> Self {
        self.from_url = Some(url.into());
        self
    }

    pub fn with_cid(mut self, uri: impl Into<String>, cid: impl Into<String>) -> Self {
        self.cids.insert(uri.into(), cid.into());
        self
    }

    pub fn with_blob(mut self, url: impl Into<String>, blob: Value) -> Self {
        self.blobs.insert(url.into(), blob);
        self
    }
}
