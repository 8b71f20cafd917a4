/// Context for encoding AS1 into Nostr events.
#[derive(Debug, Clone, Default)]
pub struct EncodeContext {
    /// Relay URL written into `e` and `p` tags that carry a relay slot.
    pub relay_hint: Option<String>,
}

impl EncodeContext {
    pub fn with_relay_hint(mut self, relay: impl Into<String>) -> Self {
        self.relay_hint = Some(relay.into());
        self
    }

    pub(crate) fn relay(&self) -> &str {
        self.relay_hint.as_deref().unwrap_or_default()
    }
}

/// Context for decoding Nostr events into AS1.
#[derive(Debug, Clone, Default)]
pub struct DecodeContext {
    /// Fail with `IdMismatch` when an event's id does not match its
    /// recomputed canonical id. When unset, mismatches are logged and the
    /// claimed id is kept.
    pub verify_ids: bool,
}

impl DecodeContext {
    pub fn verifying() -> Self {
        Self { verify_ids: true }
    }
}
