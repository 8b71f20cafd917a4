//! Translation between AS1 and Nostr events.
//!
//! Events are modeled as plain [`NostrEvent`] values and converted to and
//! from `nostr_sdk` types only at the edges, so translation never needs keys
//! or a relay connection. Encoding always writes the canonical NIP-01 id;
//! signing is left to the caller (see [`NostrEvent::to_event_builder`]).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       NOSTR-AS1                          │
//! │                                                          │
//! │   As1Object ──from_as1──▶ NostrEvent ──▶ EventBuilder    │
//! │       ▲                      │  ▲                        │
//! │       └───────to_as1─────────┘  └── Event (nostr-sdk)    │
//! │                              │                           │
//! │                        id_for / verify_id                │
//! │                        (canonical NIP-01 JSON)           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Event Kinds
//!
//! | Kind | Constant | AS1 |
//! |------|----------|-----|
//! | 0 | `KIND_METADATA` | `person` |
//! | 1 | `KIND_TEXT_NOTE` | `note`, `comment` |
//! | 3 | `KIND_CONTACTS` | `follow` activity |
//! | 5 | `KIND_DELETION` | `delete` activity |
//! | 6 | `KIND_REPOST` | `share` activity |
//! | 7 | `KIND_REACTION` | `like`, `dislike`, `react` activities |
//! | 30023 | `KIND_LONG_FORM` | `article` |
//!
//! Any other kind fails with `UnsupportedKind`.
//!
//! # Identifiers
//!
//! AS1 ids are `nostr:` URIs over bech32 (NIP-19): `npub` for people, `note`
//! for posts and `nevent` for activities and reply targets. Wire events carry
//! lowercase hex. See [`id_to_uri`] and [`uri_to_id`].
//!
//! # Example
//!
//! ```rust
//! use as1_core::As1Object;
//! use nostr_as1::{from_as1, to_as1, DecodeContext, EncodeContext};
//!
//! let note = As1Object {
//!     object_type: Some("note".to_string()),
//!     content: Some("hello".to_string()),
//!     published: Some("2022-01-02T03:04:05".to_string()),
//!     ..Default::default()
//! };
//!
//! let event = from_as1(&note, &EncodeContext::default()).unwrap();
//! assert_eq!(event.kind, 1);
//! assert_eq!(event.created_at, 1641092645);
//!
//! let back = to_as1(&event, &DecodeContext::verifying()).unwrap();
//! assert_eq!(back.content.as_deref(), Some("hello"));
//! ```

mod canonical;
mod context;
mod decode;
mod encode;
mod event;
mod ids;
mod kinds;
mod profile;

use as1_core::{As1Object, Result, Translator};
use serde::Deserialize;
use serde_json::Value;

pub use canonical::{canonical_json, id_for, verify_id};
pub use context::{DecodeContext, EncodeContext};
pub use decode::to_as1;
pub use encode::from_as1;
pub use event::{e_tag, e_tag_marked, p_tag, t_tag, tag_value, NostrEvent, NostrTag};
pub use ids::{
    bech32_decode, bech32_encode, id_to_uri, is_bech32, uri_to_id, BECH32_PREFIXES, URI_PREFIX,
};
pub use kinds::{
    EventKind, KIND_CONTACTS, KIND_DELETION, KIND_LONG_FORM, KIND_METADATA, KIND_REACTION,
    KIND_REPOST, KIND_TEXT_NOTE,
};
pub use profile::{
    identity_to_url, nip05_to_username, url_to_identity_tag, username_to_nip05, ProfileContent,
};

/// [`Translator`] over JSON-encoded Nostr events.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nostr;

impl Translator for Nostr {
    type EncodeContext = EncodeContext;
    type DecodeContext = DecodeContext;

    fn name(&self) -> &'static str {
        "nostr"
    }

    fn encode(&self, obj: &As1Object, ctx: &EncodeContext) -> Result<Value> {
        Ok(serde_json::to_value(from_as1(obj, ctx)?)?)
    }

    fn decode(&self, wire: &Value, ctx: &DecodeContext) -> Result<Option<As1Object>> {
        let event = NostrEvent::deserialize(wire)?;
        to_as1(&event, ctx).map(Some)
    }
}

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
