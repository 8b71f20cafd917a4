//! Translation between AS1 and Bluesky (`app.bsky.*`) records and views.
//!
//! Encoding produces repository records ready to write with
//! `com.atproto.repo.createRecord`. Decoding accepts both records and the
//! hydrated views the AppView returns. Values that can't be derived from
//! AS1 alone (record CIDs, uploaded blobs, the repository's DID) come from
//! an explicit context; nothing here performs I/O.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        BLUESKY-AS1                         │
//! │                                                            │
//! │  As1Object ──from_as1──▶ BskyRecord (profile, post, ...)   │
//! │      ▲          │                                          │
//! │      │          ├── facets: char offsets ▶ byte offsets    │
//! │      │          └── embeds: images, links, quotes          │
//! │      │                                                     │
//! │      └──to_as1── serde_json::Value ($type or override)     │
//! │                    records + views, blocked ▶ None         │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Supported types
//!
//! | AS1 | Record | Views |
//! |-----|--------|-------|
//! | `person` | `app.bsky.actor.profile` | `app.bsky.actor.defs#profileView[Basic\|Detailed]` |
//! | `note`, `article`, `comment`, `mention` | `app.bsky.feed.post` | `postView`, `feedViewPost`, `threadViewPost`, `embed.record#viewRecord` |
//! | `share` activity | `app.bsky.feed.repost` | `feedViewPost` with `reasonRepost` |
//! | `like` activity | `app.bsky.feed.like` | |
//! | `follow` activity | `app.bsky.graph.follow` | |
//!
//! # Example
//!
//! ```rust
//! use as1_core::As1Object;
//! use bluesky_as1::{from_as1, to_as1, DecodeContext, EncodeContext};
//!
//! let note = As1Object {
//!     object_type: Some("note".to_string()),
//!     content: Some("hello".to_string()),
//!     published: Some("2022-01-02T03:04:05.000Z".to_string()),
//!     ..Default::default()
//! };
//!
//! let record = from_as1(&note, &EncodeContext::default()).unwrap();
//! let wire = serde_json::to_value(&record).unwrap();
//! assert_eq!(wire["$type"], "app.bsky.feed.post");
//!
//! let back = to_as1(&wire, &DecodeContext::default()).unwrap().unwrap();
//! assert_eq!(back.content.as_deref(), Some("hello"));
//! ```

mod context;
mod decode;
mod embeds;
mod encode;
mod facets;
mod ids;
mod lexicon;
mod prune;

use as1_core::{As1Object, Result, Translator};
use serde_json::Value;

pub use context::{DecodeContext, EncodeContext, DEFAULT_PDS};
pub use decode::to_as1;
pub use embeds::{as1_to_embed, embedded_view_to_as1, record_embed_to_as1, view_embed_to_as1};
pub use encode::from_as1;
pub use facets::{facets_to_tags, tags_to_facets};
pub use ids::{
    at_uri_to_web_url, blob_ref_to_url, did_web_to_url, parse_at_uri, post_url, profile_url,
    url_to_did_web, web_url_to_at_uri, BSKY_APP,
};
pub use lexicon::*;

/// [`Translator`] over Bluesky JSON documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bluesky;

impl Translator for Bluesky {
    type EncodeContext = EncodeContext;
    type DecodeContext = DecodeContext;

    fn name(&self) -> &'static str {
        "bluesky"
    }

    fn encode(&self, obj: &As1Object, ctx: &EncodeContext) -> Result<Value> {
        Ok(serde_json::to_value(from_as1(obj, ctx)?)?)
    }

    fn decode(&self, wire: &Value, ctx: &DecodeContext) -> Result<Option<As1Object>> {
        to_as1(wire, ctx)
    }
}

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
