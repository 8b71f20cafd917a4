//! Canonical event serialization (NIP-01).
//!
//! An event's id is the SHA-256 of the positional array
//! `[0, pubkey, created_at, kind, tags, content]`, written as compact UTF-8
//! JSON. The bytes must match other implementations exactly, so this module
//! writes them by hand instead of going through a general serializer.

use as1_core::{Error, Result};
use sha2::{Digest, Sha256};

use crate::event::NostrEvent;

/// The exact byte sequence hashed to produce an event's id.
pub fn canonical_json(event: &NostrEvent) -> String {
    let mut out = String::with_capacity(64 + event.content.len());
    out.push_str("[0,");
    write_json_string(&mut out, &event.pubkey);
    out.push(',');
    out.push_str(&event.created_at.to_string());
    out.push(',');
    out.push_str(&event.kind.to_string());
    out.push_str(",[");
    for (i, tag) in event.tags.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push('[');
        write_json_string(&mut out, &tag.name);
        for value in &tag.values {
            out.push(',');
            write_json_string(&mut out, value);
        }
        out.push(']');
    }
    out.push_str("],");
    write_json_string(&mut out, &event.content);
    out.push(']');
    out
}

/// Lowercase hex SHA-256 of [`canonical_json`].
pub fn id_for(event: &NostrEvent) -> String {
    hex::encode(Sha256::digest(canonical_json(event).as_bytes()))
}

/// Check an event's claimed id against its recomputed id.
pub fn verify_id(event: &NostrEvent) -> Result<()> {
    let computed = id_for(event);
    if event.id.eq_ignore_ascii_case(&computed) {
        Ok(())
    } else {
        Err(Error::IdMismatch {
            claimed: event.id.clone(),
            computed,
        })
    }
}

// Only `"`, `\` and control characters are escaped; everything else,
// including non-ASCII, is written verbatim. Control characters without a
// short escape are written as `\u00XX`, which is what serde_json (and so
// nostr-sdk and most relays) emits; raw control bytes would not be JSON.
fn write_json_string(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}
