//! Bech32 encodings of Nostr keys and event ids (NIP-19).
//!
//! Ids are encoded as plain bech32 over the raw bytes of the hex id, so the
//! codec round-trips ids of any length, not just 32-byte ones.

use as1_core::{Error, Result};
use bech32::{Bech32, Hrp};

/// Prefix for AS1-facing Nostr URIs.
pub const URI_PREFIX: &str = "nostr:";

/// The fixed human-readable-part vocabulary.
pub const BECH32_PREFIXES: &[&str] = &[
    "npub", "nsec", "note", "nevent", "nprofile", "naddr", "nrelay",
];

/// Encode a hex id as bech32 with the given prefix.
pub fn bech32_encode(prefix: &str, hex_id: &str) -> Result<String> {
    if !BECH32_PREFIXES.contains(&prefix) {
        return Err(Error::invalid_id(prefix, "unknown bech32 prefix"));
    }
    let bytes = hex::decode(hex_id).map_err(|err| Error::invalid_id(hex_id, err.to_string()))?;
    let hrp = Hrp::parse(prefix).map_err(|err| Error::invalid_id(prefix, err.to_string()))?;
    bech32::encode::<Bech32>(hrp, &bytes).map_err(|err| Error::invalid_id(hex_id, err.to_string()))
}

/// Decode a bech32 string (without `nostr:`) to its lowercase hex id.
pub fn bech32_decode(value: &str) -> Result<String> {
    let (hrp, bytes) =
        bech32::decode(value).map_err(|err| Error::invalid_id(value, err.to_string()))?;
    let prefix = hrp.to_lowercase();
    if !BECH32_PREFIXES.contains(&prefix.as_str()) {
        return Err(Error::invalid_id(value, "unknown bech32 prefix"));
    }
    Ok(hex::encode(bytes))
}

/// `nostr:` URI for a hex id, e.g. `nostr:npub1...`.
pub fn id_to_uri(prefix: &str, hex_id: &str) -> Result<String> {
    Ok(format!("{URI_PREFIX}{}", bech32_encode(prefix, hex_id)?))
}

/// Hex id for a `nostr:` URI or bare bech32 string. Bare hex passes through.
pub fn uri_to_id(uri: &str) -> Result<String> {
    let value = uri.strip_prefix(URI_PREFIX).unwrap_or(uri);
    if is_hex(value) {
        return Ok(value.to_ascii_lowercase());
    }
    bech32_decode(value)
}

/// Whether a string looks like a bech32 Nostr identifier, with or without
/// the `nostr:` prefix. Only the prefix is checked.
pub fn is_bech32(value: &str) -> bool {
    let value = value.strip_prefix(URI_PREFIX).unwrap_or(value);
    BECH32_PREFIXES
        .iter()
        .any(|prefix| value.starts_with(prefix))
}

pub(crate) fn is_hex(value: &str) -> bool {
    !value.is_empty() && value.len() % 2 == 0 && value.chars().all(|c| c.is_ascii_hexdigit())
}
