//! `kind:0` metadata content and NIP-39 external identities.

use serde::{Deserialize, Serialize};

use crate::event::NostrTag;

/// JSON carried in a metadata event's `content`.
///
/// Fields are declared in key order so the serialized content is sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nip05: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
}

/// Root NIP-05 identifiers (`_@host`) map to the bare host.
pub fn nip05_to_username(nip05: &str) -> &str {
    nip05.strip_prefix("_@").unwrap_or(nip05)
}

pub fn username_to_nip05(username: &str) -> String {
    if username.contains('@') {
        username.to_string()
    } else {
        format!("_@{username}")
    }
}

// Mastodon claims are decoded, but a URL is never guessed to be Mastodon.
const IDENTITY_URLS: &[(&str, &str)] = &[
    ("github", "https://github.com/"),
    ("twitter", "https://twitter.com/"),
    ("telegram", "https://t.me/"),
];

/// URL for an `i` tag claim such as `github:semisol`.
pub fn identity_to_url(claim: &str) -> Option<String> {
    let (platform, identity) = claim.split_once(':')?;
    if identity.is_empty() {
        return None;
    }
    if platform == "mastodon" {
        return Some(format!("https://{identity}"));
    }
    IDENTITY_URLS
        .iter()
        .find(|(name, _)| *name == platform)
        .map(|(_, base)| format!("{base}{identity}"))
}

/// `i` tag for a profile URL on a known platform.
pub fn url_to_identity_tag(url: &str) -> Option<NostrTag> {
    IDENTITY_URLS.iter().find_map(|(platform, base)| {
        let identity = url.strip_prefix(base)?.trim_end_matches('/');
        if identity.is_empty() || identity.contains('/') {
            return None;
        }
        Some(NostrTag::new(
            "i",
            vec![format!("{platform}:{identity}"), "-".to_string()],
        ))
    })
}
