use std::collections::BTreeMap;

use as1_core::{Error, Result};
use nostr_sdk::prelude::*;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A Nostr tag, e.g. `["e", "<id>", "<relay>", "reply"]`.
///
/// Serialized as a flat string array with the tag name first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NostrTag {
    pub name: String,
    pub values: Vec<String>,
}

impl NostrTag {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn to_sdk_tag(&self) -> Result<Tag> {
        let mut parts = Vec::with_capacity(1 + self.values.len());
        parts.push(self.name.clone());
        parts.extend(self.values.clone());
        Tag::parse(parts).map_err(|err| Error::invalid_id(self.name.clone(), err.to_string()))
    }

    pub fn from_sdk_tag(tag: &Tag) -> Self {
        let parts = tag.clone().to_vec();
        let name = parts.first().cloned().unwrap_or_default();
        let values = parts.into_iter().skip(1).collect();
        Self { name, values }
    }
}

impl Serialize for NostrTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(std::iter::once(&self.name).chain(&self.values))
    }
}

impl<'de> Deserialize<'de> for NostrTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let mut parts = Vec::<String>::deserialize(deserializer)?.into_iter();
        let name = parts
            .next()
            .ok_or_else(|| de::Error::custom("empty nostr tag"))?;
        Ok(Self {
            name,
            values: parts.collect(),
        })
    }
}

/// A Nostr event as it appears on the wire.
///
/// `id` is carried as received and never trusted on its own; see
/// [`crate::id_for`] and [`crate::verify_id`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NostrEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub pubkey: String,
    #[serde(default)]
    pub created_at: u64,
    pub kind: u16,
    #[serde(default)]
    pub tags: Vec<NostrTag>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
}

impl NostrEvent {
    pub fn from_event(event: &Event) -> Self {
        let tags = event.tags.iter().map(NostrTag::from_sdk_tag).collect();

        Self {
            id: event.id.to_hex(),
            pubkey: event.pubkey.to_hex(),
            created_at: event.created_at.as_secs(),
            kind: event.kind.as_u16(),
            tags,
            content: event.content.clone(),
            sig: Some(event.sig.to_string()),
        }
    }

    /// An unsigned builder carrying this event's kind, content, tags and
    /// timestamp, ready for a publisher to sign.
    pub fn to_event_builder(&self) -> Result<EventBuilder> {
        let tags = self
            .tags
            .iter()
            .map(NostrTag::to_sdk_tag)
            .collect::<Result<Vec<_>>>()?;

        Ok(EventBuilder::new(Kind::from(self.kind), self.content.clone())
            .custom_created_at(Timestamp::from(self.created_at))
            .tags(tags))
    }

    /// JSON with keys in sorted order, as embedded in repost content.
    pub fn to_sorted_json(&self) -> Result<String> {
        let mut fields = BTreeMap::new();
        fields.insert("content", Value::from(self.content.clone()));
        fields.insert("created_at", Value::from(self.created_at));
        fields.insert("id", Value::from(self.id.clone()));
        fields.insert("kind", Value::from(self.kind));
        fields.insert("pubkey", Value::from(self.pubkey.clone()));
        fields.insert("tags", serde_json::to_value(&self.tags)?);
        if let Some(sig) = &self.sig {
            fields.insert("sig", Value::from(sig.clone()));
        }
        Ok(serde_json::to_string(&fields)?)
    }

    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a NostrTag> + 'a {
        self.tags.iter().filter(move |tag| tag.name == name)
    }

    pub fn tag_value(&self, name: &str) -> Option<&str> {
        tag_value(&self.tags, name)
    }
}

pub fn e_tag(event_id: &str) -> NostrTag {
    NostrTag::new("e", vec![event_id.to_string()])
}

/// An `e` tag with relay hint and NIP-10 marker.
pub fn e_tag_marked(event_id: &str, relay: &str, marker: &str) -> NostrTag {
    NostrTag::new(
        "e",
        vec![event_id.to_string(), relay.to_string(), marker.to_string()],
    )
}

pub fn p_tag(pubkey: &str) -> NostrTag {
    NostrTag::new("p", vec![pubkey.to_string()])
}

pub fn t_tag(hashtag: &str) -> NostrTag {
    NostrTag::new("t", vec![hashtag.to_string()])
}

pub fn tag_value<'a>(tags: &'a [NostrTag], name: &str) -> Option<&'a str> {
    tags.iter()
        .find(|tag| tag.name == name)
        .and_then(|tag| tag.values.first().map(|s| s.as_str()))
}
