//! AS1 -> Nostr.

use as1_core::time::{unix_from_iso, unix_timestamp};
use as1_core::{As1Kind, As1Object, As1Ref, Error, Result};
use tracing::debug;

use crate::canonical::id_for;
use crate::context::EncodeContext;
use crate::event::{e_tag, e_tag_marked, p_tag, t_tag, NostrEvent, NostrTag};
use crate::ids::{uri_to_id, URI_PREFIX};
use crate::kinds::EventKind;
use crate::profile::{url_to_identity_tag, username_to_nip05, ProfileContent};

/// Translate an AS1 object or activity into an unsigned Nostr event.
///
/// The returned event's `id` is always the canonical id of its contents;
/// any id on the AS1 side is ignored. A reposted object is the exception:
/// its own id is kept, since it names an event that already exists. `sig`
/// is left unset.
pub fn from_as1(obj: &As1Object, ctx: &EncodeContext) -> Result<NostrEvent> {
    let mut event = match obj.kind()? {
        As1Kind::Post | As1Kind::Update => return from_as1(inner_object(obj)?, ctx),
        As1Kind::Person => profile_event(obj)?,
        As1Kind::Note | As1Kind::Comment | As1Kind::Mention => {
            note_event(obj, EventKind::TextNote, ctx)?
        }
        As1Kind::Article => note_event(obj, EventKind::LongForm, ctx)?,
        As1Kind::Share => repost_event(obj, ctx)?,
        As1Kind::Like => reaction_event(obj, "+")?,
        As1Kind::Dislike => reaction_event(obj, "-")?,
        As1Kind::React => {
            let content = obj
                .content
                .as_deref()
                .filter(|content| !content.is_empty())
                .ok_or(Error::MissingRequiredField("content"))?;
            reaction_event(obj, content)?
        }
        As1Kind::Delete => delete_event(obj)?,
        As1Kind::Follow => contacts_event(obj, ctx)?,
    };

    event.id = id_for(&event);
    Ok(event)
}

fn inner_object(activity: &As1Object) -> Result<&As1Object> {
    activity
        .first_object()
        .and_then(As1Ref::as_object)
        .ok_or(Error::MissingRequiredField("object"))
}

fn base_event(obj: &As1Object, kind: EventKind, pubkey: String) -> NostrEvent {
    NostrEvent {
        pubkey,
        created_at: created_at(obj),
        kind: kind.as_u16(),
        ..Default::default()
    }
}

fn created_at(obj: &As1Object) -> u64 {
    obj.published
        .as_deref()
        .and_then(unix_from_iso)
        .unwrap_or_else(unix_timestamp)
}

/// Hex pubkey of the author (or actor), or empty when there is none.
fn author_pubkey(obj: &As1Object) -> Result<String> {
    match obj.author_or_actor().and_then(|author| author.id.as_deref()) {
        Some(id) => uri_to_id(id),
        None => Ok(String::new()),
    }
}

/// Hex id of the first `object`, which must be present.
fn target_id(obj: &As1Object) -> Result<String> {
    let target = obj
        .first_object()
        .and_then(As1Ref::id)
        .ok_or(Error::MissingRequiredField("object"))?;
    uri_to_id(target)
}

fn profile_event(obj: &As1Object) -> Result<NostrEvent> {
    let id = obj.id.as_deref().ok_or(Error::MissingRequiredField("id"))?;
    let mut event = base_event(obj, EventKind::Metadata, uri_to_id(id)?);

    let content = ProfileContent {
        about: obj.summary.clone(),
        name: obj.display_name.clone(),
        nip05: obj.username.as_deref().map(username_to_nip05),
        picture: obj.first_image_url().map(str::to_string),
    };
    event.content = serde_json::to_string(&content)?;

    event.tags = obj
        .url
        .iter()
        .chain(&obj.urls)
        .filter_map(|url| url_to_identity_tag(url))
        .collect();

    Ok(event)
}

fn note_event(obj: &As1Object, kind: EventKind, ctx: &EncodeContext) -> Result<NostrEvent> {
    let mut event = base_event(obj, kind, author_pubkey(obj)?);
    event.content = obj.content.clone().unwrap_or_default();

    if kind == EventKind::LongForm {
        if let Some(published) = obj.published.as_deref().and_then(unix_from_iso) {
            event.tags.push(single("published_at", published.to_string()));
        }
    }
    if let Some(title) = &obj.title {
        event.tags.push(single("title", title.clone()));
        event.tags.push(single("subject", title.clone()));
    }
    if let Some(summary) = &obj.summary {
        event.tags.push(single("summary", summary.clone()));
    }
    if let Some(location) = obj
        .location
        .as_deref()
        .and_then(|location| location.display_name.as_deref())
    {
        event.tags.push(single("location", location.to_string()));
    }

    for tag in &obj.tags {
        match tag.object_type.as_deref() {
            Some("hashtag") => {
                if let Some(name) = tag.display_name.as_deref() {
                    event.tags.push(t_tag(name.trim_start_matches('#')));
                }
            }
            Some("mention") => {
                let target = tag.id.as_deref().or(tag.url.as_deref());
                let hex_id = target.and_then(|id| uri_to_id(id).ok());
                match (target, hex_id) {
                    (Some(target), Some(hex_id)) if mentions_event(target) => {
                        event
                            .tags
                            .push(e_tag_marked(&hex_id, ctx.relay(), "mention"));
                    }
                    (_, Some(pubkey)) => event.tags.push(p_tag(&pubkey)),
                    _ => debug!(id = ?tag.id, "Skipping mention without a Nostr id"),
                }
            }
            other => debug!(object_type = ?other, "Skipping tag with no Nostr equivalent"),
        }
    }

    for parent in &obj.in_reply_to {
        let parent = parent
            .id_or_url()
            .ok_or(Error::MissingRequiredField("inReplyTo"))?;
        event
            .tags
            .push(e_tag_marked(&uri_to_id(parent)?, ctx.relay(), "reply"));
    }

    Ok(event)
}

/// Whether a mention points at an event (`note`/`nevent`) rather than a
/// profile.
fn mentions_event(id: &str) -> bool {
    let value = id.strip_prefix(URI_PREFIX).unwrap_or(id);
    matches!(value.split_once('1'), Some(("note" | "nevent", _)))
}

fn repost_event(obj: &As1Object, ctx: &EncodeContext) -> Result<NostrEvent> {
    let mut event = base_event(obj, EventKind::Repost, author_pubkey(obj)?);
    let target = obj
        .first_object()
        .ok_or(Error::MissingRequiredField("object"))?;

    match target.as_object() {
        Some(inner) if inner.object_type.is_some() => {
            let mut embedded = from_as1(inner, ctx)?;
            // The reposted event already exists; reference it by its own id.
            if let Some(id) = inner.id.as_deref().filter(|id| !id.is_empty()) {
                embedded.id = uri_to_id(id)?;
            }
            event
                .tags
                .push(e_tag_marked(&embedded.id, ctx.relay(), "mention"));
            if !embedded.pubkey.is_empty() {
                event.tags.push(p_tag(&embedded.pubkey));
            }
            event.content = embedded.to_sorted_json()?;
        }
        _ => {
            let id = target.id().ok_or(Error::MissingRequiredField("object"))?;
            event
                .tags
                .push(e_tag_marked(&uri_to_id(id)?, ctx.relay(), "mention"));
        }
    }

    Ok(event)
}

fn reaction_event(obj: &As1Object, content: &str) -> Result<NostrEvent> {
    let mut event = base_event(obj, EventKind::Reaction, author_pubkey(obj)?);
    event.content = content.to_string();
    event.tags.push(e_tag(&target_id(obj)?));

    let target_author = obj
        .first_object()
        .and_then(As1Ref::as_object)
        .and_then(|target| target.author.as_deref())
        .and_then(|author| author.id.as_deref());
    if let Some(author) = target_author {
        event.tags.push(p_tag(&uri_to_id(author)?));
    }

    Ok(event)
}

fn delete_event(obj: &As1Object) -> Result<NostrEvent> {
    if obj.object.is_empty() {
        return Err(Error::MissingRequiredField("object"));
    }

    let mut event = base_event(obj, EventKind::Deletion, author_pubkey(obj)?);
    event.content = obj.content.clone().unwrap_or_default();
    for target in &obj.object {
        let id = target.id().ok_or(Error::MissingRequiredField("object"))?;
        event.tags.push(e_tag(&uri_to_id(id)?));
    }

    Ok(event)
}

fn contacts_event(obj: &As1Object, ctx: &EncodeContext) -> Result<NostrEvent> {
    if obj.object.is_empty() {
        return Err(Error::MissingRequiredField("object"));
    }

    let mut event = base_event(obj, EventKind::Contacts, author_pubkey(obj)?);
    event.content = obj.content.clone().unwrap_or_default();
    for followee in &obj.object {
        let id = followee.id().ok_or(Error::MissingRequiredField("object"))?;
        let petname = followee
            .as_object()
            .and_then(|followee| followee.display_name.clone())
            .unwrap_or_default();
        event.tags.push(NostrTag::new(
            "p",
            vec![uri_to_id(id)?, ctx.relay().to_string(), petname],
        ));
    }

    Ok(event)
}

fn single(name: &str, value: String) -> NostrTag {
    NostrTag::new(name, vec![value])
}
