//! Nostr -> AS1.

use as1_core::time::iso_from_unix;
use as1_core::{As1Object, As1Ref, Error, Prune, Result};
use tracing::{debug, warn};

use crate::canonical::{id_for, verify_id};
use crate::context::DecodeContext;
use crate::event::NostrEvent;
use crate::ids::id_to_uri;
use crate::kinds::EventKind;
use crate::profile::{identity_to_url, nip05_to_username, ProfileContent};

/// Translate a Nostr event into AS1.
///
/// Fails with `UnsupportedKind` for kinds outside the modeled set. The
/// event id is checked against its canonical id; see [`DecodeContext`].
pub fn to_as1(event: &NostrEvent, ctx: &DecodeContext) -> Result<As1Object> {
    let kind = EventKind::try_from(event.kind)?;
    let id = checked_id(event, ctx)?;
    let author = author_of(event);
    let published = if event.created_at > 0 {
        iso_from_unix(event.created_at)
    } else {
        None
    };

    let mut obj = match kind {
        EventKind::Metadata => profile_to_as1(event, author)?,
        EventKind::TextNote => As1Object {
            published,
            ..note_to_as1(event, "note", &id, author)?
        },
        EventKind::LongForm => {
            let mut article = note_to_as1(event, "article", &id, author)?;
            article.published = article.published.or(published);
            article
        }
        EventKind::Repost => As1Object {
            id: Some(id_to_uri("nevent", &id)?),
            actor: author.map(Box::new),
            published,
            object: vec![repost_target(event, ctx)?],
            ..As1Object::activity("share")
        },
        EventKind::Reaction => reaction_to_as1(event, &id, author, published)?,
        EventKind::Deletion => As1Object {
            id: Some(id_to_uri("nevent", &id)?),
            actor: author.map(Box::new),
            content: Some(event.content.clone()),
            published,
            object: e_targets(event)?,
            ..As1Object::activity("delete")
        },
        EventKind::Contacts => As1Object {
            id: Some(id_to_uri("nevent", &id)?),
            actor: author.map(Box::new),
            content: Some(event.content.clone()),
            published,
            object: p_targets(event)?,
            ..As1Object::activity("follow")
        },
    };

    obj.prune();
    Ok(obj)
}

/// The id to expose: the claimed id when it verifies (or verification is
/// off), the computed id when none was claimed.
fn checked_id(event: &NostrEvent, ctx: &DecodeContext) -> Result<String> {
    if event.id.is_empty() {
        return Ok(id_for(event));
    }
    if let Err(err) = verify_id(event) {
        if ctx.verify_ids {
            return Err(err);
        }
        warn!(claimed = %event.id, error = %err, "Nostr event id does not match its contents");
    }
    Ok(event.id.to_ascii_lowercase())
}

fn author_of(event: &NostrEvent) -> Option<As1Object> {
    if event.pubkey.is_empty() {
        return None;
    }
    match id_to_uri("npub", &event.pubkey) {
        Ok(uri) => Some(As1Object::from_id(uri)),
        Err(err) => {
            warn!(pubkey = %event.pubkey, error = %err, "Ignoring unparsable pubkey");
            None
        }
    }
}

fn profile_to_as1(event: &NostrEvent, author: Option<As1Object>) -> Result<As1Object> {
    let content: ProfileContent = if event.content.trim().is_empty() {
        ProfileContent::default()
    } else {
        serde_json::from_str(&event.content)?
    };

    let urls = event
        .tags_named("i")
        .filter_map(|tag| tag.value(0))
        .filter_map(identity_to_url)
        .collect();

    Ok(As1Object {
        id: author.and_then(|author| author.id),
        display_name: content.name,
        summary: content.about,
        username: content.nip05.as_deref().map(nip05_to_username).map(str::to_string),
        image: content.picture.map(As1Ref::Id).into_iter().collect(),
        urls,
        ..As1Object::with_type("person")
    })
}

fn note_to_as1(
    event: &NostrEvent,
    object_type: &str,
    id: &str,
    author: Option<As1Object>,
) -> Result<As1Object> {
    let mut obj = As1Object {
        id: Some(id_to_uri("note", id)?),
        author: author.map(Box::new),
        content: Some(event.content.clone()),
        ..As1Object::with_type(object_type)
    };

    let mut reply = None;
    let mut root = None;
    for tag in &event.tags {
        let Some(value) = tag.value(0) else {
            continue;
        };
        match tag.name.as_str() {
            "t" => obj.tags.push(As1Object {
                display_name: Some(value.to_string()),
                ..As1Object::with_type("hashtag")
            }),
            "p" => match id_to_uri("npub", value) {
                Ok(uri) => obj.tags.push(As1Object {
                    id: Some(uri),
                    ..As1Object::with_type("mention")
                }),
                Err(err) => debug!(pubkey = value, error = %err, "Skipping unparsable p tag"),
            },
            "title" => obj.title = Some(value.to_string()),
            "subject" if obj.title.is_none() => obj.title = Some(value.to_string()),
            "summary" => obj.summary = Some(value.to_string()),
            "published_at" => {
                obj.published = value.parse().ok().and_then(iso_from_unix);
            }
            "location" => {
                obj.location = Some(Box::new(As1Object {
                    display_name: Some(value.to_string()),
                    ..Default::default()
                }));
            }
            "e" => match tag.value(2) {
                Some("reply") => reply = Some(value),
                Some("root") => root = root.or(Some(value)),
                Some("mention") => obj.tags.push(As1Object {
                    id: Some(id_to_uri("nevent", value)?),
                    ..As1Object::with_type("mention")
                }),
                _ => {}
            },
            _ => {}
        }
    }

    if let Some(parent) = reply.or(root) {
        obj.in_reply_to = vec![As1Ref::Id(id_to_uri("nevent", parent)?)];
    }

    Ok(obj)
}

/// A repost embeds the reposted event as JSON in its content; when it
/// doesn't, fall back to the first `e` tag.
fn repost_target(event: &NostrEvent, ctx: &DecodeContext) -> Result<As1Ref> {
    if !event.content.trim().is_empty() {
        match serde_json::from_str::<NostrEvent>(&event.content) {
            Ok(inner) => return Ok(to_as1(&inner, ctx)?.into()),
            Err(err) => debug!(error = %err, "Repost content is not an embedded event"),
        }
    }

    let id = event
        .tags_named("e")
        .find_map(|tag| tag.value(0))
        .ok_or(Error::MissingRequiredField("e"))?;
    Ok(As1Ref::Id(id_to_uri("note", id)?))
}

fn reaction_to_as1(
    event: &NostrEvent,
    id: &str,
    author: Option<As1Object>,
    published: Option<String>,
) -> Result<As1Object> {
    let (verb, content) = match event.content.as_str() {
        "+" | "" => ("like", None),
        "-" => ("dislike", None),
        other => ("react", Some(other.to_string())),
    };

    let target = event
        .tags_named("e")
        .find_map(|tag| tag.value(0))
        .ok_or(Error::MissingRequiredField("e"))?;

    Ok(As1Object {
        id: Some(id_to_uri("nevent", id)?),
        actor: author.map(Box::new),
        content,
        published,
        object: vec![As1Ref::Id(id_to_uri("nevent", target)?)],
        ..As1Object::activity(verb)
    })
}

fn e_targets(event: &NostrEvent) -> Result<Vec<As1Ref>> {
    event
        .tags_named("e")
        .filter_map(|tag| tag.value(0))
        .map(|id| id_to_uri("nevent", id).map(As1Ref::Id))
        .collect()
}

fn p_targets(event: &NostrEvent) -> Result<Vec<As1Ref>> {
    event
        .tags_named("p")
        .filter_map(|tag| {
            let pubkey = tag.value(0)?;
            let petname = tag.value(2).filter(|name| !name.is_empty());
            Some((pubkey, petname))
        })
        .map(|(pubkey, petname)| -> Result<As1Ref> {
            let id = id_to_uri("npub", pubkey)?;
            Ok(match petname {
                Some(name) => As1Ref::from(As1Object {
                    id: Some(id),
                    display_name: Some(name.to_string()),
                    ..Default::default()
                }),
                None => As1Ref::Id(id),
            })
        })
        .collect()
}
