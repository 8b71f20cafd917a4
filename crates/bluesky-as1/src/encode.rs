//! AS1 -> Bluesky records.

use as1_core::{As1Kind, As1Object, As1Ref, Error, Prune, Result};

use crate::context::EncodeContext;
use crate::embeds::{as1_to_embed, image_ref, record_target, strong_ref};
use crate::facets::tags_to_facets;
use crate::ids::url_host;
use crate::lexicon::{BskyRecord, FollowRecord, PostRecord, ProfileRecord, ReplyRef, SubjectRecord};

/// Translate an AS1 object or activity into a repository record.
///
/// `post` and `update` activities encode as their object. Dislikes,
/// reactions and deletes have no record form and fail with
/// `UnsupportedActivity`. Empty optional fields are omitted.
pub fn from_as1(obj: &As1Object, ctx: &EncodeContext) -> Result<BskyRecord> {
    let mut record = record_for(obj, ctx)?;
    record.prune();
    Ok(record)
}

fn record_for(obj: &As1Object, ctx: &EncodeContext) -> Result<BskyRecord> {
    match obj.kind()? {
        As1Kind::Post | As1Kind::Update => {
            let inner = obj
                .first_object()
                .and_then(As1Ref::as_object)
                .ok_or(Error::MissingRequiredField("object"))?;
            record_for(inner, ctx)
        }
        As1Kind::Person => Ok(BskyRecord::Profile(profile_record(obj, ctx))),
        As1Kind::Note | As1Kind::Article | As1Kind::Mention | As1Kind::Comment => {
            post_record(obj, ctx).map(BskyRecord::Post)
        }
        As1Kind::Share => subject_record(obj, ctx).map(BskyRecord::Repost),
        As1Kind::Like => subject_record(obj, ctx).map(BskyRecord::Like),
        As1Kind::Follow => {
            let target = obj.first_object().ok_or(Error::MissingRequiredField("object"))?;
            let subject = target
                .id_or_url()
                .ok_or(Error::MissingRequiredField("object.id"))?;
            Ok(BskyRecord::Follow(FollowRecord {
                subject: subject.to_string(),
                created_at: obj.published.clone(),
            }))
        }
        As1Kind::Dislike | As1Kind::React | As1Kind::Delete => Err(Error::UnsupportedActivity {
            object_type: obj.object_type.clone(),
            verb: obj.verb.clone(),
        }),
    }
}

fn profile_record(obj: &As1Object, ctx: &EncodeContext) -> ProfileRecord {
    let is_banner = |image: &&As1Ref| {
        image
            .as_object()
            .and_then(|image| image.object_type.as_deref())
            == Some("featured")
    };
    let avatar = obj
        .image
        .iter()
        .find(|image| !is_banner(image))
        .or_else(|| obj.image.first())
        .and_then(As1Ref::url);
    let banner = obj.image.iter().find(is_banner).and_then(As1Ref::url);

    let handle = obj
        .username
        .clone()
        .filter(|username| !username.is_empty())
        .or_else(|| ctx.from_url.as_deref().and_then(url_host))
        .or_else(|| obj.url.as_deref().and_then(url_host));

    ProfileRecord {
        display_name: obj.display_name.clone(),
        description: obj.summary.clone(),
        avatar: avatar.map(|url| image_ref(url, ctx)),
        banner: banner.map(|url| image_ref(url, ctx)),
        handle,
    }
}

fn post_record(obj: &As1Object, ctx: &EncodeContext) -> Result<PostRecord> {
    let text = obj.content.clone().unwrap_or_default();
    let facets = tags_to_facets(&text, obj.content_is_html, &obj.tags)?;

    let reply = obj
        .in_reply_to
        .first()
        .map(|parent| {
            let target = record_target(parent.id(), parent.url())
                .ok_or(Error::MissingRequiredField("inReplyTo.id"))?;
            let parent = strong_ref(target, ctx)?;
            Ok::<_, Error>(ReplyRef {
                root: parent.clone(),
                parent,
            })
        })
        .transpose()?;

    Ok(PostRecord {
        text,
        created_at: obj.published.clone(),
        facets,
        embed: as1_to_embed(obj, ctx)?,
        reply,
    })
}

fn subject_record(obj: &As1Object, ctx: &EncodeContext) -> Result<SubjectRecord> {
    let target = obj.first_object().ok_or(Error::MissingRequiredField("object"))?;
    let target = record_target(target.id(), target.url())
        .ok_or(Error::MissingRequiredField("object.id"))?;
    Ok(SubjectRecord {
        subject: strong_ref(target, ctx)?,
        created_at: obj.published.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::ImageRef;
    use serde_json::json;

    fn as1(value: serde_json::Value) -> As1Object {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_follow_discards_actor() {
        let follow = as1(json!({
            "objectType": "activity",
            "verb": "follow",
            "actor": {"id": "did:web:bob.com"},
            "object": {"id": "did:web:alice.com"},
        }));
        let record = from_as1(&follow, &EncodeContext::default()).unwrap();
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"$type": "app.bsky.graph.follow", "subject": "did:web:alice.com"})
        );
    }

    #[test]
    fn test_post_activity_unwrapped() {
        let activity = as1(json!({
            "objectType": "activity",
            "verb": "post",
            "object": {"objectType": "note", "content": "hi"},
        }));
        let BskyRecord::Post(post) = from_as1(&activity, &EncodeContext::default()).unwrap() else {
            panic!("expected a post");
        };
        assert_eq!(post.text, "hi");
        assert_eq!(post.created_at, None);
    }

    #[test]
    fn test_reply_root_is_parent() {
        let reply = as1(json!({
            "objectType": "comment",
            "content": "yes",
            "inReplyTo": {"url": "https://bsky.app/profile/alice.com/post/tid"},
        }));
        let BskyRecord::Post(post) = from_as1(&reply, &EncodeContext::default()).unwrap() else {
            panic!("expected a post");
        };
        let reply = post.reply.unwrap();
        assert_eq!(reply.parent.uri, "at://alice.com/app.bsky.feed.post/tid");
        assert_eq!(reply.root, reply.parent);
    }

    #[test]
    fn test_profile_images() {
        let person = as1(json!({
            "objectType": "person",
            "displayName": "Alice",
            "summary": "hi there",
            "image": [
                {"objectType": "featured", "url": "http://my/banner"},
                {"url": "http://my/avatar"},
            ],
        }));
        let ctx = EncodeContext::default().with_from_url("https://alice.com/");
        let BskyRecord::Profile(profile) = from_as1(&person, &ctx).unwrap() else {
            panic!("expected a profile");
        };
        assert_eq!(profile.avatar, Some(ImageRef::Url("http://my/avatar".to_string())));
        assert_eq!(profile.banner, Some(ImageRef::Url("http://my/banner".to_string())));
        assert_eq!(profile.description.as_deref(), Some("hi there"));
        assert_eq!(profile.handle.as_deref(), Some("alice.com"));
    }

    #[test]
    fn test_unsupported_verbs() {
        for verb in ["dislike", "react", "delete"] {
            let activity = as1(json!({
                "objectType": "activity",
                "verb": verb,
                "object": "at://did/app.bsky.feed.post/tid",
            }));
            assert!(
                matches!(
                    from_as1(&activity, &EncodeContext::default()),
                    Err(Error::UnsupportedActivity { .. })
                ),
                "{verb}"
            );
        }
    }

    #[test]
    fn test_share_requires_object() {
        let share = as1(json!({"objectType": "activity", "verb": "share"}));
        assert!(matches!(
            from_as1(&share, &EncodeContext::default()),
            Err(Error::MissingRequiredField("object"))
        ));
    }
}
