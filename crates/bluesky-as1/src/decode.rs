//! Bluesky records and views -> AS1.

use as1_core::{As1Object, As1Ref, Error, Prune, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::context::DecodeContext;
use crate::embeds::{record_embed_to_as1, view_embed_to_as1};
use crate::facets::facets_to_tags;
use crate::ids::{at_uri_to_web_url, profile_url};
use crate::lexicon::{
    BskyType, FeedViewPost, FollowRecord, PostRecord, PostView, ProfileRecord, ProfileView,
    Reason, SubjectRecord, ThreadViewPost, ViewEmbed, ViewRecord,
};

/// Translate a Bluesky record or view into AS1.
///
/// The wire type comes from `ctx.type_override` when set, otherwise from
/// the document's `$type`. Blocked and missing posts decode to `Ok(None)`.
pub fn to_as1(value: &Value, ctx: &DecodeContext) -> Result<Option<As1Object>> {
    let type_name = match ctx.type_override.as_deref().filter(|t| !t.is_empty()) {
        Some(type_name) => type_name,
        None => value
            .get("$type")
            .and_then(Value::as_str)
            .ok_or(Error::MissingRequiredField("$type"))?,
    };
    let bsky_type: BskyType = type_name.parse()?;
    let ctx = ctx.nested();

    let mut obj = match bsky_type {
        BskyType::ActorProfile => profile_record_to_as1(&ProfileRecord::deserialize(value)?, &ctx),
        BskyType::FeedPost => post_record_to_as1(&PostRecord::deserialize(value)?, &ctx)?,
        BskyType::FeedRepost => subject_to_as1("share", &SubjectRecord::deserialize(value)?, &ctx)?,
        BskyType::FeedLike => subject_to_as1("like", &SubjectRecord::deserialize(value)?, &ctx)?,
        BskyType::GraphFollow => follow_to_as1(&FollowRecord::deserialize(value)?, &ctx),
        BskyType::ProfileView | BskyType::ProfileViewBasic | BskyType::ProfileViewDetailed => {
            profile_view_to_as1(&ProfileView::deserialize(value)?)
        }
        BskyType::PostView => post_view_to_as1(&PostView::deserialize(value)?, &ctx)?,
        BskyType::FeedViewPost => feed_view_post_to_as1(&FeedViewPost::deserialize(value)?, &ctx)?,
        BskyType::ThreadViewPost => thread_to_as1(&ThreadViewPost::deserialize(value)?, &ctx)?,
        BskyType::ViewRecord => view_record_to_as1(&ViewRecord::deserialize(value)?, &ctx)?,
        BskyType::BlockedPost
        | BskyType::NotFoundPost
        | BskyType::ViewBlocked
        | BskyType::ViewNotFound => {
            debug!(%bsky_type, "Blocked or missing record");
            return Ok(None);
        }
    };

    obj.prune();
    Ok(Some(obj))
}

/// The repository owner as an AS1 person, when the context names one.
fn repo_author(ctx: &DecodeContext) -> Option<As1Object> {
    let did = ctx.repo_did();
    let handle = ctx.repo_handle();
    if did.is_none() && handle.is_none() {
        return None;
    }

    Some(As1Object {
        id: did.map(str::to_string),
        username: handle.map(str::to_string),
        url: handle.or(did).map(profile_url),
        ..As1Object::with_type("person")
    })
}

fn profile_record_to_as1(record: &ProfileRecord, ctx: &DecodeContext) -> As1Object {
    let handle = ctx
        .repo_handle()
        .or(record.handle.as_deref().filter(|handle| !handle.is_empty()));

    let mut image = Vec::new();
    if let Some(url) = record
        .avatar
        .as_ref()
        .and_then(|avatar| avatar.to_url(ctx.repo_did(), ctx.pds()))
    {
        image.push(As1Ref::from(As1Object {
            url: Some(url),
            ..Default::default()
        }));
    }
    if let Some(url) = record
        .banner
        .as_ref()
        .and_then(|banner| banner.to_url(ctx.repo_did(), ctx.pds()))
    {
        image.push(As1Ref::from(As1Object {
            url: Some(url),
            ..As1Object::with_type("featured")
        }));
    }

    As1Object {
        id: ctx.repo_did().map(str::to_string),
        url: handle.map(profile_url),
        username: handle.map(str::to_string),
        display_name: record.display_name.clone(),
        summary: record.description.clone(),
        image,
        ..As1Object::with_type("person")
    }
}

fn profile_view_to_as1(view: &ProfileView) -> As1Object {
    let handle = Some(view.handle.as_str()).filter(|handle| !handle.is_empty());

    let mut image: Vec<As1Ref> = Vec::new();
    if let Some(avatar) = &view.avatar {
        image.push(
            As1Object {
                url: Some(avatar.clone()),
                ..Default::default()
            }
            .into(),
        );
    }
    if let Some(banner) = &view.banner {
        image.push(
            As1Object {
                url: Some(banner.clone()),
                ..As1Object::with_type("featured")
            }
            .into(),
        );
    }

    As1Object {
        id: Some(view.did.clone()),
        url: Some(profile_url(handle.unwrap_or(view.did.as_str()))),
        username: handle.map(str::to_string),
        display_name: view.display_name.clone(),
        summary: view.description.clone(),
        image,
        ..As1Object::with_type("person")
    }
}

fn post_record_to_as1(record: &PostRecord, ctx: &DecodeContext) -> Result<As1Object> {
    let mut obj = As1Object {
        content: Some(record.text.clone()),
        published: record.created_at.clone(),
        author: repo_author(ctx).map(Box::new),
        tags: facets_to_tags(&record.text, &record.facets),
        ..As1Object::with_type("note")
    };

    if let Some(reply) = &record.reply {
        obj.object_type = Some("comment".to_string());
        obj.in_reply_to = vec![As1Object {
            id: Some(reply.parent.uri.clone()),
            url: at_uri_to_web_url(&reply.parent.uri, None)?,
            ..Default::default()
        }
        .into()];
    }

    if let Some(embed) = &record.embed {
        record_embed_to_as1(embed, &mut obj, ctx)?;
    }
    Ok(obj)
}

/// A post as hydrated by the AppView. Hydrated embeds replace the record's.
fn hydrated_post(
    uri: &str,
    author: Option<&ProfileView>,
    record: &Value,
    embeds: &[ViewEmbed],
    ctx: &DecodeContext,
) -> Result<As1Object> {
    let mut record = if record.is_null() {
        PostRecord::default()
    } else {
        PostRecord::deserialize(record)?
    };
    if !embeds.is_empty() {
        record.embed = None;
    }

    let record_ctx = match author {
        Some(author) => ctx
            .clone()
            .with_repo_did(author.did.clone())
            .with_repo_handle(author.handle.clone()),
        None => ctx.clone(),
    };
    let mut obj = post_record_to_as1(&record, &record_ctx)?;
    obj.id = Some(uri.to_string());
    obj.url = at_uri_to_web_url(uri, author.map(|author| author.handle.as_str()))?;
    if let Some(author) = author {
        obj.author = Some(Box::new(profile_view_to_as1(author)));
    }

    for embed in embeds {
        view_embed_to_as1(embed, &mut obj, ctx)?;
    }
    Ok(obj)
}

fn post_view_to_as1(view: &PostView, ctx: &DecodeContext) -> Result<As1Object> {
    let embeds: &[ViewEmbed] = match &view.embed {
        Some(embed) => std::slice::from_ref(embed),
        None => &[],
    };
    hydrated_post(&view.uri, view.author.as_ref(), &view.record, embeds, ctx)
}

/// A quoted post inside an `app.bsky.embed.record#view`.
pub(crate) fn view_record_to_as1(view: &ViewRecord, ctx: &DecodeContext) -> Result<As1Object> {
    hydrated_post(&view.uri, view.author.as_ref(), &view.value, &view.embeds, ctx)
}

fn feed_view_post_to_as1(feed: &FeedViewPost, ctx: &DecodeContext) -> Result<As1Object> {
    let post = post_view_to_as1(&feed.post, ctx)?;
    match &feed.reason {
        Some(Reason::Repost { by, .. }) => Ok(As1Object {
            actor: Some(Box::new(profile_view_to_as1(by))),
            object: vec![post.into()],
            ..As1Object::activity("share")
        }),
        Some(Reason::Unknown) => {
            debug!(uri = %feed.post.uri, "Dropping unknown feed reason");
            Ok(post)
        }
        None => Ok(post),
    }
}

/// The thread's root post with every reply below it flattened into
/// `replies`, depth first.
fn thread_to_as1(thread: &ThreadViewPost, ctx: &DecodeContext) -> Result<As1Object> {
    let mut obj = post_view_to_as1(&thread.post, ctx)?;
    collect_replies(&thread.replies, ctx, &mut obj.replies)?;
    Ok(obj)
}

fn collect_replies(replies: &[Value], ctx: &DecodeContext, out: &mut Vec<As1Object>) -> Result<()> {
    for reply in replies {
        let type_name = reply.get("$type").and_then(Value::as_str).unwrap_or_default();
        match type_name.parse::<BskyType>() {
            Ok(BskyType::ThreadViewPost) => {
                let reply = ThreadViewPost::deserialize(reply)?;
                out.push(post_view_to_as1(&reply.post, ctx)?);
                collect_replies(&reply.replies, ctx, out)?;
            }
            Ok(BskyType::PostView) => out.push(post_view_to_as1(&PostView::deserialize(reply)?, ctx)?),
            Ok(BskyType::BlockedPost | BskyType::NotFoundPost) => {
                debug!(type_name, "Skipping blocked or missing reply");
            }
            _ => debug!(type_name, "Skipping unrecognized reply"),
        }
    }
    Ok(())
}

fn subject_to_as1(verb: &str, record: &SubjectRecord, ctx: &DecodeContext) -> Result<As1Object> {
    let subject = &record.subject.uri;
    if subject.is_empty() {
        return Err(Error::MissingRequiredField("subject.uri"));
    }

    Ok(As1Object {
        actor: repo_author(ctx).map(Box::new),
        published: record.created_at.clone(),
        object: vec![As1Object {
            id: Some(subject.clone()),
            url: at_uri_to_web_url(subject, None)?,
            ..Default::default()
        }
        .into()],
        ..As1Object::activity(verb)
    })
}

fn follow_to_as1(record: &FollowRecord, ctx: &DecodeContext) -> As1Object {
    As1Object {
        actor: repo_author(ctx).map(Box::new),
        published: record.created_at.clone(),
        object: vec![As1Object {
            id: Some(record.subject.clone()),
            url: Some(profile_url(&record.subject)),
            ..Default::default()
        }
        .into()],
        ..As1Object::activity("follow")
    }
}
