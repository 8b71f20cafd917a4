//! Embeds: images, link cards and quoted posts.
//!
//! | AS1 | record embed | view embed |
//! |-----|--------------|------------|
//! | `image` | `app.bsky.embed.images` | `app.bsky.embed.images#view` |
//! | `link` attachment | `app.bsky.embed.external` | `app.bsky.embed.external#view` |
//! | `note`/`article`/`comment` attachment | `app.bsky.embed.record` | `app.bsky.embed.record#view` |
//! | quote plus images | `app.bsky.embed.recordWithMedia` | `app.bsky.embed.recordWithMedia#view` |

use as1_core::{As1Object, As1Ref, Error, Result};
use tracing::debug;

use crate::context::{DecodeContext, EncodeContext};
use crate::decode::view_record_to_as1;
use crate::ids::{at_uri_to_web_url, web_url_to_at_uri};
use crate::lexicon::{
    EmbedImage, EmbeddedView, ExternalLink, ImageRef, RecordEmbed, StrongRef, ViewEmbed,
};

const QUOTE_TYPES: &[&str] = &["note", "article", "comment"];

/// The record embed for a post's images and attachments, if any.
///
/// Images win over a link card. More than one quoted post is
/// `NotImplemented`.
pub fn as1_to_embed(obj: &As1Object, ctx: &EncodeContext) -> Result<Option<RecordEmbed>> {
    let quotes: Vec<&As1Object> = obj
        .attachments
        .iter()
        .filter(|attachment| {
            attachment
                .object_type
                .as_deref()
                .is_some_and(|t| QUOTE_TYPES.contains(&t))
        })
        .collect();
    if quotes.len() > 1 {
        return Err(Error::NotImplemented(format!(
            "{} quoted posts in one embed",
            quotes.len()
        )));
    }

    let quote = quotes
        .first()
        .map(|quote| {
            let target = record_target(quote.id.as_deref(), quote.url.as_deref())
                .ok_or(Error::MissingRequiredField("attachments.id"))?;
            Ok::<_, Error>(RecordEmbed::Record {
                record: strong_ref(target, ctx)?,
            })
        })
        .transpose()?;
    let images = images_embed(&obj.image, ctx);
    let link = obj
        .attachments
        .iter()
        .find(|attachment| attachment.object_type.as_deref() == Some("link"));

    Ok(match (quote, images) {
        (Some(record), Some(media)) => Some(RecordEmbed::RecordWithMedia {
            record: Box::new(record),
            media: Box::new(media),
        }),
        (Some(record), None) => Some(record),
        (None, Some(images)) => {
            if link.is_some() {
                debug!("Post has images and a link card; keeping the images");
            }
            Some(images)
        }
        (None, None) => link.and_then(external_embed),
    })
}

fn images_embed(images: &[As1Ref], ctx: &EncodeContext) -> Option<RecordEmbed> {
    let images: Vec<EmbedImage> = images
        .iter()
        .filter_map(|image| {
            let url = image.url()?;
            let alt = image
                .as_object()
                .and_then(|image| image.display_name.clone())
                .unwrap_or_default();
            Some(EmbedImage {
                alt,
                image: image_ref(url, ctx),
            })
        })
        .collect();

    (!images.is_empty()).then_some(RecordEmbed::Images { images })
}

fn external_embed(link: &As1Object) -> Option<RecordEmbed> {
    let uri = link.url.clone().filter(|url| !url.is_empty())?;
    Some(RecordEmbed::External {
        external: ExternalLink {
            uri,
            title: link
                .display_name
                .clone()
                .or_else(|| link.title.clone())
                .unwrap_or_default(),
            description: link.summary.clone().unwrap_or_default(),
        },
    })
}

/// The uploaded blob for an image URL when the caller supplied one,
/// otherwise the URL itself.
pub(crate) fn image_ref(url: &str, ctx: &EncodeContext) -> ImageRef {
    ctx.blobs
        .get(url)
        .cloned()
        .map(ImageRef::Blob)
        .unwrap_or_else(|| ImageRef::Url(url.to_string()))
}

/// Prefer an `at://` id, then the URL, then any other id.
pub(crate) fn record_target<'a>(id: Option<&'a str>, url: Option<&'a str>) -> Option<&'a str> {
    let id = id.filter(|id| !id.is_empty());
    let url = url.filter(|url| !url.is_empty());
    id.filter(|id| id.starts_with("at://")).or(url).or(id)
}

/// Strong ref to an AT-URI or `bsky.app` post URL, with the caller's CID
/// when known.
pub(crate) fn strong_ref(target: &str, ctx: &EncodeContext) -> Result<StrongRef> {
    let uri = if target.starts_with("at://") {
        target.to_string()
    } else {
        web_url_to_at_uri(target)?.ok_or(Error::MissingRequiredField("uri"))?
    };
    let cid = ctx.cids.get(&uri).cloned();
    Ok(StrongRef { uri, cid })
}

/// Add a record embed's images and attachments to a decoded post.
pub fn record_embed_to_as1(
    embed: &RecordEmbed,
    obj: &mut As1Object,
    ctx: &DecodeContext,
) -> Result<()> {
    match embed {
        RecordEmbed::Images { images } => {
            for image in images {
                match image.image.to_url(ctx.repo_did(), ctx.pds()) {
                    Some(url) => obj.image.push(image_object(url, &image.alt)),
                    None => debug!("Dropping image blob without a repo DID or PDS"),
                }
            }
        }
        RecordEmbed::External { external } => obj.attachments.push(link_attachment(external)),
        RecordEmbed::Record { record } => obj.attachments.push(quote_stub(&record.uri)?),
        RecordEmbed::RecordWithMedia { record, media } => {
            record_embed_to_as1(record, obj, ctx)?;
            record_embed_to_as1(media, obj, ctx)?;
        }
        RecordEmbed::Unknown => debug!("Dropping unknown record embed"),
    }
    Ok(())
}

/// Add a hydrated embed's images and attachments to a decoded post.
pub fn view_embed_to_as1(embed: &ViewEmbed, obj: &mut As1Object, ctx: &DecodeContext) -> Result<()> {
    match embed {
        ViewEmbed::Images { images } => {
            for image in images {
                obj.image.push(image_object(image.fullsize.clone(), &image.alt));
            }
        }
        ViewEmbed::External { external } => obj.attachments.push(link_attachment(external)),
        ViewEmbed::Record { record } => {
            if let Some(quote) = embedded_view_to_as1(record, ctx)? {
                obj.attachments.push(quote);
            }
        }
        ViewEmbed::RecordWithMedia { record, media } => {
            view_embed_to_as1(record, obj, ctx)?;
            view_embed_to_as1(media, obj, ctx)?;
        }
        ViewEmbed::Unknown => debug!("Dropping unknown view embed"),
    }
    Ok(())
}

/// The quoted post, or `None` when it is blocked or gone.
pub fn embedded_view_to_as1(view: &EmbeddedView, ctx: &DecodeContext) -> Result<Option<As1Object>> {
    match view {
        EmbeddedView::Record(record) => view_record_to_as1(record, ctx).map(Some),
        EmbeddedView::Blocked { uri } => {
            debug!(uri = %uri, "Quoted post is blocked");
            Ok(None)
        }
        EmbeddedView::NotFound { uri } => {
            debug!(uri = %uri, "Quoted post not found");
            Ok(None)
        }
        EmbeddedView::Unknown => {
            debug!("Dropping unknown embedded view");
            Ok(None)
        }
    }
}

fn image_object(url: String, alt: &str) -> As1Ref {
    As1Object {
        url: Some(url),
        display_name: Some(alt.to_string()).filter(|alt| !alt.is_empty()),
        ..Default::default()
    }
    .into()
}

fn link_attachment(external: &ExternalLink) -> As1Object {
    As1Object {
        url: Some(external.uri.clone()),
        display_name: Some(external.title.clone()),
        summary: Some(external.description.clone()),
        ..As1Object::with_type("link")
    }
}

fn quote_stub(uri: &str) -> Result<As1Object> {
    Ok(As1Object {
        id: Some(uri.to_string()),
        url: at_uri_to_web_url(uri, None)?,
        ..As1Object::with_type("note")
    })
}
