//! `app.bsky.*` record and view shapes.
//!
//! Records are what gets written to a repository; views are the hydrated
//! forms the AppView returns. Unions are tagged on `$type`. Unknown union
//! members deserialize to an `Unknown` variant so decoding can drop them.

use std::fmt;
use std::str::FromStr;

use as1_core::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::blob_ref_to_url;

pub const ACTOR_PROFILE: &str = "app.bsky.actor.profile";
pub const FEED_POST: &str = "app.bsky.feed.post";
pub const FEED_REPOST: &str = "app.bsky.feed.repost";
pub const FEED_LIKE: &str = "app.bsky.feed.like";
pub const FEED_GENERATOR: &str = "app.bsky.feed.generator";
pub const GRAPH_FOLLOW: &str = "app.bsky.graph.follow";

pub const PROFILE_VIEW: &str = "app.bsky.actor.defs#profileView";
pub const PROFILE_VIEW_BASIC: &str = "app.bsky.actor.defs#profileViewBasic";
pub const PROFILE_VIEW_DETAILED: &str = "app.bsky.actor.defs#profileViewDetailed";
pub const POST_VIEW: &str = "app.bsky.feed.defs#postView";
pub const FEED_VIEW_POST: &str = "app.bsky.feed.defs#feedViewPost";
pub const THREAD_VIEW_POST: &str = "app.bsky.feed.defs#threadViewPost";
pub const BLOCKED_POST: &str = "app.bsky.feed.defs#blockedPost";
pub const NOT_FOUND_POST: &str = "app.bsky.feed.defs#notFoundPost";
pub const EMBED_VIEW_RECORD: &str = "app.bsky.embed.record#viewRecord";
pub const EMBED_VIEW_BLOCKED: &str = "app.bsky.embed.record#viewBlocked";
pub const EMBED_VIEW_NOT_FOUND: &str = "app.bsky.embed.record#viewNotFound";

/// Top-level wire types accepted by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BskyType {
    ActorProfile,
    FeedPost,
    FeedRepost,
    FeedLike,
    GraphFollow,
    ProfileView,
    ProfileViewBasic,
    ProfileViewDetailed,
    PostView,
    FeedViewPost,
    ThreadViewPost,
    BlockedPost,
    NotFoundPost,
    ViewRecord,
    ViewBlocked,
    ViewNotFound,
}

impl BskyType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ActorProfile => ACTOR_PROFILE,
            Self::FeedPost => FEED_POST,
            Self::FeedRepost => FEED_REPOST,
            Self::FeedLike => FEED_LIKE,
            Self::GraphFollow => GRAPH_FOLLOW,
            Self::ProfileView => PROFILE_VIEW,
            Self::ProfileViewBasic => PROFILE_VIEW_BASIC,
            Self::ProfileViewDetailed => PROFILE_VIEW_DETAILED,
            Self::PostView => POST_VIEW,
            Self::FeedViewPost => FEED_VIEW_POST,
            Self::ThreadViewPost => THREAD_VIEW_POST,
            Self::BlockedPost => BLOCKED_POST,
            Self::NotFoundPost => NOT_FOUND_POST,
            Self::ViewRecord => EMBED_VIEW_RECORD,
            Self::ViewBlocked => EMBED_VIEW_BLOCKED,
            Self::ViewNotFound => EMBED_VIEW_NOT_FOUND,
        }
    }
}

impl FromStr for BskyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            ACTOR_PROFILE => Self::ActorProfile,
            FEED_POST => Self::FeedPost,
            FEED_REPOST => Self::FeedRepost,
            FEED_LIKE => Self::FeedLike,
            GRAPH_FOLLOW => Self::GraphFollow,
            PROFILE_VIEW => Self::ProfileView,
            PROFILE_VIEW_BASIC => Self::ProfileViewBasic,
            PROFILE_VIEW_DETAILED => Self::ProfileViewDetailed,
            POST_VIEW => Self::PostView,
            FEED_VIEW_POST => Self::FeedViewPost,
            THREAD_VIEW_POST => Self::ThreadViewPost,
            BLOCKED_POST => Self::BlockedPost,
            NOT_FOUND_POST => Self::NotFoundPost,
            EMBED_VIEW_RECORD => Self::ViewRecord,
            EMBED_VIEW_BLOCKED => Self::ViewBlocked,
            EMBED_VIEW_NOT_FOUND => Self::ViewNotFound,
            other => return Err(Error::UnsupportedType(other.to_string())),
        })
    }
}

impl fmt::Display for BskyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Records

/// A repository record, as produced by the encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum BskyRecord {
    #[serde(rename = "app.bsky.actor.profile")]
    Profile(ProfileRecord),
    #[serde(rename = "app.bsky.feed.post")]
    Post(PostRecord),
    #[serde(rename = "app.bsky.feed.repost")]
    Repost(SubjectRecord),
    #[serde(rename = "app.bsky.feed.like")]
    Like(SubjectRecord),
    #[serde(rename = "app.bsky.graph.follow")]
    Follow(FollowRecord),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
}

/// An image slot: an uploaded blob, or a plain URL when no blob is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    Url(String),
    Blob(Value),
}

impl ImageRef {
    /// Fetchable URL for this image. Blobs need the repository DID and PDS.
    pub fn to_url(&self, repo_did: Option<&str>, pds: Option<&str>) -> Option<String> {
        match self {
            Self::Url(url) if !url.is_empty() => Some(url.clone()),
            Self::Url(_) => None,
            Self::Blob(blob) => blob_ref_to_url(blob, repo_did, pds),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<RecordEmbed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<ReplyRef>,
}

/// `com.atproto.repo.strongRef`. The CID is only set when the caller
/// supplied it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrongRef {
    #[serde(default)]
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyRef {
    pub root: StrongRef,
    pub parent: StrongRef,
}

/// Repost and like records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRecord {
    pub subject: StrongRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRecord {
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

// Rich text

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    #[serde(default)]
    pub features: Vec<FacetFeature>,
    /// Absent for unpositioned annotations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<ByteSlice>,
}

/// UTF-8 byte span over the post text, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByteSlice {
    pub byte_start: usize,
    pub byte_end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum FacetFeature {
    #[serde(rename = "app.bsky.richtext.facet#link")]
    Link { uri: String },
    #[serde(rename = "app.bsky.richtext.facet#mention")]
    Mention { did: String },
    #[serde(rename = "app.bsky.richtext.facet#tag")]
    Tag { tag: String },
    #[serde(other)]
    Unknown,
}

// Embeds

/// Embeds as written in a post record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum RecordEmbed {
    #[serde(rename = "app.bsky.embed.images")]
    Images { images: Vec<EmbedImage> },
    #[serde(rename = "app.bsky.embed.external")]
    External { external: ExternalLink },
    #[serde(rename = "app.bsky.embed.record")]
    Record { record: StrongRef },
    #[serde(rename = "app.bsky.embed.recordWithMedia")]
    RecordWithMedia {
        record: Box<RecordEmbed>,
        media: Box<RecordEmbed>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedImage {
    #[serde(default)]
    pub alt: String,
    pub image: ImageRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalLink {
    pub uri: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Embeds as hydrated in a post view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum ViewEmbed {
    #[serde(rename = "app.bsky.embed.images#view")]
    Images { images: Vec<ViewImage> },
    #[serde(rename = "app.bsky.embed.external#view")]
    External { external: ExternalLink },
    #[serde(rename = "app.bsky.embed.record#view")]
    Record { record: EmbeddedView },
    #[serde(rename = "app.bsky.embed.recordWithMedia#view")]
    RecordWithMedia {
        record: Box<ViewEmbed>,
        media: Box<ViewEmbed>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewImage {
    #[serde(default)]
    pub alt: String,
    pub fullsize: String,
    #[serde(default)]
    pub thumb: String,
}

/// The quoted record inside an `app.bsky.embed.record#view`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum EmbeddedView {
    #[serde(rename = "app.bsky.embed.record#viewRecord")]
    Record(ViewRecord),
    #[serde(rename = "app.bsky.embed.record#viewBlocked")]
    Blocked {
        #[serde(default)]
        uri: String,
    },
    #[serde(rename = "app.bsky.embed.record#viewNotFound")]
    NotFound {
        #[serde(default)]
        uri: String,
    },
    #[serde(other)]
    Unknown,
}

// Views

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub did: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<ProfileView>,
    #[serde(default)]
    pub record: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed: Option<ViewEmbed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedViewPost {
    pub post: PostView,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<Reason>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "$type")]
pub enum Reason {
    #[serde(rename = "app.bsky.feed.defs#reasonRepost", rename_all = "camelCase")]
    Repost {
        by: ProfileView,
        #[serde(default)]
        indexed_at: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

/// A post with its replies. Each reply is itself a thread view, or a
/// blocked or missing post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadViewPost {
    pub post: PostView,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRecord {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<ProfileView>,
    /// The quoted record itself.
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<ViewEmbed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_at: Option<String>,
}
