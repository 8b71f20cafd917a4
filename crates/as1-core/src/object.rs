//! The AS1 object model.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{As1Kind, Error, Result};

/// An AS1 object or activity.
///
/// Objects and activities share one shape: activities set `verb` and usually
/// `actor`/`object`, plain objects set `objectType`. Fields that hold "an
/// object, a bare id, or a list of either" (`object`, `image`, `inReplyTo`)
/// are stored as a list of [`As1Ref`] and serialize back to a single value
/// when they hold exactly one entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct As1Object {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Additional profile links (e.g. verified identities).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Set when `content` holds markup rather than plain text.
    #[serde(
        default,
        rename = "content_is_html",
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub content_is_html: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Box<As1Object>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<Box<As1Object>>,
    #[serde(default, with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub object: Vec<As1Ref>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<As1Object>,
    #[serde(default, with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub image: Vec<As1Ref>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<As1Object>,
    #[serde(default, with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub in_reply_to: Vec<As1Ref>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Box<As1Object>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<As1Object>,
    /// Start of an annotation span, in characters of the parent's `content`.
    #[serde(
        default,
        deserialize_with = "lenient_index",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_index: Option<usize>,
    /// Length of an annotation span, in characters.
    #[serde(
        default,
        deserialize_with = "lenient_index",
        skip_serializing_if = "Option::is_none"
    )]
    pub length: Option<usize>,
}

impl As1Object {
    /// An object with only `objectType` set.
    pub fn with_type(object_type: impl Into<String>) -> Self {
        Self {
            object_type: Some(object_type.into()),
            ..Default::default()
        }
    }

    /// An activity with `objectType: activity` and the given verb.
    pub fn activity(verb: impl Into<String>) -> Self {
        Self {
            object_type: Some("activity".to_string()),
            verb: Some(verb.into()),
            ..Default::default()
        }
    }

    /// An object carrying only an id.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Classify this object by its `(objectType, verb)` discriminator.
    pub fn kind(&self) -> Result<As1Kind> {
        let object_type = non_empty(self.object_type.as_deref());
        let verb = non_empty(self.verb.as_deref());
        if object_type.is_none() && verb.is_none() {
            return Err(Error::MissingRequiredField("objectType"));
        }

        As1Kind::classify(object_type, verb).ok_or_else(|| Error::UnsupportedActivity {
            object_type: object_type.map(str::to_string),
            verb: verb.map(str::to_string),
        })
    }

    /// The first `object` entry, if any.
    pub fn first_object(&self) -> Option<&As1Ref> {
        self.object.first()
    }

    /// The author, falling back to the actor for activities.
    pub fn author_or_actor(&self) -> Option<&As1Object> {
        self.author.as_deref().or(self.actor.as_deref())
    }

    /// URL of the first image.
    pub fn first_image_url(&self) -> Option<&str> {
        self.image.iter().find_map(As1Ref::url)
    }
}

/// A link to another object: either a bare id/URL string or a full object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum As1Ref {
    Id(String),
    Object(Box<As1Object>),
}

impl As1Ref {
    /// The referenced object's id. A bare string is treated as the id.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Id(id) => non_empty(Some(id)),
            Self::Object(obj) => non_empty(obj.id.as_deref()),
        }
    }

    /// The referenced object's URL. A bare string is treated as the URL.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Id(url) => non_empty(Some(url)),
            Self::Object(obj) => non_empty(obj.url.as_deref()),
        }
    }

    /// The id, falling back to the URL.
    pub fn id_or_url(&self) -> Option<&str> {
        self.id().or_else(|| self.url())
    }

    pub fn as_object(&self) -> Option<&As1Object> {
        match self {
            Self::Id(_) => None,
            Self::Object(obj) => Some(obj),
        }
    }
}

impl From<As1Object> for As1Ref {
    fn from(obj: As1Object) -> Self {
        Self::Object(Box::new(obj))
    }
}

impl From<String> for As1Ref {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for As1Ref {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Accepts integers or numeric strings; anything else reads as absent.
fn lenient_index<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

mod one_or_many {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::As1Ref;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<As1Ref>),
        One(As1Ref),
    }

    #[allow(clippy::ptr_arg)]
    pub fn serialize<S: Serializer>(items: &Vec<As1Ref>, serializer: S) -> Result<S::Ok, S::Error> {
        match items.as_slice() {
            [one] => one.serialize(serializer),
            many => many.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<As1Ref>, D::Error> {
        Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(OneOrMany::Many(items)) => items,
            Some(OneOrMany::One(item)) => vec![item],
        })
    }
}
