//! Discriminator dispatch for AS1 objects.

/// The closed set of AS1 shapes the translators understand.
///
/// Each platform matches on this exhaustively, so adding a variant is flagged
/// at every dispatch site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum As1Kind {
    Person,
    Note,
    Article,
    Comment,
    Mention,
    /// `post` activity wrapping a single object.
    Post,
    /// `update` activity wrapping a single object.
    Update,
    Share,
    Like,
    Dislike,
    React,
    Follow,
    Delete,
}

impl As1Kind {
    /// Classify an `(objectType, verb)` pair. A verb wins over the object type.
    pub fn classify(object_type: Option<&str>, verb: Option<&str>) -> Option<Self> {
        if let Some(verb) = verb {
            return match verb {
                "post" => Some(Self::Post),
                "update" => Some(Self::Update),
                "share" => Some(Self::Share),
                "like" => Some(Self::Like),
                "dislike" => Some(Self::Dislike),
                "react" => Some(Self::React),
                "follow" => Some(Self::Follow),
                "delete" => Some(Self::Delete),
                _ => None,
            };
        }

        match object_type? {
            "person" => Some(Self::Person),
            "note" => Some(Self::Note),
            "article" => Some(Self::Article),
            "comment" => Some(Self::Comment),
            "mention" => Some(Self::Mention),
            _ => None,
        }
    }
}
