use as1_core::Error;

pub const KIND_METADATA: u16 = 0;
pub const KIND_TEXT_NOTE: u16 = 1;
pub const KIND_CONTACTS: u16 = 3;
pub const KIND_DELETION: u16 = 5;
pub const KIND_REPOST: u16 = 6;
pub const KIND_REACTION: u16 = 7;
pub const KIND_LONG_FORM: u16 = 30023;

/// Event kinds the translator models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Metadata,
    TextNote,
    Contacts,
    Deletion,
    Repost,
    Reaction,
    LongForm,
}

impl EventKind {
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Metadata => KIND_METADATA,
            Self::TextNote => KIND_TEXT_NOTE,
            Self::Contacts => KIND_CONTACTS,
            Self::Deletion => KIND_DELETION,
            Self::Repost => KIND_REPOST,
            Self::Reaction => KIND_REACTION,
            Self::LongForm => KIND_LONG_FORM,
        }
    }
}

impl TryFrom<u16> for EventKind {
    type Error = Error;

    fn try_from(kind: u16) -> Result<Self, Self::Error> {
        match kind {
            KIND_METADATA => Ok(Self::Metadata),
            KIND_TEXT_NOTE => Ok(Self::TextNote),
            KIND_CONTACTS => Ok(Self::Contacts),
            KIND_DELETION => Ok(Self::Deletion),
            KIND_REPOST => Ok(Self::Repost),
            KIND_REACTION => Ok(Self::Reaction),
            KIND_LONG_FORM => Ok(Self::LongForm),
            other => Err(Error::UnsupportedKind(other)),
        }
    }
}
