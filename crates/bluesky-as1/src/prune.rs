//! Empty-field removal for encoded records.
//!
//! Required lexicon strings (`text`, `uri`, image `alt`, link `title`) are
//! left alone; only optional fields are cleared.

use as1_core::{prune_string, Prune};

use crate::lexicon::{
    BskyRecord, FollowRecord, ImageRef, PostRecord, ProfileRecord, RecordEmbed, StrongRef,
    SubjectRecord,
};

impl Prune for BskyRecord {
    fn prune(&mut self) {
        match self {
            Self::Profile(profile) => profile.prune(),
            Self::Post(post) => post.prune(),
            Self::Repost(subject) | Self::Like(subject) => subject.prune(),
            Self::Follow(follow) => follow.prune(),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Self::Profile(profile) => profile.is_blank(),
            Self::Post(post) => post.is_blank(),
            Self::Repost(subject) | Self::Like(subject) => subject.is_blank(),
            Self::Follow(follow) => follow.is_blank(),
        }
    }
}

fn prune_image(image: &mut Option<ImageRef>) {
    if matches!(image, Some(ImageRef::Url(url)) if url.is_empty()) {
        *image = None;
    }
}

impl Prune for ProfileRecord {
    fn prune(&mut self) {
        prune_string(&mut self.display_name);
        prune_string(&mut self.description);
        prune_string(&mut self.handle);
        prune_image(&mut self.avatar);
        prune_image(&mut self.banner);
    }

    fn is_blank(&self) -> bool {
        *self == ProfileRecord::default()
    }
}

impl Prune for PostRecord {
    fn prune(&mut self) {
        prune_string(&mut self.created_at);
        if let Some(reply) = &mut self.reply {
            reply.root.prune();
            reply.parent.prune();
        }
        if let Some(embed) = &mut self.embed {
            prune_embed(embed);
        }
    }

    fn is_blank(&self) -> bool {
        *self == PostRecord::default()
    }
}

fn prune_embed(embed: &mut RecordEmbed) {
    match embed {
        RecordEmbed::Record { record } => record.prune(),
        RecordEmbed::RecordWithMedia { record, media } => {
            prune_embed(record);
            prune_embed(media);
        }
        RecordEmbed::Images { .. } | RecordEmbed::External { .. } | RecordEmbed::Unknown => {}
    }
}

impl Prune for StrongRef {
    fn prune(&mut self) {
        prune_string(&mut self.cid);
    }

    fn is_blank(&self) -> bool {
        *self == StrongRef::default()
    }
}

impl Prune for SubjectRecord {
    fn prune(&mut self) {
        self.subject.prune();
        prune_string(&mut self.created_at);
    }

    fn is_blank(&self) -> bool {
        self.subject.is_blank() && self.created_at.is_none()
    }
}

impl Prune for FollowRecord {
    fn prune(&mut self) {
        prune_string(&mut self.created_at);
    }

    fn is_blank(&self) -> bool {
        self.subject.is_empty() && self.created_at.is_none()
    }
}
