//! Recursive removal of empty fields.

use crate::{As1Object, As1Ref};

/// A pass that clears empty strings, lists and objects from a fully built
/// structure so they are omitted on serialization.
///
/// Translators build their output freely and call [`Prune::prune`] once
/// before returning it.
pub trait Prune {
    /// Clear empty values in place, recursively.
    fn prune(&mut self);

    /// Whether nothing is left after pruning.
    fn is_blank(&self) -> bool;
}

/// Clear an optional string that holds nothing.
pub fn prune_string(value: &mut Option<String>) {
    if value.as_deref().is_some_and(str::is_empty) {
        *value = None;
    }
}

fn prune_boxed(value: &mut Option<Box<As1Object>>) {
    if let Some(obj) = value.as_deref_mut() {
        obj.prune();
        if obj.is_blank() {
            *value = None;
        }
    }
}

fn prune_objects(values: &mut Vec<As1Object>) {
    for obj in values.iter_mut() {
        obj.prune();
    }
    values.retain(|obj| !obj.is_blank());
}

fn prune_refs(values: &mut Vec<As1Ref>) {
    for value in values.iter_mut() {
        value.prune();
    }
    values.retain(|value| !value.is_blank());
}

impl Prune for As1Object {
    fn prune(&mut self) {
        for field in [
            &mut self.object_type,
            &mut self.verb,
            &mut self.id,
            &mut self.url,
            &mut self.display_name,
            &mut self.username,
            &mut self.title,
            &mut self.summary,
            &mut self.content,
            &mut self.published,
            &mut self.updated,
        ] {
            prune_string(field);
        }
        self.urls.retain(|url| !url.is_empty());

        prune_boxed(&mut self.author);
        prune_boxed(&mut self.actor);
        prune_boxed(&mut self.location);
        prune_refs(&mut self.object);
        prune_refs(&mut self.image);
        prune_refs(&mut self.in_reply_to);
        prune_objects(&mut self.tags);
        prune_objects(&mut self.attachments);
        prune_objects(&mut self.replies);
    }

    fn is_blank(&self) -> bool {
        *self == As1Object::default()
    }
}

impl Prune for As1Ref {
    fn prune(&mut self) {
        if let As1Ref::Object(obj) = self {
            obj.prune();
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            As1Ref::Id(id) => id.is_empty(),
            As1Ref::Object(obj) => obj.is_blank(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_nested() {
        let mut obj = As1Object {
            object_type: Some("person".to_string()),
            display_name: Some(String::new()),
            summary: None,
            author: Some(Box::new(As1Object {
                id: Some(String::new()),
                ..Default::default()
            })),
            image: vec![
                As1Ref::Id(String::new()),
                As1Ref::from(As1Object {
                    url: Some("https://alice.com/alice.jpg".to_string()),
                    ..Default::default()
                }),
                As1Ref::from(As1Object::default()),
            ],
            tags: vec![As1Object {
                display_name: Some(String::new()),
                ..Default::default()
            }],
            ..Default::default()
        };

        obj.prune();

        assert_eq!(obj.display_name, None);
        assert_eq!(obj.author, None);
        assert_eq!(obj.image.len(), 1);
        assert_eq!(obj.first_image_url(), Some("https://alice.com/alice.jpg"));
        assert!(obj.tags.is_empty());
        assert!(!obj.is_blank());
    }

    #[test]
    fn test_prune_keeps_zero_offsets() {
        let mut tag = As1Object {
            url: Some("http://my/link".to_string()),
            start_index: Some(0),
            length: Some(4),
            ..Default::default()
        };
        tag.prune();
        assert_eq!(tag.start_index, Some(0));
    }
}
