//! Rich-text facets and AS1 tags.
//!
//! AS1 tags are positioned by `startIndex`/`length` in characters of the
//! content; facets are positioned by UTF-8 byte offsets into the post text.
//! A tag or facet whose position can't be mapped is kept without one.

use as1_core::{As1Object, Error, Result};
use tracing::debug;

use crate::ids::profile_url;
use crate::lexicon::{ByteSlice, Facet, FacetFeature};

/// Facets for a post's AS1 tags.
///
/// Fails with `UnsupportedContent` when HTML content carries positioned
/// tags, since character offsets into markup don't map onto the post text.
pub fn tags_to_facets(content: &str, content_is_html: bool, tags: &[As1Object]) -> Result<Vec<Facet>> {
    let mut facets = Vec::with_capacity(tags.len());

    for tag in tags {
        let Some(feature) = tag_feature(tag) else {
            debug!(object_type = ?tag.object_type, "Skipping tag with no facet equivalent");
            continue;
        };

        let index = match (tag.start_index, tag.length) {
            (Some(start), Some(length)) => {
                if content_is_html {
                    return Err(Error::UnsupportedContent(
                        "positioned tags over HTML content".to_string(),
                    ));
                }
                let span = char_span_to_bytes(content, start, length);
                if span.is_none() {
                    debug!(start, length, "Tag span out of range, leaving it unpositioned");
                }
                span
            }
            _ => None,
        };

        facets.push(Facet {
            features: vec![feature],
            index,
        });
    }

    Ok(facets)
}

fn tag_feature(tag: &As1Object) -> Option<FacetFeature> {
    match tag.object_type.as_deref() {
        Some("hashtag") => {
            let name = tag
                .display_name
                .as_deref()
                .map(|name| name.trim_start_matches('#'))
                .filter(|name| !name.is_empty());
            if let Some(name) = name {
                return Some(FacetFeature::Tag {
                    tag: name.to_string(),
                });
            }
        }
        Some("mention") => {
            if let Some(did) = tag.id.as_deref().filter(|id| id.starts_with("did:")) {
                return Some(FacetFeature::Mention {
                    did: did.to_string(),
                });
            }
        }
        _ => {}
    }

    tag.url
        .as_deref()
        .filter(|url| !url.is_empty())
        .map(|uri| FacetFeature::Link {
            uri: uri.to_string(),
        })
}

/// AS1 tags for a post's facets.
pub fn facets_to_tags(text: &str, facets: &[Facet]) -> Vec<As1Object> {
    let mut tags = Vec::new();

    for facet in facets {
        let span = facet.index.and_then(|index| byte_span_to_chars(text, index));
        if facet.index.is_some() && span.is_none() {
            debug!(index = ?facet.index, "Facet span doesn't fit the text, leaving it unpositioned");
        }

        for feature in &facet.features {
            let mut tag = match feature {
                FacetFeature::Link { uri } => As1Object {
                    url: Some(uri.clone()),
                    display_name: span.map(|(_, _, spanned)| spanned.to_string()),
                    ..As1Object::with_type("article")
                },
                FacetFeature::Mention { did } => As1Object {
                    id: Some(did.clone()),
                    url: Some(profile_url(did)),
                    ..As1Object::with_type("mention")
                },
                FacetFeature::Tag { tag } => As1Object {
                    display_name: Some(tag.clone()),
                    ..As1Object::with_type("hashtag")
                },
                FacetFeature::Unknown => {
                    debug!("Dropping unknown facet feature");
                    continue;
                }
            };

            if let Some((start, length, _)) = span {
                tag.start_index = Some(start);
                tag.length = Some(length);
            }
            tags.push(tag);
        }
    }

    tags
}

/// Byte offset of the character at `chars`, or the text length when
/// `chars` is one past the end.
fn byte_offset(text: &str, chars: usize) -> Option<usize> {
    text.char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .nth(chars)
}

fn char_span_to_bytes(text: &str, start: usize, length: usize) -> Option<ByteSlice> {
    if length == 0 {
        return None;
    }
    let end = start.checked_add(length)?;
    Some(ByteSlice {
        byte_start: byte_offset(text, start)?,
        byte_end: byte_offset(text, end)?,
    })
}

/// Character start, character length and the spanned text.
fn byte_span_to_chars(text: &str, span: ByteSlice) -> Option<(usize, usize, &str)> {
    if span.byte_end <= span.byte_start {
        return None;
    }
    let prefix = text.get(..span.byte_start)?;
    let spanned = text.get(span.byte_start..span.byte_end)?;
    Some((prefix.chars().count(), spanned.chars().count(), spanned))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(url: &str, start: Option<usize>, length: Option<usize>) -> As1Object {
        As1Object {
            url: Some(url.to_string()),
            start_index: start,
            length,
            ..As1Object::with_type("article")
        }
    }

    #[test]
    fn test_ascii_offsets() {
        let facets =
            tags_to_facets("My original post", false, &[link("http://my/link", Some(3), Some(8))])
                .unwrap();
        assert_eq!(
            facets,
            vec![Facet {
                features: vec![FacetFeature::Link {
                    uri: "http://my/link".to_string()
                }],
                index: Some(ByteSlice {
                    byte_start: 3,
                    byte_end: 11
                }),
            }]
        );
    }

    #[test]
    fn test_multibyte_offsets() {
        let text = "Hé 🦋 butterfly";
        let facets = tags_to_facets(text, false, &[link("http://b", Some(3), Some(11))]).unwrap();
        let index = facets[0].index.unwrap();
        assert_eq!(index.byte_start, 4);
        assert_eq!(index.byte_end, 18);
        // the butterfly is four bytes, one character
        assert_eq!(index.byte_end - index.byte_start, 11 + 3);

        let tags = facets_to_tags(text, &facets);
        assert_eq!(tags[0].start_index, Some(3));
        assert_eq!(tags[0].length, Some(11));
        assert_eq!(tags[0].display_name.as_deref(), Some("🦋 butterfly"));
    }

    #[test]
    fn test_bad_offsets_are_unpositioned() {
        let facets = tags_to_facets(
            "short",
            false,
            &[
                link("http://a", Some(3), Some(10)),
                link("http://b", None, Some(2)),
                link("http://c", Some(1), Some(0)),
            ],
        )
        .unwrap();
        assert_eq!(facets.len(), 3);
        assert!(facets.iter().all(|facet| facet.index.is_none()));
    }

    #[test]
    fn test_html_with_positions_fails() {
        let err = tags_to_facets("<em>hi</em>", true, &[link("http://a", Some(0), Some(2))])
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedContent(_)));

        // unpositioned tags are fine
        assert!(tags_to_facets("<em>hi</em>", true, &[link("http://a", None, None)]).is_ok());
    }

    #[test]
    fn test_feature_choice() {
        let tags = vec![
            As1Object {
                display_name: Some("#rust".to_string()),
                ..As1Object::with_type("hashtag")
            },
            As1Object {
                id: Some("did:plc:alice".to_string()),
                url: Some("https://bsky.app/profile/alice.com".to_string()),
                ..As1Object::with_type("mention")
            },
            As1Object::with_type("hashtag"),
        ];
        let facets = tags_to_facets("hi", false, &tags).unwrap();
        let features: Vec<_> = facets.into_iter().flat_map(|f| f.features).collect();
        assert_eq!(
            features,
            vec![
                FacetFeature::Tag {
                    tag: "rust".to_string()
                },
                FacetFeature::Mention {
                    did: "did:plc:alice".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_facets_to_tags() {
        let facets = vec![
            Facet {
                features: vec![FacetFeature::Mention {
                    did: "did:plc:alice".to_string(),
                }],
                index: Some(ByteSlice {
                    byte_start: 0,
                    byte_end: 6,
                }),
            },
            Facet {
                features: vec![FacetFeature::Tag {
                    tag: "rust".to_string(),
                }, FacetFeature::Unknown],
                index: None,
            },
        ];
        let tags = facets_to_tags("@alice #rust", &facets);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].object_type.as_deref(), Some("mention"));
        assert_eq!(tags[0].url.as_deref(), Some("https://bsky.app/profile/did:plc:alice"));
        assert_eq!(tags[0].start_index, Some(0));
        assert_eq!(tags[0].length, Some(6));
        assert_eq!(tags[1].display_name.as_deref(), Some("rust"));
        assert_eq!(tags[1].start_index, None);
    }
}
