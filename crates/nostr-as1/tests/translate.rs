use as1_core::{As1Object, Error, Translator};
use nostr_as1::{
    e_tag, e_tag_marked, from_as1, id_for, p_tag, t_tag, to_as1, verify_id, DecodeContext,
    EncodeContext, Nostr, NostrEvent, NostrTag,
};
use nostr_sdk::prelude::*;
use serde_json::{json, Value};

const NOW_TS: u64 = 1641092645;
const NOW_ISO: &str = "2022-01-02T03:04:05";
const THEN_TS: u64 = NOW_TS - 1;
const THEN_ISO: &str = "2022-01-02T03:04:04";
const RELAY: &str = "wss://relay.example";

fn event(value: Value) -> NostrEvent {
    serde_json::from_value(value).unwrap()
}

fn as1(value: Value) -> As1Object {
    serde_json::from_value(value).unwrap()
}

fn decode(event: &NostrEvent) -> Value {
    serde_json::to_value(to_as1(event, &DecodeContext::default()).unwrap()).unwrap()
}

fn encode(obj: Value) -> NostrEvent {
    let ctx = EncodeContext::default().with_relay_hint(RELAY);
    let event = from_as1(&as1(obj), &ctx).unwrap();
    assert_eq!(event.id, id_for(&event));
    event
}

fn tag(name: &str, values: &[&str]) -> NostrTag {
    NostrTag::new(name, values.iter().map(|v| v.to_string()).collect())
}

mod notes {
    use super::*;

    #[test]
    fn test_note() {
        let note = json!({
            "objectType": "note",
            "id": "nostr:note1z24swknlsf",
            "author": {"id": "nostr:npub1nrlqrdny0w"},
            "content": "Something to say",
            "published": NOW_ISO,
        });
        let wire = event(json!({
            "kind": 1,
            "id": "12ab",
            "pubkey": "98fe",
            "content": "Something to say",
            "created_at": NOW_TS,
            "tags": [],
        }));
        assert_eq!(decode(&wire), note);

        let encoded = encode(note);
        assert_eq!(encoded.kind, 1);
        assert_eq!(encoded.pubkey, "98fe");
        assert_eq!(encoded.created_at, NOW_TS);
        assert_eq!(encoded.content, "Something to say");
        assert!(encoded.tags.is_empty());
        assert_ne!(encoded.id, "12ab");
    }

    #[test]
    fn test_subject_tag() {
        let wire = event(json!({
            "kind": 1,
            "id": "12ab",
            "content": "Something to say",
            "tags": [["title", "my thing"], ["subject", "my thing"]],
        }));
        assert_eq!(
            decode(&wire),
            json!({
                "objectType": "note",
                "id": "nostr:note1z24swknlsf",
                "content": "Something to say",
                "title": "my thing",
            })
        );

        let subject_only = event(json!({
            "kind": 1,
            "content": "Something to say",
            "tags": [["subject", "only a subject"]],
        }));
        assert_eq!(decode(&subject_only)["title"], "only a subject");

        let encoded = encode(json!({
            "objectType": "note",
            "content": "Something to say",
            "title": "my thing",
        }));
        assert_eq!(
            encoded.tags,
            vec![tag("title", &["my thing"]), tag("subject", &["my thing"])]
        );
    }

    #[test]
    fn test_hashtags_keep_order() {
        let wire = event(json!({
            "kind": 1,
            "pubkey": "98fe",
            "created_at": NOW_TS,
            "content": "hi",
            "tags": [["t", "foo"], ["t", "bar"]],
        }));
        let decoded = decode(&wire);
        assert_eq!(
            decoded["tags"],
            json!([
                {"objectType": "hashtag", "displayName": "foo"},
                {"objectType": "hashtag", "displayName": "bar"},
            ])
        );

        let encoded = encode(decoded);
        assert_eq!(encoded.tags, vec![t_tag("foo"), t_tag("bar")]);
        assert_eq!(encoded.id, id_for(&wire));
    }

    #[test]
    fn test_event_and_profile_mentions() {
        let wire = event(json!({
            "kind": 1,
            "pubkey": "98fe",
            "created_at": NOW_TS,
            "content": "look at this",
            "tags": [["e", "34cd", RELAY, "mention"], ["p", "98fe"]],
        }));
        let decoded = decode(&wire);
        assert_eq!(
            decoded["tags"],
            json!([
                {"objectType": "mention", "id": "nostr:nevent1xnxsm5fasn"},
                {"objectType": "mention", "id": "nostr:npub1nrlqrdny0w"},
            ])
        );
        assert!(decoded.get("inReplyTo").is_none());

        let encoded = encode(decoded);
        assert_eq!(encoded.tags, wire.tags);
        assert_eq!(encoded.id, id_for(&wire));
    }

    #[test]
    fn test_note_mention_encodes_as_e_tag() {
        let encoded = encode(json!({
            "objectType": "note",
            "content": "quoting",
            "tags": [
                {"objectType": "mention", "id": "nostr:note1xnxs50q044"},
                {"objectType": "mention", "id": "nostr:npub1nrlqrdny0w"},
            ],
        }));
        assert_eq!(
            encoded.tags,
            vec![e_tag_marked("34cd", RELAY, "mention"), p_tag("98fe")]
        );
    }

    #[test]
    fn test_location() {
        let wire = event(json!({
            "kind": 1,
            "id": "12ab",
            "pubkey": "98fe",
            "content": "Something to say",
            "created_at": NOW_TS,
            "tags": [["location", "my house"]],
        }));
        let decoded = decode(&wire);
        assert_eq!(decoded["location"], json!({"displayName": "my house"}));

        let encoded = encode(decoded);
        assert_eq!(encoded.tags, vec![tag("location", &["my house"])]);
    }

    #[test]
    fn test_article() {
        let article = json!({
            "objectType": "article",
            "id": "nostr:note1z24swknlsf",
            "author": {"id": "nostr:npub1nrlqrdny0w"},
            "title": "a thing",
            "summary": "about the thing",
            "content": "Something to say",
            "published": NOW_ISO,
        });
        let wire = event(json!({
            "kind": 30023,
            "id": "12ab",
            "pubkey": "98fe",
            "content": "Something to say",
            "created_at": NOW_TS,
            "tags": [
                ["published_at", NOW_TS.to_string()],
                ["title", "a thing"],
                ["subject", "a thing"],
                ["summary", "about the thing"],
            ],
        }));
        assert_eq!(decode(&wire), article);

        let encoded = encode(article);
        assert_eq!(encoded.kind, 30023);
        assert_eq!(encoded.tags, wire.tags);
    }

    #[test]
    fn test_reply() {
        let reply = json!({
            "objectType": "note",
            "id": "nostr:note1z24swknlsf",
            "author": {"id": "nostr:npub1nrlqrdny0w"},
            "published": NOW_ISO,
            "content": "I hereby reply",
            "inReplyTo": "nostr:nevent1xnxsm5fasn",
        });
        let wire = event(json!({
            "kind": 1,
            "id": "12ab",
            "pubkey": "98fe",
            "content": "I hereby reply",
            "tags": [["e", "34cd", RELAY, "reply"]],
            "created_at": NOW_TS,
        }));
        assert_eq!(decode(&wire), reply);

        let encoded = encode(reply);
        assert_eq!(encoded.tags, vec![e_tag_marked("34cd", RELAY, "reply")]);
    }

    #[test]
    fn test_reply_without_relay_hint() {
        let encoded = from_as1(
            &as1(json!({
                "objectType": "comment",
                "content": "re",
                "inReplyTo": "nostr:nevent1xnxsm5fasn",
            })),
            &EncodeContext::default(),
        )
        .unwrap();
        assert_eq!(encoded.kind, 1);
        assert_eq!(encoded.tags, vec![e_tag_marked("34cd", "", "reply")]);
    }

    #[test]
    fn test_post_activity_unwraps() {
        let encoded = encode(json!({
            "objectType": "activity",
            "verb": "post",
            "object": {
                "objectType": "note",
                "content": "wrapped",
                "published": NOW_ISO,
            },
        }));
        assert_eq!(encoded.kind, 1);
        assert_eq!(encoded.content, "wrapped");
    }
}

mod activities {
    use super::*;

    #[test]
    fn test_repost() {
        let repost = json!({
            "objectType": "activity",
            "verb": "share",
            "id": "nostr:nevent1z24spd6d40",
            "published": NOW_ISO,
            "object": {
                "objectType": "note",
                "id": "nostr:note1xnxs50q044",
                "author": {"id": "nostr:npub1nrlqrdny0w"},
                "content": "The orig post",
                "published": THEN_ISO,
            },
        });
        let inner = NostrEvent {
            id: "34cd".to_string(),
            pubkey: "98fe".to_string(),
            created_at: THEN_TS,
            kind: 1,
            tags: vec![],
            content: "The orig post".to_string(),
            sig: None,
        };
        let mut wire = event(json!({
            "kind": 6,
            "id": "12ab",
            "content": inner.to_sorted_json().unwrap(),
            "tags": [["e", "34cd", RELAY, "mention"], ["p", "98fe"]],
            "created_at": NOW_TS,
        }));
        assert_eq!(decode(&wire), repost);

        // stripped content falls back to the e tag
        wire.content.clear();
        let mut stripped = repost.clone();
        stripped["object"] = json!("nostr:note1xnxs50q044");
        assert_eq!(decode(&wire), stripped);

        let encoded = encode(repost);
        assert_eq!(encoded.kind, 6);
        let embedded: NostrEvent = serde_json::from_str(&encoded.content).unwrap();
        assert_eq!(embedded, inner);
        assert_eq!(
            encoded.tags,
            vec![e_tag_marked("34cd", RELAY, "mention"), p_tag("98fe")]
        );
    }

    #[test]
    fn test_repost_reference_is_stable() {
        // no published on the reposted note, so its created_at is "now"
        let repost = json!({
            "objectType": "activity",
            "verb": "share",
            "object": {
                "objectType": "note",
                "id": "nostr:note1xnxs50q044",
                "content": "The orig post",
            },
        });
        let first = encode(repost.clone());
        let second = encode(repost);
        assert_eq!(first.tags, vec![e_tag_marked("34cd", RELAY, "mention")]);
        assert_eq!(first.tags, second.tags);

        let embedded: NostrEvent = serde_json::from_str(&first.content).unwrap();
        assert_eq!(embedded.id, "34cd");
    }

    #[test]
    fn test_repost_of_unidentified_note() {
        let encoded = encode(json!({
            "objectType": "activity",
            "verb": "share",
            "object": {
                "objectType": "note",
                "content": "The orig post",
                "published": THEN_ISO,
            },
        }));
        let embedded: NostrEvent = serde_json::from_str(&encoded.content).unwrap();
        assert!(verify_id(&embedded).is_ok());
        assert_eq!(
            encoded.tags,
            vec![e_tag_marked(&embedded.id, RELAY, "mention")]
        );
    }

    #[test]
    fn test_repost_of_bare_id() {
        let encoded = encode(json!({
            "objectType": "activity",
            "verb": "share",
            "object": "nostr:note1xnxs50q044",
        }));
        assert_eq!(encoded.content, "");
        assert_eq!(encoded.tags, vec![e_tag_marked("34cd", RELAY, "mention")]);
    }

    #[test]
    fn test_like_dislike_react() {
        for (verb, content) in [("like", "+"), ("dislike", "-"), ("react", "😀")] {
            let mut activity = json!({
                "objectType": "activity",
                "verb": verb,
                "id": "nostr:nevent1z24spd6d40",
                "published": NOW_ISO,
                "object": "nostr:nevent1xnxsm5fasn",
            });
            if verb == "react" {
                activity["content"] = json!(content);
            }
            let wire = event(json!({
                "kind": 7,
                "id": "12ab",
                "content": content,
                "tags": [["e", "34cd"]],
                "created_at": NOW_TS,
            }));
            assert_eq!(decode(&wire), activity, "{verb}");

            let encoded = encode(activity);
            assert_eq!(encoded.kind, 7);
            assert_eq!(encoded.content, content);
            assert_eq!(encoded.tags, vec![e_tag("34cd")]);
        }
    }

    #[test]
    fn test_empty_reaction_is_like() {
        let wire = event(json!({
            "kind": 7,
            "content": "",
            "tags": [["e", "34cd"]],
        }));
        assert_eq!(decode(&wire)["verb"], "like");
    }

    #[test]
    fn test_delete() {
        let delete = json!({
            "objectType": "activity",
            "verb": "delete",
            "id": "nostr:nevent1z24spd6d40",
            "published": NOW_ISO,
            "object": "nostr:nevent1xnxsm5fasn",
            "content": "a note about the delete",
        });
        let wire = event(json!({
            "kind": 5,
            "id": "12ab",
            "content": "a note about the delete",
            "tags": [["e", "34cd"]],
            "created_at": NOW_TS,
        }));
        assert_eq!(decode(&wire), delete);

        let encoded = encode(delete);
        assert_eq!(encoded.kind, 5);
        assert_eq!(encoded.content, "a note about the delete");
        assert_eq!(encoded.tags, vec![e_tag("34cd")]);
    }

    #[test]
    fn test_delete_many() {
        let encoded = encode(json!({
            "objectType": "activity",
            "verb": "delete",
            "object": ["nostr:nevent1xnxsm5fasn", "nostr:nevent1z24spd6d40"],
        }));
        assert_eq!(encoded.tags, vec![e_tag("34cd"), e_tag("12ab")]);
    }

    #[test]
    fn test_followings() {
        let follow = json!({
            "objectType": "activity",
            "verb": "follow",
            "id": "nostr:nevent1z24spd6d40",
            "published": NOW_ISO,
            "object": [
                "nostr:npub1xnxsce33j3",
                {"id": "nostr:npub1nrlqrdny0w", "displayName": "bob"},
            ],
            "content": "not important",
        });
        let wire = event(json!({
            "kind": 3,
            "id": "12ab",
            "content": "not important",
            "tags": [
                ["p", "34cd", RELAY, ""],
                ["p", "98fe", RELAY, "bob"],
            ],
            "created_at": NOW_TS,
        }));
        assert_eq!(decode(&wire), follow);

        let encoded = encode(follow);
        assert_eq!(encoded.kind, 3);
        assert_eq!(encoded.tags, wire.tags);
    }

    #[test]
    fn test_single_follow() {
        let encoded = encode(json!({
            "objectType": "activity",
            "verb": "follow",
            "actor": {"id": "nostr:npub1z24szqzphd"},
            "object": "nostr:npub1xnxsce33j3",
        }));
        assert_eq!(encoded.pubkey, "12ab");
        assert_eq!(encoded.tags, vec![tag("p", &["34cd", RELAY, ""])]);
    }
}

mod profiles {
    use super::*;

    #[test]
    fn test_profile() {
        let person = json!({
            "objectType": "person",
            "id": "nostr:npub1z24szqzphd",
            "displayName": "Alice",
            "summary": "It me",
            "image": "http://alice/pic",
            "username": "alice.com",
            "urls": [
                "https://github.com/semisol",
                "https://twitter.com/semisol_public",
                "https://bitcoinhackers.org/@semisol",
                "https://t.me/1087295469",
            ],
        });
        let content = r#"{"about":"It me","name":"Alice","nip05":"_@alice.com","picture":"http://alice/pic"}"#;
        let wire = event(json!({
            "kind": 0,
            "id": "12ab",
            "pubkey": "12ab",
            "content": content,
            "tags": [
                ["i", "github:semisol", "-"],
                ["i", "twitter:semisol_public", "-"],
                ["i", "mastodon:bitcoinhackers.org/@semisol", "-"],
                ["i", "telegram:1087295469", "-"],
            ],
        }));
        assert_eq!(decode(&wire), person);

        let encoded = encode(person);
        assert_eq!(encoded.kind, 0);
        assert_eq!(encoded.pubkey, "12ab");
        assert_eq!(encoded.content, content);
        // Mastodon URLs are never guessed
        assert_eq!(
            encoded.tags,
            vec![
                tag("i", &["github:semisol", "-"]),
                tag("i", &["twitter:semisol_public", "-"]),
                tag("i", &["telegram:1087295469", "-"]),
            ]
        );
    }

    #[test]
    fn test_profile_requires_id() {
        let err = from_as1(
            &as1(json!({"objectType": "person", "displayName": "Alice"})),
            &EncodeContext::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MissingRequiredField("id")));
    }
}

mod errors {
    use super::*;

    #[test]
    fn test_unknown_kind() {
        let wire = event(json!({"kind": 1984, "content": "report"}));
        let err = to_as1(&wire, &DecodeContext::default()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedKind(1984)));
    }

    #[test]
    fn test_unknown_activity() {
        let err = from_as1(
            &as1(json!({"objectType": "activity", "verb": "rsvp-yes"})),
            &EncodeContext::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedActivity { .. }));
    }

    #[test]
    fn test_verify_ids() {
        let wire = event(json!({
            "kind": 1,
            "id": "12ab",
            "pubkey": "98fe",
            "content": "Something to say",
        }));

        // lenient by default: the claimed id is kept
        assert_eq!(decode(&wire)["id"], "nostr:note1z24swknlsf");

        let err = to_as1(&wire, &DecodeContext::verifying()).unwrap_err();
        match err {
            Error::IdMismatch { claimed, computed } => {
                assert_eq!(claimed, "12ab");
                assert_eq!(computed, id_for(&wire));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_bech32_reference() {
        let err = from_as1(
            &as1(json!({
                "objectType": "activity",
                "verb": "like",
                "object": "nostr:nevent1xnxsm5fasx",
            })),
            &EncodeContext::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { .. }));
    }
}

mod translator {
    use super::*;

    #[test]
    fn test_translator_roundtrip() {
        let nostr = Nostr;
        assert_eq!(nostr.name(), "nostr");

        let wire = nostr
            .encode(
                &as1(json!({
                    "objectType": "note",
                    "content": "hi",
                    "published": NOW_ISO,
                    "tags": [{"objectType": "hashtag", "displayName": "foo"}],
                })),
                &EncodeContext::default(),
            )
            .unwrap();
        assert_eq!(wire["kind"], 1);
        assert_eq!(wire["tags"], json!([["t", "foo"]]));
        assert!(wire.get("sig").is_none());

        let obj = nostr
            .decode(&wire, &DecodeContext::verifying())
            .unwrap()
            .unwrap();
        assert_eq!(obj.content.as_deref(), Some("hi"));
        assert_eq!(obj.published.as_deref(), Some(NOW_ISO));
    }
}

mod sdk {
    use super::*;

    #[test]
    fn test_canonical_id_matches_signed_event() {
        let keys = Keys::generate();
        let signed = EventBuilder::text_note("say \"hi\"\n😀")
            .tags([Tag::hashtag("rust")])
            .sign_with_keys(&keys)
            .unwrap();

        let event = NostrEvent::from_event(&signed);
        assert_eq!(id_for(&event), signed.id.to_hex());
        assert!(verify_id(&event).is_ok());

        let obj = to_as1(&event, &DecodeContext::verifying()).unwrap();
        assert_eq!(obj.content.as_deref(), Some("say \"hi\"\n😀"));
    }

    #[test]
    fn test_control_characters_hash_like_sdk() {
        let keys = Keys::generate();
        let signed = EventBuilder::text_note("bell\u{07} unit\u{1f}\u{08}")
            .sign_with_keys(&keys)
            .unwrap();
        assert_eq!(id_for(&NostrEvent::from_event(&signed)), signed.id.to_hex());
    }

    #[test]
    fn test_encoded_event_signs_with_same_id() {
        let keys = Keys::generate();
        let mut event = from_as1(
            &as1(json!({
                "objectType": "note",
                "content": "signed elsewhere",
                "published": NOW_ISO,
            })),
            &EncodeContext::default(),
        )
        .unwrap();

        let signed = event
            .to_event_builder()
            .unwrap()
            .sign_with_keys(&keys)
            .unwrap();
        assert!(signed.verify().is_ok());

        event.pubkey = keys.public_key().to_hex();
        assert_eq!(id_for(&event), signed.id.to_hex());
    }
}
