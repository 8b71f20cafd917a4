//! DID-web, AT-URI and blob identifiers.

use as1_core::{Error, Result};
use serde_json::Value;
use url::Url;

use crate::lexicon::FEED_GENERATOR;

/// Web origin of the Bluesky app.
pub const BSKY_APP: &str = "https://bsky.app";

const DID_WEB_PREFIX: &str = "did:web:";
const AT_URI_PREFIX: &str = "at://";
const POST_COLLECTION: &str = "app.bsky.feed.post";

/// `did:web` identifier for an `https://host[:port]/` origin.
///
/// The host is lowercased and a non-default port is appended as
/// `:<port>`. URLs with a path, query or fragment are rejected.
pub fn url_to_did_web(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|err| Error::invalid_id(url, err.to_string()))?;
    if parsed.scheme() != "https" {
        return Err(Error::invalid_id(url, "expected an https URL"));
    }
    if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(Error::invalid_id(url, "expected a bare origin"));
    }
    let host = parsed
        .host_str()
        .ok_or_else(|| Error::invalid_id(url, "missing host"))?;

    Ok(match parsed.port() {
        Some(port) => format!("{DID_WEB_PREFIX}{host}:{port}"),
        None => format!("{DID_WEB_PREFIX}{host}"),
    })
}

/// `https://` origin for a `did:web` identifier.
pub fn did_web_to_url(did: &str) -> Result<String> {
    let rest = did
        .strip_prefix(DID_WEB_PREFIX)
        .ok_or_else(|| Error::invalid_id(did, "not a did:web"))?;

    let mut parts = rest.split(':');
    let host = parts.next().unwrap_or_default();
    let port = parts.next();
    if host.is_empty() || parts.next().is_some() {
        return Err(Error::invalid_id(did, "expected did:web:<host>[:<port>]"));
    }

    let origin = match port {
        Some(port) => {
            let port: u16 = port
                .parse()
                .map_err(|_| Error::invalid_id(did, "embedded path segment"))?;
            format!("https://{host}:{port}/")
        }
        None => format!("https://{host}/"),
    };

    let parsed = Url::parse(&origin).map_err(|err| Error::invalid_id(did, err.to_string()))?;
    if parsed.path() != "/" || parsed.host_str() != Some(host) {
        return Err(Error::invalid_id(did, "invalid host"));
    }
    Ok(origin)
}

/// `https://bsky.app/profile/<handle>`. A leading `@` is dropped.
pub fn profile_url(handle: &str) -> String {
    format!("{BSKY_APP}/profile/{}", handle.trim_start_matches('@'))
}

/// `https://bsky.app/profile/<handle>/post/<rkey>`.
pub fn post_url(handle: &str, rkey: &str) -> String {
    format!("{}/post/{rkey}", profile_url(handle))
}

/// Split an AT-URI into its actor and optional `(collection, rkey)`.
pub fn parse_at_uri(uri: &str) -> Result<(&str, Option<(&str, &str)>)> {
    let rest = uri
        .strip_prefix(AT_URI_PREFIX)
        .ok_or_else(|| Error::invalid_id(uri, "not an at:// URI"))?;
    let segments: Vec<&str> = rest.split('/').collect();
    match segments.as_slice() {
        [actor] if !actor.is_empty() => Ok((*actor, None)),
        [actor, collection, rkey]
            if !actor.is_empty() && !collection.is_empty() && !rkey.is_empty() =>
        {
            Ok((*actor, Some((*collection, *rkey))))
        }
        _ => Err(Error::invalid_id(uri, "expected at://<did>[/<collection>/<rkey>]")),
    }
}

/// Web URL for an AT-URI. Empty input yields `None`.
///
/// The handle, when known, replaces the DID in the URL.
pub fn at_uri_to_web_url(uri: &str, handle: Option<&str>) -> Result<Option<String>> {
    if uri.is_empty() {
        return Ok(None);
    }

    let (actor, record) = parse_at_uri(uri)?;
    let actor = handle.filter(|h| !h.is_empty()).unwrap_or(actor);
    Ok(Some(match record {
        None => profile_url(actor),
        Some((FEED_GENERATOR, rkey)) => format!("{}/feed/{rkey}", profile_url(actor)),
        Some((_, rkey)) => post_url(actor, rkey),
    }))
}

/// AT-URI for a `bsky.app` profile, post or feed URL. Empty input yields
/// `None`.
pub fn web_url_to_at_uri(url: &str) -> Result<Option<String>> {
    if url.is_empty() {
        return Ok(None);
    }

    let parsed = Url::parse(url).map_err(|err| Error::invalid_id(url, err.to_string()))?;
    if !matches!(parsed.scheme(), "https" | "http") || parsed.host_str() != Some("bsky.app") {
        return Err(Error::invalid_id(url, "not a bsky.app URL"));
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    match segments.as_slice() {
        ["profile", id] => Ok(Some(format!("{AT_URI_PREFIX}{id}"))),
        ["profile", id, "post", rkey] => Ok(Some(format!(
            "{AT_URI_PREFIX}{id}/{POST_COLLECTION}/{rkey}"
        ))),
        ["profile", id, "feed", rkey] => Ok(Some(format!(
            "{AT_URI_PREFIX}{id}/{FEED_GENERATOR}/{rkey}"
        ))),
        _ => Err(Error::invalid_id(url, "unrecognized bsky.app path")),
    }
}

/// Fetch URL for a blob reference.
///
/// Accepts the current form (`{"ref": {"$link": cid}, ...}`) and the legacy
/// form (`{"cid": cid, ...}`). Returns `None` for any other shape, or when
/// the repository DID or PDS is unknown. A PDS without a scheme is assumed
/// to be `https://`.
pub fn blob_ref_to_url(blob: &Value, repo_did: Option<&str>, pds: Option<&str>) -> Option<String> {
    let cid = blob
        .pointer("/ref/$link")
        .or_else(|| blob.get("cid"))
        .and_then(Value::as_str)
        .filter(|cid| !cid.is_empty())?;
    let did = repo_did.filter(|did| !did.is_empty())?;
    let pds = pds.filter(|pds| !pds.is_empty())?.trim_end_matches('/');

    let base = if pds.contains("://") {
        pds.to_string()
    } else {
        format!("https://{pds}")
    };
    Some(format!(
        "{base}/xrpc/com.atproto.sync.getBlob?did={did}&cid={cid}"
    ))
}

/// Host of a URL, lowercased, if it parses.
pub(crate) fn url_host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
}
