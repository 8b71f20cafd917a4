use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use as1_core::{As1Object, Translator};
use bluesky_as1::Bluesky;
use clap::{Parser, ValueEnum};
use nostr_as1::Nostr;
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Platform {
    Bluesky,
    Nostr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Direction {
    /// Wire document in, AS1 out
    #[value(name = "to-as1")]
    ToAs1,
    /// AS1 in, wire document out
    #[value(name = "from-as1")]
    FromAs1,
}

#[derive(Debug, Parser)]
#[command(name = "as1-translate")]
#[command(about = "Translate one JSON document between AS1 and Bluesky or Nostr")]
struct Args {
    platform: Platform,

    direction: Direction,

    /// Input JSON file (stdin when absent)
    file: Option<PathBuf>,

    /// Repository DID for Bluesky records. Falls back to AS1_REPO_DID env.
    #[arg(long)]
    repo_did: Option<String>,

    /// Repository handle for Bluesky records. Falls back to AS1_REPO_HANDLE env.
    #[arg(long)]
    repo_handle: Option<String>,

    /// PDS for Bluesky blob URLs. Falls back to AS1_PDS env.
    #[arg(long)]
    pds: Option<String>,

    /// Bluesky `$type` for documents that lack one
    #[arg(long = "type")]
    type_override: Option<String>,

    /// URL the AS1 object was fetched from
    #[arg(long)]
    from_url: Option<String>,

    /// Relay written into Nostr `e` and `p` tags. Falls back to AS1_RELAY_HINT env.
    #[arg(long)]
    relay_hint: Option<String>,

    /// Reject Nostr events whose id doesn't match their contents.
    /// Also enabled by AS1_VERIFY_IDS=true.
    #[arg(long)]
    verify_ids: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let input: Value = serde_json::from_str(&read_input(args.file.as_deref())?)?;
    let output = translate(&args, &input)?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn read_input(file: Option<&Path>) -> io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn translate(args: &Args, input: &Value) -> as1_core::Result<Value> {
    match args.platform {
        Platform::Bluesky => {
            let (encode_ctx, decode_ctx) = bluesky_contexts(args);
            run(&Bluesky, args.direction, input, &encode_ctx, &decode_ctx)
        }
        Platform::Nostr => {
            let (encode_ctx, decode_ctx) = nostr_contexts(args);
            run(&Nostr, args.direction, input, &encode_ctx, &decode_ctx)
        }
    }
}

fn run<T: Translator>(
    translator: &T,
    direction: Direction,
    input: &Value,
    encode_ctx: &T::EncodeContext,
    decode_ctx: &T::DecodeContext,
) -> as1_core::Result<Value> {
    debug!(translator = translator.name(), ?direction, "Translating");
    match direction {
        Direction::ToAs1 => match translator.decode(input, decode_ctx)? {
            Some(obj) => Ok(serde_json::to_value(obj)?),
            None => Ok(Value::Null),
        },
        Direction::FromAs1 => {
            let obj: As1Object = serde_json::from_value(input.clone())?;
            translator.encode(&obj, encode_ctx)
        }
    }
}

fn bluesky_contexts(args: &Args) -> (bluesky_as1::EncodeContext, bluesky_as1::DecodeContext) {
    let mut encode_ctx = bluesky_as1::EncodeContext::default();
    if let Some(from_url) = &args.from_url {
        encode_ctx = encode_ctx.with_from_url(from_url.as_str());
    }

    let mut decode_ctx = bluesky_as1::DecodeContext::default();
    if let Some(did) = flag_or_env(&args.repo_did, "AS1_REPO_DID") {
        decode_ctx = decode_ctx.with_repo_did(did);
    }
    if let Some(handle) = flag_or_env(&args.repo_handle, "AS1_REPO_HANDLE") {
        decode_ctx = decode_ctx.with_repo_handle(handle);
    }
    if let Some(pds) = flag_or_env(&args.pds, "AS1_PDS") {
        decode_ctx = decode_ctx.with_pds(Some(pds));
    }
    if let Some(type_override) = &args.type_override {
        decode_ctx = decode_ctx.with_type(type_override.as_str());
    }

    (encode_ctx, decode_ctx)
}

fn nostr_contexts(args: &Args) -> (nostr_as1::EncodeContext, nostr_as1::DecodeContext) {
    let mut encode_ctx = nostr_as1::EncodeContext::default();
    if let Some(relay) = flag_or_env(&args.relay_hint, "AS1_RELAY_HINT") {
        encode_ctx = encode_ctx.with_relay_hint(relay);
    }

    let verify = args.verify_ids || env::var("AS1_VERIFY_IDS").is_ok_and(|val| is_truthy(&val));
    let decode_ctx = if verify {
        nostr_as1::DecodeContext::verifying()
    } else {
        nostr_as1::DecodeContext::default()
    };

    (encode_ctx, decode_ctx)
}

fn flag_or_env(flag: &Option<String>, key: &str) -> Option<String> {
    flag.clone()
        .or_else(|| env::var(key).ok())
        .filter(|value| !value.is_empty())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "1" | "true" | "yes")
}
