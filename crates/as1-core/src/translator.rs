//! The seam each platform translator implements.

use serde_json::Value;

use crate::{As1Object, Result};

/// A bidirectional translator between AS1 and one platform's wire format.
///
/// Implementations are stateless: every call is a pure function of its
/// arguments, so a single instance can be shared across threads.
pub trait Translator: Send + Sync {
    /// Context threaded through every encode call.
    type EncodeContext;
    /// Context threaded through every decode call.
    type DecodeContext;

    /// Short platform name, used in logs.
    fn name(&self) -> &'static str;

    /// Encode an AS1 object as a wire document ready for transmission.
    fn encode(&self, obj: &As1Object, ctx: &Self::EncodeContext) -> Result<Value>;

    /// Decode a wire document into AS1.
    ///
    /// Returns `None` for wire shapes that explicitly mark a blocked or
    /// unresolvable reference.
    fn decode(&self, wire: &Value, ctx: &Self::DecodeContext) -> Result<Option<As1Object>>;
}
