//! Core types for the AS1 translation engine.
//!
//! Every platform translator in this workspace normalizes through the neutral
//! AS1 activity model defined here. This crate provides:
//!
//! - [`As1Object`] / [`As1Ref`] - The AS1 object and its "id or object" links
//! - [`As1Kind`] - The closed set of `(objectType, verb)` combinations the
//!   translators dispatch on
//! - [`Error`] - Error kinds shared by every translation call
//! - [`Prune`] - The recursive pass that drops empty fields before an object
//!   is handed back to the caller
//! - [`Translator`] - The seam each platform crate implements
//!
//! # Example
//!
//! ```rust
//! use as1_core::{As1Kind, As1Object};
//!
//! let note = As1Object {
//!     object_type: Some("note".to_string()),
//!     content: Some("hello".to_string()),
//!     ..Default::default()
//! };
//! assert_eq!(note.kind().unwrap(), As1Kind::Note);
//! ```

mod error;
mod kind;
mod object;
mod prune;
pub mod time;
mod translator;

pub use error::{Error, Result};
pub use kind::As1Kind;
pub use object::{As1Object, As1Ref};
pub use prune::{prune_string, Prune};
pub use translator::Translator;

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
