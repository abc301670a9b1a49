//! Image tag policy for cannon.
//!
//! Classifies an image tag as a commit-pinned `sha-<12hex>` tag or a
//! `vX.Y.Z` release tag, and decides whether that kind of tag may be
//! deployed to a given environment. Everything here is pure: no I/O,
//! no global state beyond the compiled patterns.

mod error;
mod policy;
mod tag;

pub use error::PolicyViolation;
pub use policy::{validate, validate_for, Environment, ValidatedTag};
pub use tag::{classify, Classification, TagKind};
