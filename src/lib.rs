//! cannon - guarded image tag updates for Helm values files
//!
//! Given an environment, an image tag and a values file, cannon checks the
//! tag against the environment's policy and then rewrites `image.tag` and
//! the `GIT_SHA` / `APP_VERSION` env entries in place. Everything else in
//! the file, comments and quoting included, is left byte-for-byte as it was,
//! and the file is not rewritten at all when nothing changes.

pub mod accessor;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod updater;
pub mod writer;

pub use cannon_policy::{classify, validate, Environment, PolicyViolation, TagKind, ValidatedTag};
pub use document::Document;
pub use error::{CannonError, ErrorKind};
pub use pipeline::{run, RunOptions};
pub use report::RunReport;
pub use updater::{FieldChange, UpdateSummary};
pub use writer::{WriteMode, WriteOutcome};
