//! Policy error type.

use thiserror::Error;

/// Reasons a tag is refused for an environment.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    /// dev accepts either tag kind, but this tag is neither.
    #[error("dev allows only sha-<12hex> or vX.Y.Z (got '{tag}')")]
    DevTag { tag: String },

    /// staging and prod accept release tags only.
    #[error("{environment} allows only semver vX.Y.Z (got '{tag}')")]
    ReleaseOnly { environment: String, tag: String },

    #[error("environment must be one of: dev, staging, prod (got '{0}')")]
    UnknownEnvironment(String),
}
