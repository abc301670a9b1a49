//! Error type for a cannon run.
//!
//! Every variant is fatal. Errors propagate to `main`, which prints one
//! `ERROR:` line and exits with [`CannonError::exit_code`].

use cannon_policy::PolicyViolation;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CannonError {
    /// Tag kind not permitted for the environment, or unknown environment.
    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error("values file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not readable YAML.
    #[error("values file is not valid YAML: {0}")]
    Parse(String),

    /// Root or a required field has the wrong structural type.
    #[error("{0}")]
    Shape(String),

    /// A required field or env entry is absent.
    #[error("{0}")]
    RequiredKeyMissing(String),

    /// The field exists but is laid out in a way that cannot be edited in place.
    #[error("cannot edit in place: {0}")]
    UnsupportedLayout(String),

    /// The edited text does not read back as the intended document.
    #[error("edit verification failed: {0}")]
    Verification(String),

    #[error("failed to serialize report: {0}")]
    Serialize(String),
}

/// Stable machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    PolicyViolation,
    MissingFile,
    Io,
    Parse,
    Shape,
    RequiredKeyMissing,
    UnsupportedLayout,
    Verification,
    Serialize,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PolicyViolation => write!(f, "POLICY_VIOLATION"),
            Self::MissingFile => write!(f, "MISSING_FILE"),
            Self::Io => write!(f, "IO_ERROR"),
            Self::Parse => write!(f, "PARSE_ERROR"),
            Self::Shape => write!(f, "SHAPE_ERROR"),
            Self::RequiredKeyMissing => write!(f, "REQUIRED_KEY_MISSING"),
            Self::UnsupportedLayout => write!(f, "UNSUPPORTED_LAYOUT"),
            Self::Verification => write!(f, "VERIFICATION_FAILED"),
            Self::Serialize => write!(f, "SERIALIZE_ERROR"),
        }
    }
}

impl CannonError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Policy(_) => ErrorKind::PolicyViolation,
            Self::MissingFile(_) => ErrorKind::MissingFile,
            Self::Io { .. } => ErrorKind::Io,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Shape(_) => ErrorKind::Shape,
            Self::RequiredKeyMissing(_) => ErrorKind::RequiredKeyMissing,
            Self::UnsupportedLayout(_) => ErrorKind::UnsupportedLayout,
            Self::Verification(_) => ErrorKind::Verification,
            Self::Serialize(_) => ErrorKind::Serialize,
        }
    }

    /// Process exit status for this error. Every failure is a hard stop.
    pub fn exit_code(&self) -> i32 {
        2
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_message_passes_through() {
        let err: CannonError = PolicyViolation::UnknownEnvironment("qa".into()).into();
        assert_eq!(err.kind(), ErrorKind::PolicyViolation);
        assert_eq!(
            err.to_string(),
            "environment must be one of: dev, staging, prod (got 'qa')"
        );
    }

    #[test]
    fn test_every_error_exits_two() {
        let errors = [
            CannonError::MissingFile(PathBuf::from("values.yaml")),
            CannonError::Shape("Expected 'env' to be a list".into()),
            CannonError::RequiredKeyMissing("Required env var 'GIT_SHA' not found".into()),
            CannonError::Verification("image.tag".into()),
        ];
        for err in errors {
            assert_eq!(err.exit_code(), 2, "{err}");
        }
    }

    #[test]
    fn test_kind_codes() {
        assert_eq!(
            CannonError::MissingFile(PathBuf::from("x")).kind().to_string(),
            "MISSING_FILE"
        );
        assert_eq!(ErrorKind::RequiredKeyMissing.to_string(), "REQUIRED_KEY_MISSING");
    }
}
