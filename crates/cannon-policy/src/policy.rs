//! Per-environment tag policy.
//!
//! | environment | sha | semver |
//! |-------------|-----|--------|
//! | dev         | yes | yes    |
//! | staging     | no  | yes    |
//! | prod        | no  | yes    |

use crate::error::PolicyViolation;
use crate::tag::{classify, TagKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Staging, Environment::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }

    /// Whether a tag of `kind` may be deployed here.
    pub fn allows(&self, kind: TagKind) -> bool {
        match self {
            Environment::Dev => matches!(kind, TagKind::Sha | TagKind::Semver),
            Environment::Staging | Environment::Prod => kind == TagKind::Semver,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = PolicyViolation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|env| env.as_str() == s)
            .ok_or_else(|| PolicyViolation::UnknownEnvironment(s.to_string()))
    }
}

/// A tag that passed policy for its environment.
///
/// Only produced by [`validate`] / [`validate_for`], so `kind` is never
/// [`TagKind::Invalid`] and `sha` is set exactly when `kind` is `Sha`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedTag {
    environment: Environment,
    tag: String,
    kind: TagKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

impl ValidatedTag {
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// The full tag as given, e.g. `v1.2.3` or `sha-0123456789ab`.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn kind(&self) -> TagKind {
        self.kind
    }

    /// The 12 hex characters of a sha tag.
    pub fn sha(&self) -> Option<&str> {
        self.sha.as_deref()
    }
}

/// Validate a tag against a typed environment.
pub fn validate_for(environment: Environment, tag: &str) -> Result<ValidatedTag, PolicyViolation> {
    let classification = classify(tag);

    if !environment.allows(classification.kind) {
        return Err(match environment {
            Environment::Dev => PolicyViolation::DevTag {
                tag: tag.to_string(),
            },
            Environment::Staging | Environment::Prod => PolicyViolation::ReleaseOnly {
                environment: environment.to_string(),
                tag: tag.to_string(),
            },
        });
    }

    Ok(ValidatedTag {
        environment,
        tag: tag.to_string(),
        kind: classification.kind,
        sha: classification.sha,
    })
}

/// Validate a tag against an environment given by name.
///
/// The name is checked even though the CLI already restricts it.
pub fn validate(environment: &str, tag: &str) -> Result<ValidatedTag, PolicyViolation> {
    let environment = environment.parse::<Environment>()?;
    validate_for(environment, tag)
}
