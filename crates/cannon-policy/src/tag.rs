//! Tag classification.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Semantic kind of an image tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// `sha-<12 lowercase hex>`, built from a commit.
    Sha,
    /// `v<major>.<minor>.<patch>`, a release.
    Semver,
    /// Anything else.
    Invalid,
}

impl TagKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::Sha => "sha",
            TagKind::Semver => "semver",
            TagKind::Invalid => "invalid",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub kind: TagKind,
    /// The 12 hex characters of a `sha` tag; `None` for every other kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

fn sha_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Literal pattern; compilation cannot fail.
    PATTERN.get_or_init(|| Regex::new(r"^sha-([0-9a-f]{12})$").unwrap())
}

fn semver_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^v[0-9]+\.[0-9]+\.[0-9]+$").unwrap())
}

/// Classify an image tag.
///
/// Never fails: an unrecognised tag is reported as [`TagKind::Invalid`] so
/// the caller can phrase the rejection for its own context.
pub fn classify(tag: &str) -> Classification {
    if let Some(caps) = sha_pattern().captures(tag) {
        return Classification {
            kind: TagKind::Sha,
            sha: caps.get(1).map(|m| m.as_str().to_string()),
        };
    }

    if semver_pattern().is_match(tag) {
        return Classification {
            kind: TagKind::Semver,
            sha: None,
        };
    }

    Classification {
        kind: TagKind::Invalid,
        sha: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha_tag_extracts_hex() {
        let c = classify("sha-0123456789ab");
        assert_eq!(c.kind, TagKind::Sha);
        assert_eq!(c.sha.as_deref(), Some("0123456789ab"));
    }

    #[test]
    fn test_semver_tags() {
        for tag in ["v0.0.0", "v1.2.3", "v10.20.30", "v007.1.2"] {
            let c = classify(tag);
            assert_eq!(c.kind, TagKind::Semver, "{tag}");
            assert_eq!(c.sha, None);
        }
    }

    #[test]
    fn test_invalid_tags() {
        let cases = [
            "",
            "latest",
            "sha-0123456789AB",   // uppercase hex
            "sha-0123456789a",    // 11 chars
            "sha-0123456789abc",  // 13 chars
            "sha-0123456789ag",   // non-hex
            "SHA-0123456789ab",
            " sha-0123456789ab",
            "sha-0123456789ab\n",
            "1.2.3",              // missing v
            "V1.2.3",
            "v1.2",
            "v1.2.3.4",
            "v1.2.3-rc1",
            "v1.2.3+build",
            "v-1.2.3",
            "v١.٢.٣",             // non-ASCII digits
        ];
        for tag in cases {
            let c = classify(tag);
            assert_eq!(c.kind, TagKind::Invalid, "{tag:?}");
            assert_eq!(c.sha, None, "{tag:?}");
        }
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&TagKind::Semver).unwrap();
        assert_eq!(json, "\"semver\"");
        assert_eq!(TagKind::Sha.to_string(), "sha");
    }
}
