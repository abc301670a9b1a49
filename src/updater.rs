//! Field updater.
//!
//! Applies a validated tag to a loaded document:
//!
//! - `image.tag` becomes the full tag.
//! - sha tags: `GIT_SHA` becomes the 12 hex characters and `APP_VERSION`
//!   becomes `unversioned`.
//! - semver tags: `APP_VERSION` becomes the tag and `GIT_SHA` is cleared.
//!
//! `APP_ENV`, `GIT_SHA` and `APP_VERSION` must already be in `env`; they
//! are all looked up before the first env value is touched.

use crate::accessor::{self, EnvEntry, EnvList, ENV_FIELD, IMAGE_FIELD};
use crate::document::{Document, Node, Segment};
use crate::error::CannonError;
use cannon_policy::{TagKind, ValidatedTag};
use serde::Serialize;
use tracing::debug;

pub const APP_ENV: &str = "APP_ENV";
pub const GIT_SHA: &str = "GIT_SHA";
pub const APP_VERSION: &str = "APP_VERSION";

/// `APP_VERSION` for builds that are not releases.
pub const UNVERSIONED: &str = "unversioned";

const TAG_KEY: &str = "tag";

/// One field whose value actually changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    /// `image.tag` or `env.<NAME>`.
    pub field: String,
    /// Previous value; `None` if it was null or absent.
    pub old: Option<String>,
    pub new: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSummary {
    pub changed: bool,
    pub changes: Vec<FieldChange>,
}

impl UpdateSummary {
    fn record(&mut self, changed: bool, field: String, old: Option<String>, new: &str) {
        if !changed {
            return;
        }
        debug!(field = %field, old = ?old, new = %new, "field updated");
        self.changed = true;
        self.changes.push(FieldChange {
            field,
            old,
            new: new.to_string(),
        });
    }
}

fn require_entry<'a>(list: &'a EnvList, name: &str, detail: &str) -> Result<&'a EnvEntry, CannonError> {
    accessor::find_entry(list, name).ok_or_else(|| {
        CannonError::RequiredKeyMissing(format!(
            "Required env var '{}' not found in values file; {}",
            name, detail
        ))
    })
}

fn set_env(
    doc: &mut Document,
    list: &EnvList,
    entry: &EnvEntry,
    value: &str,
    summary: &mut UpdateSummary,
) -> Result<(), CannonError> {
    let changed = doc.set_scalar(&list.value_path(entry), value)?;
    let name = entry.name.as_deref().unwrap_or_default();
    summary.record(changed, format!("{}.{}", ENV_FIELD, name), entry.value.clone(), value);
    Ok(())
}

/// Apply `tag` to `doc`. Returns which fields changed.
pub fn apply(doc: &mut Document, tag: &ValidatedTag) -> Result<UpdateSummary, CannonError> {
    let mut summary = UpdateSummary::default();

    let image = accessor::ensure_mapping_field(doc, IMAGE_FIELD)?;
    let current_tag = image.get(TAG_KEY).and_then(Node::stringify);
    // An absent tag compares as the empty string.
    if current_tag.as_deref().unwrap_or_default() != tag.tag() {
        let changed = doc.set_scalar(&[Segment::Key(IMAGE_FIELD), Segment::Key(TAG_KEY)], tag.tag())?;
        summary.record(changed, format!("{}.{}", IMAGE_FIELD, TAG_KEY), current_tag, tag.tag());
    }

    let env = accessor::require_list_field(doc, ENV_FIELD)?;

    require_entry(&env, APP_ENV, "refusing to proceed")?;

    match (tag.kind(), tag.sha()) {
        (TagKind::Sha, Some(sha)) => {
            let git_sha = require_entry(&env, GIT_SHA, "refusing to add new keys")?;
            let app_version = require_entry(&env, APP_VERSION, "refusing to proceed")?;

            set_env(doc, &env, git_sha, sha, &mut summary)?;
            if app_version.value.as_deref() != Some(UNVERSIONED) {
                set_env(doc, &env, app_version, UNVERSIONED, &mut summary)?;
            }
        }
        (TagKind::Semver, _) => {
            let app_version = require_entry(&env, APP_VERSION, "refusing to add new keys")?;
            let git_sha = require_entry(&env, GIT_SHA, "refusing to add new keys")?;

            set_env(doc, &env, app_version, tag.tag(), &mut summary)?;
            set_env(doc, &env, git_sha, "", &mut summary)?;
        }
        (kind, _) => {
            return Err(CannonError::Shape(format!(
                "tag '{}' of kind {} cannot be applied",
                tag.tag(),
                kind
            )))
        }
    }

    debug!(changed = summary.changed, count = summary.changes.len(), "fields applied");
    Ok(summary)
}
