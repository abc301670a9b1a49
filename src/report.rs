//! Run report printed at the end of a run.

use crate::error::CannonError;
use crate::updater::FieldChange;
use crate::writer::WriteOutcome;
use cannon_policy::{Environment, TagKind};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 of file contents, hex encoded.
pub fn digest(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub environment: Environment,
    pub image_tag: String,
    pub tag_kind: TagKind,
    pub values_file: String,
    pub outcome: WriteOutcome,
    pub changes: Vec<FieldChange>,
    /// Digest of the file as read.
    pub digest_before: String,
    /// Digest of the file after the run (or that it would have, for a dry run).
    pub digest_after: String,
}

impl RunReport {
    pub fn to_json(&self) -> Result<String, CannonError> {
        serde_json::to_string_pretty(self).map_err(|e| CannonError::Serialize(e.to_string()))
    }

    pub fn to_human(&self) -> String {
        let mut output = match self.outcome {
            WriteOutcome::Written => format!("Updated {}", self.values_file),
            WriteOutcome::DryRun => format!("Dry run: would update {}", self.values_file),
            WriteOutcome::SkippedNoChange | WriteOutcome::SkippedIdentical => {
                format!("No changes needed for {}", self.values_file)
            }
        };
        if matches!(self.outcome, WriteOutcome::Written | WriteOutcome::DryRun) {
            for change in &self.changes {
                output.push_str(&format!(
                    "\n  {}: {} -> {}",
                    change.field,
                    show(change.old.as_deref()),
                    show(Some(change.new.as_str()))
                ));
            }
        }
        output
    }
}

fn show(value: Option<&str>) -> String {
    match value {
        None => "(unset)".to_string(),
        Some("") => "\"\"".to_string(),
        Some(v) => v.to_string(),
    }
}
