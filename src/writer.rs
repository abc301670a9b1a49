//! Conditional write-back.
//!
//! The file is only rewritten when the updater reported a change *and*
//! the rendered text differs from what was read.

use crate::document::Document;
use crate::error::CannonError;
use crate::updater::UpdateSummary;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOutcome {
    Written,
    /// The updater found every field already at its target value.
    SkippedNoChange,
    /// Fields changed logically but the rendered text is identical.
    SkippedIdentical,
    /// The text would change, but writing was not requested.
    DryRun,
}

impl WriteOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOutcome::Written => "written",
            WriteOutcome::SkippedNoChange => "skipped_no_change",
            WriteOutcome::SkippedIdentical => "skipped_identical",
            WriteOutcome::DryRun => "dry_run",
        }
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Apply,
    DryRun,
}

#[derive(Debug, Clone)]
pub struct WriteResult {
    pub outcome: WriteOutcome,
    /// Contents of the file after this step (or that it would have, for a
    /// dry run).
    pub contents: String,
}

/// Write `doc` to `path` if, and only if, that changes the file.
pub fn write(
    doc: &Document,
    summary: &UpdateSummary,
    path: &Path,
    original: &str,
    mode: WriteMode,
) -> Result<WriteResult, CannonError> {
    if !summary.changed {
        debug!(path = %path.display(), "no field changed");
        return Ok(WriteResult {
            outcome: WriteOutcome::SkippedNoChange,
            contents: original.to_string(),
        });
    }

    let rendered = doc.render()?;
    doc.verify(&rendered)?;

    if rendered == original {
        debug!(path = %path.display(), "rendered text identical to original");
        return Ok(WriteResult {
            outcome: WriteOutcome::SkippedIdentical,
            contents: rendered,
        });
    }

    if mode == WriteMode::DryRun {
        return Ok(WriteResult {
            outcome: WriteOutcome::DryRun,
            contents: rendered,
        });
    }

    write_atomic(path, &rendered)?;
    info!(path = %path.display(), bytes = rendered.len(), "values file written");
    Ok(WriteResult {
        outcome: WriteOutcome::Written,
        contents: rendered,
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "values".to_string());
    path.with_file_name(format!(".{}.cannon.tmp", name))
}

/// Write-then-rename, keeping the original file's permissions.
fn write_atomic(path: &Path, contents: &str) -> Result<(), CannonError> {
    let temp = temp_path(path);
    let permissions = fs::metadata(path)
        .map_err(|e| CannonError::io(path, e))?
        .permissions();

    fs::write(&temp, contents).map_err(|e| CannonError::io(&temp, e))?;
    let finish = fs::set_permissions(&temp, permissions).and_then(|_| fs::rename(&temp, path));
    if let Err(e) = finish {
        let _ = fs::remove_file(&temp);
        return Err(CannonError::io(path, e));
    }
    Ok(())
}
