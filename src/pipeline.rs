//! One cannon run: policy, load, update, write.
//!
//! Every check happens before the writer runs, so a failing run never
//! touches the file.

use crate::document::Document;
use crate::error::CannonError;
use crate::report::{digest, RunReport};
use crate::updater;
use crate::writer::{self, WriteMode};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// Inputs for a run, as given on the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub environment: String,
    pub image_tag: String,
    pub values_file: PathBuf,
    pub dry_run: bool,
}

pub fn run(options: &RunOptions) -> Result<RunReport, CannonError> {
    let tag = cannon_policy::validate(&options.environment, &options.image_tag)?;
    info!(
        environment = %tag.environment(),
        tag = tag.tag(),
        kind = %tag.kind(),
        "image tag accepted"
    );

    let path = &options.values_file;
    if !path.exists() {
        return Err(CannonError::MissingFile(path.clone()));
    }
    let original = fs::read_to_string(path).map_err(|e| CannonError::io(path, e))?;
    let digest_before = digest(original.as_bytes());
    debug!(path = %path.display(), digest = %digest_before, "values file read");

    let mut doc = Document::parse(original.clone())?;
    let summary = updater::apply(&mut doc, &tag)?;

    let mode = if options.dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::Apply
    };
    let result = writer::write(&doc, &summary, path, &original, mode)?;
    info!(outcome = %result.outcome, changes = summary.changes.len(), "run finished");

    Ok(RunReport {
        environment: tag.environment(),
        image_tag: tag.tag().to_string(),
        tag_kind: tag.kind(),
        values_file: path.display().to_string(),
        outcome: result.outcome,
        changes: summary.changes,
        digest_before,
        digest_after: digest(result.contents.as_bytes()),
    })
}
