//! Shared fixtures for values-file tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The values file used by the end-to-end scenarios.
pub const VALUES: &str = r#"# Helm values for the api service.
replicaCount: 2

image:
  repository: ghcr.io/acme/api   # pushed by CI
  pullPolicy: IfNotPresent
  tag: old

env:
  - name: APP_ENV
    value: dev
  - name: GIT_SHA
    value: "aaa"             # filled by cannon
  - name: APP_VERSION
    value: 'v0.0.1'
  - name: LOG_LEVEL
    value: info

resources: {}
"#;

/// A values file in a temporary directory.
pub struct ValuesFile {
    _dir: TempDir,
    pub path: PathBuf,
}

impl ValuesFile {
    pub fn new(contents: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("values.yaml");
        fs::write(&path, contents).unwrap();
        Self { _dir: dir, path }
    }

    pub fn read(&self) -> String {
        fs::read_to_string(&self.path).unwrap()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `VALUES` with one env entry (name and value lines) removed.
pub fn values_without(name: &str) -> String {
    let mut out = String::new();
    let mut skip = false;
    for line in VALUES.lines() {
        if line.trim_start().starts_with("- name: ") {
            skip = line.trim_start() == format!("- name: {}", name);
        } else if !line.starts_with("    ") {
            skip = false;
        }
        if !skip {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
