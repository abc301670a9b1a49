//! Shape-checked access to the two fields cannon edits.
//!
//! `image` is a mapping that may be created when missing. `env` is a list
//! of `{name, value, ...}` entries that must already exist; nothing here
//! ever adds an entry or a key to one.

use crate::document::{Document, Mapping, Node, Segment};
use crate::error::CannonError;

pub const IMAGE_FIELD: &str = "image";
pub const ENV_FIELD: &str = "env";

/// One element of the env list, as read before any edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    /// Position in the list.
    pub index: usize,
    /// `name` as text; `None` when it is null or not a scalar.
    pub name: Option<String>,
    /// `value` as text; `None` when it is null or not a scalar.
    pub value: Option<String>,
}

/// A validated env list.
#[derive(Debug, Clone)]
pub struct EnvList {
    field: String,
    entries: Vec<EnvEntry>,
}

impl EnvList {
    pub fn entries(&self) -> &[EnvEntry] {
        &self.entries
    }

    /// Path of `entry`'s `value` key within the document.
    pub fn value_path<'a>(&'a self, entry: &EnvEntry) -> [Segment<'a>; 3] {
        [
            Segment::Key(&self.field),
            Segment::Index(entry.index),
            Segment::Key("value"),
        ]
    }
}

/// Return the mapping at root field `key`, creating an empty one if the
/// field is absent or null.
pub fn ensure_mapping_field<'d>(doc: &'d mut Document, key: &str) -> Result<&'d Mapping, CannonError> {
    doc.ensure_root_mapping(key)
}

/// Return the list at root field `key` after checking every element.
///
/// The field must exist and be a list; each element must be a mapping
/// with both `name` and `value` keys. All elements are checked before
/// anything is returned, so a caller never edits a partially valid list.
pub fn require_list_field(doc: &Document, key: &str) -> Result<EnvList, CannonError> {
    let node = match doc.root().get(key) {
        None => {
            return Err(CannonError::RequiredKeyMissing(format!(
                "Required field '{}' not found in values file; refusing to add new keys",
                key
            )))
        }
        Some(node) => node,
    };

    let seq = match node {
        Node::Sequence(seq) => seq,
        other => {
            return Err(CannonError::Shape(format!(
                "Expected '{}' to be a list in values file, found a {}",
                key,
                other.shape()
            )))
        }
    };

    let mut entries = Vec::with_capacity(seq.len());
    for (index, item) in seq.items().iter().enumerate() {
        let Node::Mapping(map) = item else {
            return Err(CannonError::Shape(format!(
                "Expected {}[{}] to be a mapping, found a {}",
                key,
                index,
                item.shape()
            )));
        };
        let Some(name) = map.get("name") else {
            return Err(CannonError::RequiredKeyMissing(format!(
                "Expected {}[{}] to have a 'name' key",
                key, index
            )));
        };
        let Some(value) = map.get("value") else {
            return Err(CannonError::RequiredKeyMissing(format!(
                "Expected {}[{}] ({}) to have a 'value' key; refusing to modify",
                key,
                index,
                name.stringify().unwrap_or_default()
            )));
        };
        entries.push(EnvEntry {
            index,
            name: name.stringify(),
            value: value.stringify(),
        });
    }

    Ok(EnvList {
        field: key.to_string(),
        entries,
    })
}

/// First entry, in list order, whose `name` reads as `name`.
pub fn find_entry<'a>(entries: &'a EnvList, name: &str) -> Option<&'a EnvEntry> {
    entries
        .entries
        .iter()
        .find(|e| e.name.as_deref() == Some(name))
}
