//! Format-preserving values document.
//!
//! The document keeps the original text and a span-annotated tree of it.
//! Edits change the tree; [`Document::render`] turns them into byte-range
//! splices over the original text, so every byte outside a touched value
//! is copied through unchanged. A `serde_yaml` reading of the source is
//! kept alongside and receives the same logical edits, which lets
//! [`Document::verify`] prove that the rendered text means exactly what
//! the edits intended.

mod node;
mod scalar;

pub use node::{Entry, Mapping, Node, Scalar, ScalarStyle, Sequence};

use crate::error::CannonError;
use node::Loader;
use serde_yaml::Value;
use std::fmt;
use yaml_rust2::parser::Parser;

/// One step of a path from the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Dotted rendering of a path, e.g. `env[1].value`.
pub struct PathDisplay<'a, 'b>(pub &'a [Segment<'b>]);

impl fmt::Display for PathDisplay<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{}", key)?,
                Segment::Key(key) => write!(f, ".{}", key)?,
                Segment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

const BOM: char = '\u{feff}';

#[derive(Debug)]
struct Splice {
    start: usize,
    end: usize,
    text: String,
}

#[derive(Debug, Clone)]
pub struct Document {
    /// Source text without any byte order mark.
    source: String,
    /// The file started with a UTF-8 byte order mark.
    bom: bool,
    root: Mapping,
    expected: Value,
}

impl Document {
    /// Parse a values file. The root must be a single mapping.
    pub fn parse(source: String) -> Result<Self, CannonError> {
        let bom = source.starts_with(BOM);
        let source = if bom {
            source[BOM.len_utf8()..].to_string()
        } else {
            source
        };

        let documents = {
            let mut loader = Loader::new(&source);
            let mut parser = Parser::new(source.chars());
            parser
                .load(&mut loader, true)
                .map_err(|e| CannonError::Parse(e.to_string()))?;
            loader.documents
        };

        let root = match documents.len() {
            1 => documents.into_iter().next(),
            0 => None,
            n => {
                return Err(CannonError::Shape(format!(
                    "values file holds {} YAML documents; expected exactly one",
                    n
                )))
            }
        };
        let root = match root {
            Some(Node::Mapping(m)) => m,
            _ => {
                return Err(CannonError::Shape(
                    "values file did not parse to a mapping; cannot proceed safely".to_string(),
                ))
            }
        };

        let expected: Value =
            serde_yaml::from_str(&source).map_err(|e| CannonError::Parse(e.to_string()))?;

        Ok(Self {
            source,
            bom,
            root,
            expected,
        })
    }

    pub fn root(&self) -> &Mapping {
        &self.root
    }

    /// Node at `path`, if every step exists.
    pub fn get(&self, path: &[Segment<'_>]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let Segment::Key(key) = first else {
            return None;
        };
        let mut node = self.root.get(key)?;
        for segment in rest {
            node = match (segment, node) {
                (Segment::Key(key), Node::Mapping(m)) => m.get(key)?,
                (Segment::Index(i), Node::Sequence(s)) => s.items.get(*i)?,
                _ => return None,
            };
        }
        Some(node)
    }

    fn get_mut(&mut self, path: &[Segment<'_>]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let Segment::Key(key) = first else {
            return None;
        };
        let mut node = &mut self.root.entry_mut(key)?.value;
        for segment in rest {
            node = match (segment, node) {
                (Segment::Key(key), Node::Mapping(m)) => &mut m.entry_mut(key)?.value,
                (Segment::Index(i), Node::Sequence(s)) => s.items.get_mut(*i)?,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Make the root field `key` a mapping, creating an empty one when the
    /// field is absent or null. Fails if it holds anything else.
    pub fn ensure_root_mapping(&mut self, key: &str) -> Result<&Mapping, CannonError> {
        match self.root.entry_mut(key) {
            None => self.root.insert(key, Node::Mapping(Mapping::default())),
            Some(entry) if entry.value.is_null() => {
                let old = std::mem::replace(&mut entry.value, Node::Mapping(Mapping::default()));
                if let Node::Scalar(null) = old {
                    entry.displaced = Some(null);
                }
            }
            Some(entry) => {
                if !matches!(entry.value, Node::Mapping(_)) {
                    return Err(CannonError::Shape(format!(
                        "Expected '{}' to be a mapping, found a {}",
                        key,
                        entry.value.shape()
                    )));
                }
            }
        }

        let created = self
            .expected
            .get(key)
            .map_or(true, |v| !v.is_mapping());
        if created {
            let root = self
                .expected
                .as_mapping_mut()
                .ok_or_else(|| CannonError::Verification("root is not a mapping".to_string()))?;
            root.insert(
                Value::String(key.to_string()),
                Value::Mapping(serde_yaml::Mapping::new()),
            );
        }

        match self.root.get(key) {
            Some(Node::Mapping(m)) => Ok(m),
            _ => Err(CannonError::Shape(format!("Expected '{}' to be a mapping", key))),
        }
    }

    /// Set the scalar at `path` to `value`.
    ///
    /// The parent must exist. A missing final key is only created inside
    /// a mapping; a present one must be a scalar. Returns whether the value
    /// changed.
    pub fn set_scalar(&mut self, path: &[Segment<'_>], value: &str) -> Result<bool, CannonError> {
        let (last, parent_path) = path
            .split_last()
            .ok_or_else(|| CannonError::Shape("empty path".to_string()))?;
        let display = PathDisplay(path).to_string();

        let changed = match (last, parent_path.is_empty()) {
            (Segment::Key(key), true) => set_in_mapping(&mut self.root, key, value, &display)?,
            (Segment::Key(key), false) => match self.get_mut(parent_path) {
                Some(Node::Mapping(m)) => set_in_mapping(m, key, value, &display)?,
                _ => {
                    return Err(CannonError::Shape(format!(
                        "Expected '{}' to be a mapping",
                        PathDisplay(parent_path)
                    )))
                }
            },
            (Segment::Index(i), _) => match self.get_mut(parent_path) {
                Some(Node::Sequence(s)) => match s.items.get_mut(*i) {
                    Some(Node::Scalar(scalar)) => scalar.set(value),
                    _ => {
                        return Err(CannonError::Shape(format!(
                            "Expected '{}' to be a scalar",
                            display
                        )))
                    }
                },
                _ => {
                    return Err(CannonError::Shape(format!(
                        "Expected '{}' to be a list",
                        PathDisplay(parent_path)
                    )))
                }
            },
        };

        if changed {
            self.mirror(path, value)?;
        }
        Ok(changed)
    }

    /// Apply the same scalar assignment to the expected value.
    fn mirror(&mut self, path: &[Segment<'_>], value: &str) -> Result<(), CannonError> {
        let lost = || CannonError::Verification(format!("'{}' has no counterpart", PathDisplay(path)));
        let (last, parent_path) = path.split_last().ok_or_else(lost)?;

        let mut parent = &mut self.expected;
        for segment in parent_path {
            parent = match segment {
                Segment::Key(key) => parent.get_mut(*key),
                Segment::Index(i) => parent.get_mut(*i),
            }
            .ok_or_else(lost)?;
        }

        match (last, parent) {
            (Segment::Key(key), Value::Mapping(m)) => {
                m.insert(Value::String(key.to_string()), Value::String(value.to_string()));
            }
            (Segment::Index(i), Value::Sequence(s)) => {
                let slot = s.get_mut(*i).ok_or_else(lost)?;
                *slot = Value::String(value.to_string());
            }
            _ => return Err(lost()),
        }
        Ok(())
    }

    /// Render the document with all edits applied.
    pub fn render(&self) -> Result<String, CannonError> {
        let mut splices = Vec::new();
        collect_mapping(&self.source, &self.root, true, &mut splices)?;
        splices.sort_by_key(|s| (s.start, s.end));

        let mut out = String::with_capacity(self.source.len() + 64);
        if self.bom {
            out.push(BOM);
        }
        let mut cursor = 0;
        for splice in &splices {
            if splice.start < cursor {
                return Err(CannonError::UnsupportedLayout(
                    "overlapping edits".to_string(),
                ));
            }
            out.push_str(&self.source[cursor..splice.start]);
            out.push_str(&splice.text);
            cursor = splice.end;
        }
        out.push_str(&self.source[cursor..]);
        Ok(out)
    }

    /// Check that `rendered` reads back as the original document with
    /// exactly the recorded edits applied.
    pub fn verify(&self, rendered: &str) -> Result<(), CannonError> {
        let reread: Value = serde_yaml::from_str(rendered)
            .map_err(|e| CannonError::Verification(format!("edited text is not valid YAML: {}", e)))?;
        if reread != self.expected {
            return Err(CannonError::Verification(
                "edited text does not read back as the intended values".to_string(),
            ));
        }
        Ok(())
    }
}

fn set_in_mapping(map: &mut Mapping, key: &str, value: &str, path: &str) -> Result<bool, CannonError> {
    match map.entry_mut(key) {
        None => {
            map.insert(key, Node::Scalar(Scalar::created(value)));
            Ok(true)
        }
        Some(entry) => match &mut entry.value {
            Node::Scalar(scalar) => Ok(scalar.set(value)),
            other => Err(CannonError::Shape(format!(
                "Expected '{}' to be a scalar, found a {}",
                path,
                other.shape()
            ))),
        },
    }
}

fn unsupported(what: impl Into<String>) -> CannonError {
    CannonError::UnsupportedLayout(what.into())
}

/// Start of the line containing `offset`.
fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Offset just past the `:` that follows the key scalar at `key`.
fn after_colon(source: &str, key: &Scalar) -> Result<usize, CannonError> {
    let start = key.offset.ok_or_else(|| unsupported("key has no position"))?;
    let end = scalar::scalar_end(source, start, key.style, key.flow)
        .ok_or_else(|| unsupported("cannot find the end of a key"))?;
    let rest = &source[end..];
    let colon = rest
        .find(|c: char| c != ' ' && c != '\t')
        .filter(|&i| rest[i..].starts_with(':'))
        .ok_or_else(|| unsupported("key is not followed by ':'"))?;
    Ok(end + colon + 1)
}

/// Splice that replaces the source text of `scalar` with `text`.
fn replace_scalar(source: &str, scalar: &Scalar, text: String) -> Result<Splice, CannonError> {
    let start = scalar.offset.ok_or_else(|| unsupported("scalar has no position"))?;
    let end = scalar::scalar_end(source, start, scalar.style, scalar.flow)
        .ok_or_else(|| unsupported("block scalars and multi-line quoted values cannot be rewritten"))?;
    if scalar.style == ScalarStyle::Plain && source[start..end] != scalar.text {
        return Err(unsupported("multi-line plain values cannot be rewritten"));
    }
    Ok(Splice { start, end, text })
}

/// Splice that puts `text` where the value of `entry` goes.
fn place_value(source: &str, entry: &Entry, current: &Scalar, text: String) -> Result<Splice, CannonError> {
    if current.offset.is_some() {
        return replace_scalar(source, current, text);
    }
    // `key:` with nothing after it.
    let key = entry
        .key
        .as_scalar()
        .ok_or_else(|| unsupported("non-scalar keys cannot be edited"))?;
    let at = after_colon(source, key)?;
    Ok(Splice {
        start: at,
        end: at,
        text: format!(" {}", text),
    })
}

fn key_text(entry: &Entry) -> Result<String, CannonError> {
    entry
        .key
        .stringify()
        .map(|k| scalar::render(&k, ScalarStyle::Plain, false))
        .ok_or_else(|| unsupported("non-scalar keys cannot be created"))
}

/// Flow rendering of a created node, e.g. `{tag: v1.2.3}`.
fn render_flow(node: &Node) -> Result<String, CannonError> {
    match node {
        Node::Scalar(s) => Ok(scalar::render(
            s.stringify().as_deref().unwrap_or(""),
            ScalarStyle::Plain,
            true,
        )),
        Node::Mapping(m) => {
            let parts = m
                .entries
                .iter()
                .map(|e| Ok(format!("{}: {}", key_text(e)?, render_flow(&e.value)?)))
                .collect::<Result<Vec<_>, CannonError>>()?;
            Ok(format!("{{{}}}", parts.join(", ")))
        }
        _ => Err(unsupported("only scalars and mappings can be created")),
    }
}

/// Line ending used by the source; CRLF if any line has one.
fn line_ending(source: &str) -> &'static str {
    if source.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Block rendering of a created entry, one line per scalar.
fn render_block_entry(indent: &str, entry: &Entry, eol: &str) -> Result<String, CannonError> {
    let key = key_text(entry)?;
    match &entry.value {
        Node::Mapping(m) if !m.entries.is_empty() => {
            let mut out = format!("{}{}:{}", indent, key, eol);
            let child_indent = format!("{}  ", indent);
            for child in &m.entries {
                out.push_str(&render_block_entry(&child_indent, child, eol)?);
            }
            Ok(out)
        }
        value => Ok(format!("{}{}: {}{}", indent, key, render_flow(value)?, eol)),
    }
}

fn collect_mapping(
    source: &str,
    map: &Mapping,
    is_root: bool,
    splices: &mut Vec<Splice>,
) -> Result<(), CannonError> {
    for entry in map.entries.iter().filter(|e| !e.inserted) {
        if let Some(null) = &entry.displaced {
            let text = render_flow(&entry.value)?;
            splices.push(place_value(source, entry, null, text)?);
            continue;
        }
        collect_value(source, entry, splices)?;
    }

    let inserted: Vec<&Entry> = map.entries.iter().filter(|e| e.inserted).collect();
    if inserted.is_empty() {
        return Ok(());
    }

    if map.flow {
        let open = map.offset.ok_or_else(|| unsupported("mapping has no position"))? + 1;
        let mut parts = inserted
            .iter()
            .map(|e| Ok(format!("{}: {}", key_text(e)?, render_flow(&e.value)?)))
            .collect::<Result<Vec<_>, CannonError>>()?
            .join(", ");
        if map.entries.iter().any(|e| !e.inserted) {
            parts.push_str(", ");
        }
        splices.push(Splice {
            start: open,
            end: open,
            text: parts,
        });
        return Ok(());
    }

    let eol = line_ending(source);
    if is_root {
        let mut text = String::new();
        if !source.is_empty() && !source.ends_with('\n') {
            text.push_str(eol);
        }
        for entry in inserted {
            text.push_str(&render_block_entry("", entry, eol)?);
        }
        splices.push(Splice {
            start: source.len(),
            end: source.len(),
            text,
        });
        return Ok(());
    }

    // New keys go on their own lines just above the first existing key.
    let first_key = map
        .entries
        .iter()
        .find(|e| !e.inserted)
        .and_then(|e| e.key.as_scalar())
        .and_then(|k| k.offset)
        .ok_or_else(|| unsupported("cannot find where to add a key"))?;
    let start = line_start(source, first_key);
    let indent = &source[start..first_key];
    if !indent.chars().all(|c| c == ' ') {
        return Err(unsupported("mapping does not start on its own line"));
    }
    let mut text = String::new();
    for entry in inserted {
        text.push_str(&render_block_entry(indent, entry, eol)?);
    }
    splices.push(Splice {
        start,
        end: start,
        text,
    });
    Ok(())
}

fn collect_value(source: &str, entry: &Entry, splices: &mut Vec<Splice>) -> Result<(), CannonError> {
    match &entry.value {
        Node::Scalar(s) => {
            if let Some(value) = s.pending() {
                let text = scalar::render(value, s.style, s.flow);
                splices.push(place_value(source, entry, s, text)?);
            }
            Ok(())
        }
        Node::Mapping(m) => collect_mapping(source, m, false, splices),
        Node::Sequence(seq) => collect_sequence(source, seq, splices),
        Node::Alias { .. } => Ok(()),
    }
}

fn collect_sequence(source: &str, seq: &Sequence, splices: &mut Vec<Splice>) -> Result<(), CannonError> {
    for item in &seq.items {
        match item {
            Node::Scalar(s) => {
                if let Some(value) = s.pending() {
                    let text = scalar::render(value, s.style, s.flow);
                    splices.push(replace_scalar(source, s, text)?);
                }
            }
            Node::Mapping(m) => collect_mapping(source, m, false, splices)?,
            Node::Sequence(inner) => collect_sequence(source, inner, splices)?,
            Node::Alias { .. } => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUES: &str = "\
# Deployment values
image:
  repository: ghcr.io/acme/api   # registry
  tag: old
env:
  - name: APP_ENV
    value: dev
  - name: GIT_SHA
    value: \"aaa\"
  - name: APP_VERSION
    value: 'v0.0.1'
";

    fn doc(source: &str) -> Document {
        Document::parse(source.to_string()).unwrap()
    }

    fn rendered(doc: &Document) -> String {
        let out = doc.render().unwrap();
        doc.verify(&out).unwrap();
        out
    }

    #[test]
    fn test_render_without_edits_is_identity() {
        let d = doc(VALUES);
        assert_eq!(rendered(&d), VALUES);
    }

    #[test]
    fn test_byte_order_mark_is_kept() {
        let source = format!("\u{feff}{}", VALUES);
        let mut d = doc(&source);
        assert_eq!(rendered(&d), source);

        d.set_scalar(&[Segment::Key("image"), Segment::Key("tag")], "v1.2.3")
            .unwrap();
        let out = rendered(&d);
        assert!(out.starts_with("\u{feff}# Deployment values\n"));
        assert_eq!(out, source.replace("tag: old", "tag: v1.2.3"));
    }

    #[test]
    fn test_crlf_kept_for_added_lines() {
        let mut d = doc("image:\r\n  repository: acme\r\n  pullPolicy: Always\r\nenv: []\r\n");
        d.ensure_root_mapping("image").unwrap();
        d.set_scalar(&[Segment::Key("image"), Segment::Key("tag")], "v1.0.0")
            .unwrap();
        assert_eq!(
            rendered(&d),
            "image:\r\n  tag: v1.0.0\r\n  repository: acme\r\n  pullPolicy: Always\r\nenv: []\r\n"
        );

        let mut d = doc("env: []\r\nreplicas: 2");
        d.ensure_root_mapping("image").unwrap();
        d.set_scalar(&[Segment::Key("image"), Segment::Key("tag")], "v1.0.0")
            .unwrap();
        assert_eq!(rendered(&d), "env: []\r\nreplicas: 2\r\nimage:\r\n  tag: v1.0.0\r\n");
    }

    #[test]
    fn test_root_must_be_mapping() {
        for source in ["", "- a\n- b\n", "just text\n", "a: 1\n---\nb: 2\n"] {
            let err = Document::parse(source.to_string()).unwrap_err();
            assert!(matches!(err, CannonError::Shape(_)), "{source:?}: {err:?}");
        }
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let err = Document::parse("a: [1, 2\n".to_string()).unwrap_err();
        assert!(matches!(err, CannonError::Parse(_)));
    }

    #[test]
    fn test_set_scalar_keeps_quoting_and_comments() {
        let mut d = doc(VALUES);
        assert!(d.set_scalar(&[Segment::Key("image"), Segment::Key("tag")], "v1.2.3").unwrap());
        assert!(d
            .set_scalar(&[Segment::Key("env"), Segment::Index(1), Segment::Key("value")], "0123456789ab")
            .unwrap());
        assert!(d
            .set_scalar(&[Segment::Key("env"), Segment::Index(2), Segment::Key("value")], "unversioned")
            .unwrap());

        let out = rendered(&d);
        assert_eq!(
            out,
            VALUES
                .replace("tag: old", "tag: v1.2.3")
                .replace("\"aaa\"", "\"0123456789ab\"")
                .replace("'v0.0.1'", "'unversioned'")
        );
    }

    #[test]
    fn test_set_same_value_is_not_a_change() {
        let mut d = doc(VALUES);
        assert!(!d.set_scalar(&[Segment::Key("image"), Segment::Key("tag")], "old").unwrap());
        assert_eq!(rendered(&d), VALUES);
    }

    #[test]
    fn test_empty_string_is_quoted() {
        let mut d = doc("env:\n  - name: GIT_SHA\n    value: abc # sha\n");
        d.set_scalar(&[Segment::Key("env"), Segment::Index(0), Segment::Key("value")], "")
            .unwrap();
        assert_eq!(rendered(&d), "env:\n  - name: GIT_SHA\n    value: \"\" # sha\n");
    }

    #[test]
    fn test_implicit_null_value_is_filled() {
        let mut d = doc("env:\n  - name: GIT_SHA\n    value:\n  - name: B\n    value: x\n");
        assert!(d
            .set_scalar(&[Segment::Key("env"), Segment::Index(0), Segment::Key("value")], "abc")
            .unwrap());
        assert_eq!(
            rendered(&d),
            "env:\n  - name: GIT_SHA\n    value: abc\n  - name: B\n    value: x\n"
        );
    }

    #[test]
    fn test_flow_entries_are_edited_in_place() {
        let mut d = doc("env: [{name: GIT_SHA, value: abc}, {name: X, value: y}]\n");
        d.set_scalar(&[Segment::Key("env"), Segment::Index(0), Segment::Key("value")], "def")
            .unwrap();
        assert_eq!(
            rendered(&d),
            "env: [{name: GIT_SHA, value: def}, {name: X, value: y}]\n"
        );
    }

    #[test]
    fn test_missing_tag_is_added_above_first_key() {
        let mut d = doc("image:\n  repository: acme # r\n  pullPolicy: Always\nenv: []\n");
        d.ensure_root_mapping("image").unwrap();
        d.set_scalar(&[Segment::Key("image"), Segment::Key("tag")], "v1.0.0")
            .unwrap();
        assert_eq!(
            rendered(&d),
            "image:\n  tag: v1.0.0\n  repository: acme # r\n  pullPolicy: Always\nenv: []\n"
        );
    }

    #[test]
    fn test_absent_image_is_appended() {
        let mut d = doc("env: []  # none\nreplicas: 2");
        d.ensure_root_mapping("image").unwrap();
        d.set_scalar(&[Segment::Key("image"), Segment::Key("tag")], "v1.0.0")
            .unwrap();
        assert_eq!(
            rendered(&d),
            "env: []  # none\nreplicas: 2\nimage:\n  tag: v1.0.0\n"
        );
    }

    #[test]
    fn test_null_image_becomes_flow_mapping() {
        let mut d = doc("image: ~\nenv: []\n");
        d.ensure_root_mapping("image").unwrap();
        d.set_scalar(&[Segment::Key("image"), Segment::Key("tag")], "v1.0.0")
            .unwrap();
        assert_eq!(rendered(&d), "image: {tag: v1.0.0}\nenv: []\n");

        let mut d = doc("image:\nenv: []\n");
        d.ensure_root_mapping("image").unwrap();
        d.set_scalar(&[Segment::Key("image"), Segment::Key("tag")], "v1.0.0")
            .unwrap();
        assert_eq!(rendered(&d), "image: {tag: v1.0.0}\nenv: []\n");
    }

    #[test]
    fn test_flow_image_gets_tag_inserted() {
        let mut d = doc("image: {repository: acme}\n");
        d.ensure_root_mapping("image").unwrap();
        d.set_scalar(&[Segment::Key("image"), Segment::Key("tag")], "v1.0.0")
            .unwrap();
        assert_eq!(rendered(&d), "image: {tag: v1.0.0, repository: acme}\n");
    }

    #[test]
    fn test_non_mapping_image_is_shape_error() {
        let mut d = doc("image: nginx\n");
        let err = d.ensure_root_mapping("image").unwrap_err();
        assert!(matches!(err, CannonError::Shape(_)));
        assert!(err.to_string().contains("'image'"));
    }

    #[test]
    fn test_block_scalar_cannot_be_rewritten() {
        let mut d = doc("image:\n  tag: |\n    old\n");
        d.set_scalar(&[Segment::Key("image"), Segment::Key("tag")], "v1.0.0")
            .unwrap();
        let err = d.render().unwrap_err();
        assert!(matches!(err, CannonError::UnsupportedLayout(_)));
    }

    #[test]
    fn test_verify_catches_unintended_change() {
        let d = doc(VALUES);
        let tampered = VALUES.replace("repository: ghcr.io/acme/api", "repository: other");
        let err = d.verify(&tampered).unwrap_err();
        assert!(matches!(err, CannonError::Verification(_)));
    }

    #[test]
    fn test_path_display() {
        let path = [Segment::Key("env"), Segment::Index(2), Segment::Key("value")];
        assert_eq!(PathDisplay(&path).to_string(), "env[2].value");
    }
}
