//! Span-annotated YAML tree.
//!
//! Built from `yaml-rust2` marked events. Every node that came from the
//! source remembers the byte offset where it starts; nodes created by an
//! edit have no offset and are rendered fresh.

use yaml_rust2::parser::{Event, MarkedEventReceiver};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Plain scalars that read as null.
const NULL_SCALARS: &[&str] = &["", "~", "null", "Null", "NULL"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    SingleQuoted,
    DoubleQuoted,
    /// `|` or `>`.
    Block,
}

impl From<TScalarStyle> for ScalarStyle {
    fn from(style: TScalarStyle) -> Self {
        match style {
            TScalarStyle::SingleQuoted => ScalarStyle::SingleQuoted,
            TScalarStyle::DoubleQuoted => ScalarStyle::DoubleQuoted,
            TScalarStyle::Literal | TScalarStyle::Folded => ScalarStyle::Block,
            _ => ScalarStyle::Plain,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Node {
    Mapping(Mapping),
    Sequence(Sequence),
    Scalar(Scalar),
    Alias { offset: usize },
}

impl Node {
    /// Short name of the node's shape, for error messages.
    pub fn shape(&self) -> &'static str {
        match self {
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "list",
            Node::Scalar(s) if s.is_null() => "null",
            Node::Scalar(_) => "scalar",
            Node::Alias { .. } => "alias",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Scalar(s) if s.is_null())
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Scalar text of this node; `None` for null and non-scalar nodes.
    pub fn stringify(&self) -> Option<String> {
        self.as_scalar().and_then(Scalar::stringify)
    }
}

#[derive(Debug, Clone)]
pub struct Scalar {
    /// Byte offset of the first character (opening quote for quoted styles).
    /// `None` for created scalars and for the implicit null of `key:`.
    pub(crate) offset: Option<usize>,
    pub(crate) text: String,
    pub(crate) style: ScalarStyle,
    /// Inside a `{...}` or `[...]` collection.
    pub(crate) flow: bool,
    pub(crate) replacement: Option<String>,
}

impl Scalar {
    /// A scalar that does not exist in the source yet.
    pub(crate) fn created(value: &str) -> Self {
        Self {
            offset: None,
            text: String::new(),
            style: ScalarStyle::Plain,
            flow: false,
            replacement: Some(value.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        self.replacement.is_none()
            && self.style == ScalarStyle::Plain
            && NULL_SCALARS.contains(&self.text.as_str())
    }

    pub fn stringify(&self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        Some(self.replacement.as_ref().unwrap_or(&self.text).clone())
    }

    /// Set the value. Returns whether it actually changed.
    pub(crate) fn set(&mut self, value: &str) -> bool {
        if self.stringify().as_deref() == Some(value) {
            return false;
        }
        self.replacement = Some(value.to_string());
        true
    }

    /// Replacement text that differs from what the source holds.
    pub(crate) fn pending(&self) -> Option<&str> {
        match &self.replacement {
            Some(value) if self.offset.is_none() || *value != self.text => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub(crate) key: Node,
    pub(crate) value: Node,
    /// Added by an edit; not present in the source.
    pub(crate) inserted: bool,
    /// The null scalar that `value` replaced, when a null field was turned
    /// into a mapping.
    pub(crate) displaced: Option<Scalar>,
}

#[derive(Debug, Clone, Default)]
pub struct Mapping {
    pub(crate) offset: Option<usize>,
    pub(crate) flow: bool,
    pub(crate) entries: Vec<Entry>,
}

impl Mapping {
    fn position(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.key.stringify().as_deref() == Some(key))
    }

    /// First entry whose key reads as `key`.
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.position(key).map(|i| &self.entries[i])
    }

    pub(crate) fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.position(key).map(move |i| &mut self.entries[i])
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entry(key).map(|e| &e.value)
    }

    pub(crate) fn insert(&mut self, key: &str, value: Node) {
        self.entries.push(Entry {
            key: Node::Scalar(Scalar::created(key)),
            value,
            inserted: true,
            displaced: None,
        });
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sequence {
    pub(crate) flow: bool,
    pub(crate) items: Vec<Node>,
}

impl Sequence {
    pub fn items(&self) -> &[Node] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

enum Frame {
    Mapping(Mapping, Option<Node>),
    Sequence(Sequence),
}

impl Frame {
    fn is_flow(&self) -> bool {
        match self {
            Frame::Mapping(m, _) => m.flow,
            Frame::Sequence(s) => s.flow,
        }
    }
}

/// Event receiver that assembles [`Node`] trees, one per document.
pub(crate) struct Loader<'a> {
    source: &'a str,
    /// Byte offset of each char; markers count chars.
    char_offsets: Vec<usize>,
    stack: Vec<Frame>,
    pub(crate) documents: Vec<Node>,
}

impl<'a> Loader<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        let mut char_offsets: Vec<usize> = source.char_indices().map(|(i, _)| i).collect();
        char_offsets.push(source.len());
        Self {
            source,
            char_offsets,
            stack: Vec::new(),
            documents: Vec::new(),
        }
    }

    fn byte_offset(&self, mark: &Marker) -> usize {
        self.char_offsets
            .get(mark.index())
            .copied()
            .unwrap_or(self.source.len())
    }

    fn in_flow(&self) -> bool {
        self.stack.iter().any(Frame::is_flow)
    }

    fn starts_with(&self, offset: usize, pattern: &str) -> bool {
        self.source
            .get(offset..)
            .map_or(false, |rest| rest.starts_with(pattern))
    }

    fn scalar(&self, text: String, style: TScalarStyle, offset: usize) -> Scalar {
        let style = ScalarStyle::from(style);
        // An omitted value is reported as a `~` scalar positioned at the
        // next token, so it has no text of its own to point at.
        let implicit = style == ScalarStyle::Plain
            && (text.is_empty() || (text == "~" && !self.starts_with(offset, "~")));
        if implicit {
            return Scalar {
                offset: None,
                text: String::new(),
                style,
                flow: self.in_flow(),
                replacement: None,
            };
        }
        Scalar {
            offset: Some(offset),
            text,
            style,
            flow: self.in_flow(),
            replacement: None,
        }
    }

    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => self.documents.push(node),
            Some(Frame::Sequence(seq)) => seq.items.push(node),
            Some(Frame::Mapping(map, pending)) => match pending.take() {
                None => *pending = Some(node),
                Some(key) => map.entries.push(Entry {
                    key,
                    value: node,
                    inserted: false,
                    displaced: None,
                }),
            },
        }
    }
}

impl MarkedEventReceiver for Loader<'_> {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        let offset = self.byte_offset(&mark);
        match ev {
            Event::Scalar(text, style, ..) => {
                let scalar = self.scalar(text, style, offset);
                self.push_node(Node::Scalar(scalar));
            }
            Event::Alias(..) => self.push_node(Node::Alias { offset }),
            Event::SequenceStart(..) => {
                let flow = self.starts_with(offset, "[");
                self.stack.push(Frame::Sequence(Sequence {
                    flow,
                    items: Vec::new(),
                }));
            }
            Event::MappingStart(..) => {
                let flow = self.starts_with(offset, "{");
                self.stack.push(Frame::Mapping(
                    Mapping {
                        offset: Some(offset),
                        flow,
                        entries: Vec::new(),
                    },
                    None,
                ));
            }
            Event::SequenceEnd | Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Sequence(seq)) => self.push_node(Node::Sequence(seq)),
                Some(Frame::Mapping(map, _)) => self.push_node(Node::Mapping(map)),
                None => {}
            },
            _ => {}
        }
    }
}
