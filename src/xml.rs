//! Minimal DOM-style XML layer for WebDAV bodies.
//!
//! Supports exactly the subset the protocol handlers need: elements with
//! start/end or self-closing tags, double-quoted attributes, and verbatim
//! text content. No entity decoding, no processing instructions, no
//! comments; encountering either of the latter is a parse error and callers
//! keep them out of input they generate themselves.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]; the parent link is a plain index.

use std::collections::BTreeMap;

pub type NodeId = usize;

#[derive(Debug, Default)]
pub struct Node {
    pub name: String,
    /// Text content, concatenated across any interleaved children.
    pub value: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum XmlError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("expected element")]
    ExpectedElement,
    #[error("processing instructions and comments are not supported")]
    Unsupported,
    #[error("malformed attribute")]
    BadAttribute,
    #[error("mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedTag { expected: String, found: String },
}

impl Document {
    /// Root element id; valid for every document.
    pub const ROOT: NodeId = 0;

    /// Create a document whose root element is `name`.
    pub fn new(name: impl Into<String>) -> Document {
        Document {
            nodes: vec![Node {
                name: name.into(),
                ..Node::default()
            }],
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Append a new child element under `parent` and return its id.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            name: name.into(),
            parent: Some(parent),
            ..Node::default()
        });
        self.nodes[parent].children.push(id);
        id
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        self.nodes[id].value = value.into();
    }

    pub fn set_attribute(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        self.nodes[id].attributes.insert(name.into(), value.into());
    }

    /// First direct child of `id` with the given tag name.
    pub fn find_child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].name == name)
    }

    /// Parse a single element (plus its subtree) from `input`. Bytes after
    /// the root element's end tag are ignored.
    pub fn parse(input: &str) -> Result<Document, XmlError> {
        let mut parser = Parser {
            bytes: input.as_bytes(),
            pos: 0,
        };
        let mut doc = Document { nodes: Vec::new() };
        parser.parse_element(&mut doc, None)?;
        Ok(doc)
    }

    /// Serialise the whole tree. Attribute values and text are emitted as
    /// stored; callers escape anything that needs escaping before putting
    /// it in the tree.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_node(Self::ROOT, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id];
        out.push('<');
        out.push_str(&node.name);
        for (name, value) in &node.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        if node.value.is_empty() && node.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        out.push_str(&node.value);
        for &child in &node.children {
            self.write_node(child, out);
        }
        out.push_str("</");
        out.push_str(&node.name);
        out.push('>');
    }
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn skip_whitespace(&mut self) {
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn tag_name(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == b'>' || b == b'/' {
                break;
            }
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned()
    }

    /// Parse one element into `doc` under `parent`; returns its id.
    fn parse_element(&mut self, doc: &mut Document, parent: Option<NodeId>) -> Result<NodeId, XmlError> {
        self.skip_whitespace();
        match self.peek() {
            None => return Err(XmlError::UnexpectedEof),
            Some(b'<') => self.pos += 1,
            Some(_) => return Err(XmlError::ExpectedElement),
        }
        if matches!(self.peek(), Some(b'?') | Some(b'!')) {
            return Err(XmlError::Unsupported);
        }

        let name = self.tag_name();
        if name.is_empty() {
            return Err(XmlError::ExpectedElement);
        }

        let id = doc.nodes.len();
        doc.nodes.push(Node {
            name,
            parent,
            ..Node::default()
        });
        if let Some(parent) = parent {
            doc.nodes[parent].children.push(id);
        }

        self.parse_attributes(doc, id)?;

        self.skip_whitespace();
        if self.peek() == Some(b'/') {
            // self-closing leaf
            self.pos += 1;
            if self.peek() != Some(b'>') {
                return Err(XmlError::BadAttribute);
            }
            self.pos += 1;
            return Ok(id);
        }
        if self.peek() != Some(b'>') {
            return Err(XmlError::BadAttribute);
        }
        self.pos += 1;

        let mut content = String::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(XmlError::UnexpectedEof),
                Some(b'<') => {
                    if self.bytes.get(self.pos + 1) == Some(&b'/') {
                        self.pos += 2;
                        let end = self.tag_name();
                        if end != doc.nodes[id].name {
                            return Err(XmlError::MismatchedTag {
                                expected: doc.nodes[id].name.clone(),
                                found: end,
                            });
                        }
                        while self.peek().is_some_and(|b| b != b'>') {
                            self.pos += 1;
                        }
                        if self.peek().is_none() {
                            return Err(XmlError::UnexpectedEof);
                        }
                        self.pos += 1;
                        doc.nodes[id].value = content;
                        return Ok(id);
                    }
                    self.parse_element(doc, Some(id))?;
                }
                Some(_) => {
                    // verbatim text until the next tag
                    let start = self.pos;
                    while self.peek().is_some_and(|b| b != b'<') {
                        self.pos += 1;
                    }
                    content.push_str(&String::from_utf8_lossy(&self.bytes[start..self.pos]));
                }
            }
        }
    }

    fn parse_attributes(&mut self, doc: &mut Document, id: NodeId) -> Result<(), XmlError> {
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(XmlError::UnexpectedEof),
                Some(b'>') | Some(b'/') => return Ok(()),
                Some(_) => {}
            }

            let start = self.pos;
            while self
                .peek()
                .is_some_and(|b| !b.is_ascii_whitespace() && b != b'=')
            {
                self.pos += 1;
            }
            let name = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();

            self.skip_whitespace();
            if self.peek() != Some(b'=') {
                return Err(XmlError::BadAttribute);
            }
            self.pos += 1;
            self.skip_whitespace();
            if self.peek() != Some(b'"') {
                return Err(XmlError::BadAttribute);
            }
            self.pos += 1;

            let vstart = self.pos;
            while self.peek().is_some_and(|b| b != b'"') {
                self.pos += 1;
            }
            if self.peek().is_none() {
                return Err(XmlError::UnexpectedEof);
            }
            let value = String::from_utf8_lossy(&self.bytes[vstart..self.pos]).into_owned();
            self.pos += 1;

            doc.nodes[id].attributes.insert(name, value);
        }
    }
}
