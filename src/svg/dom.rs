//! Owned XML tree for SVG documents.
//!
//! The tree is built with `quick-xml`'s pull reader and written back with its
//! writer. Elements keep qualified names and attributes in source order;
//! everything else (text, comments, CDATA, entity references, the prolog) is
//! kept as the raw event so unmodified content is written back byte for byte.
//!
//! Nodes are addressed by [`NodePath`]s (child indices from the root) rather
//! than parent pointers.

use anyhow::Context;
use quick_xml::{
    Reader, Writer,
    escape::{escape, unescape},
    events::{BytesEnd, BytesStart, Event},
};
use std::{fmt, fs, io::Write, path::Path};

use super::SvgError;
use super::ns::Vocabulary;

/// Child indices leading from the root element to a node.
pub type NodePath = Vec<usize>;

/// A node inside an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Non-element content kept as its original event.
    Raw(Event<'static>),
}

/// An XML element with owned name, attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Qualified name (`prefix:local` or `local`).
    pub name: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn local_name(&self) -> &str {
        self.name.split_once(':').map_or(self.name.as_str(), |(_, local)| local)
    }

    pub fn prefix(&self) -> &str {
        self.name.split_once(':').map_or("", |(prefix, _)| prefix)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attr(key).is_some()
    }

    /// Set an attribute, replacing the value in place if it already exists.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((key, value)),
        }
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(elem) => Some(elem),
            Node::Raw(_) => None,
        })
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(elem) => Some(elem),
            Node::Raw(_) => None,
        })
    }

    /// Number of direct element children.
    pub fn element_count(&self) -> usize {
        self.child_elements().count()
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// All descendant elements in document (pre-)order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Mutable descendants matching `pred`, in document order.
    pub fn descendants_mut_where(
        &mut self,
        pred: &dyn Fn(&Element) -> bool,
    ) -> Vec<&mut Element> {
        let mut found = Vec::new();
        collect_mut(self, pred, &mut found);
        found
    }

    /// Deep copy leaving out every descendant for which `prune` holds.
    pub fn clone_pruned(&self, prune: &dyn Fn(&Element) -> bool) -> Element {
        let children = self
            .children
            .iter()
            .filter_map(|node| match node {
                Node::Element(elem) if prune(elem) => None,
                Node::Element(elem) => Some(Node::Element(elem.clone_pruned(prune))),
                Node::Raw(event) => Some(Node::Raw(event.clone())),
            })
            .collect();
        Element {
            name: self.name.clone(),
            attrs: self.attrs.clone(),
            children,
        }
    }

    /// Remove all descendants matching `pred`, returning how many were removed.
    pub fn remove_where(&mut self, pred: &dyn Fn(&Element) -> bool) -> usize {
        let before = self.children.len();
        self.children
            .retain(|node| !matches!(node, Node::Element(elem) if pred(elem)));
        let mut removed = before - self.children.len();
        for child in self.child_elements_mut() {
            removed += child.remove_where(pred);
        }
        removed
    }

    fn from_start(start: &BytesStart<'_>, position: u64) -> Result<Self, SvgError> {
        let name = utf8(start.name().as_ref(), position)?.to_string();
        let mut elem = Element::new(name);
        for attr in start.attributes() {
            let attr = attr.map_err(|e| SvgError::xml(position, e))?;
            let key = utf8(attr.key.as_ref(), position)?;
            let raw = utf8(&attr.value, position)?;
            let value = unescape(raw).map_err(|e| SvgError::xml(position, e))?;
            elem.attrs.push((key.to_string(), value.into_owned()));
        }
        Ok(elem)
    }

    fn start_tag(&self) -> BytesStart<'_> {
        let mut content = self.name.clone();
        for (key, value) in &self.attrs {
            content.push(' ');
            content.push_str(key);
            content.push_str("=\"");
            content.push_str(&escape(value.as_str()));
            content.push('"');
        }
        BytesStart::from_content(content, self.name.len())
    }

    /// Serialize this element and its subtree on its own.
    pub fn to_xml(&self) -> Result<String, SvgError> {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(SvgError::write)
    }

    pub(crate) fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), SvgError> {
        if self.children.is_empty() {
            writer
                .write_event(Event::Empty(self.start_tag()))
                .map_err(SvgError::write)?;
            return Ok(());
        }

        writer
            .write_event(Event::Start(self.start_tag()))
            .map_err(SvgError::write)?;
        for child in &self.children {
            match child {
                Node::Element(elem) => elem.write_to(writer)?,
                Node::Raw(event) => writer.write_event(event.borrow()).map_err(SvgError::write)?,
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(SvgError::write)?;
        Ok(())
    }
}

fn collect_mut<'a>(
    elem: &'a mut Element,
    pred: &dyn Fn(&Element) -> bool,
    found: &mut Vec<&'a mut Element>,
) {
    for child in elem.child_elements_mut() {
        if pred(child) {
            // Matches are not searched further so borrows never overlap.
            found.push(child);
        } else {
            collect_mut(child, pred, found);
        }
    }
}

fn utf8(bytes: &[u8], position: u64) -> Result<&str, SvgError> {
    std::str::from_utf8(bytes).map_err(|e| SvgError::xml(position, e))
}

/// Pre-order iterator over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let iter = self.stack.last_mut()?;
            match iter.next() {
                Some(Node::Element(elem)) => {
                    self.stack.push(elem.children.iter());
                    return Some(elem);
                }
                Some(Node::Raw(_)) => {}
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// A parsed SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    prolog: Vec<Event<'static>>,
    root: Element,
    epilog: Vec<Event<'static>>,
    vocab: Vocabulary,
}

impl Document {
    /// Parse a document from source text.
    pub fn parse(source: &str) -> Result<Self, SvgError> {
        let mut reader = Reader::from_str(source);
        let mut stack: Vec<Element> = Vec::new();
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event()
                .map_err(|e| SvgError::xml(reader.error_position(), e))?;

            let finished = match event {
                Event::Start(start) => {
                    stack.push(Element::from_start(&start, position)?);
                    None
                }
                Event::Empty(start) => Some(Element::from_start(&start, position)?),
                Event::End(_) => Some(stack.pop().ok_or_else(|| {
                    SvgError::xml(position, "unexpected closing tag")
                })?),
                Event::Eof => break,
                other => {
                    let owned = other.into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Raw(owned)),
                        None if root.is_none() => prolog.push(owned),
                        None => epilog.push(owned),
                    }
                    None
                }
            };

            if let Some(elem) = finished {
                match stack.last_mut() {
                    Some(parent) => parent.push(elem),
                    None if root.is_none() => root = Some(elem),
                    None => return Err(SvgError::xml(position, "multiple root elements")),
                }
            }
        }

        if !stack.is_empty() {
            return Err(SvgError::xml(reader.buffer_position(), "unclosed element"));
        }
        let root = root.ok_or_else(|| SvgError::xml(0, "document has no root element"))?;
        let vocab = Vocabulary::from_root(&root);

        Ok(Self {
            prolog,
            root,
            epilog,
            vocab,
        })
    }

    /// Read and parse a document from disk.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// A document sharing this one's prolog and epilog around a new root.
    pub fn with_root(&self, root: Element) -> Self {
        Self {
            prolog: self.prolog.clone(),
            root,
            epilog: self.epilog.clone(),
            vocab: self.vocab.clone(),
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Resolve a node path to an element.
    #[cfg(test)]
    pub fn element(&self, path: &[usize]) -> Option<&Element> {
        path.iter().try_fold(&self.root, |elem, &index| {
            match elem.children.get(index)? {
                Node::Element(child) => Some(child),
                Node::Raw(_) => None,
            }
        })
    }

    /// Resolve a node path to a mutable element.
    pub fn element_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        path.iter().try_fold(&mut self.root, |elem, &index| {
            match elem.children.get_mut(index)? {
                Node::Element(child) => Some(child),
                Node::Raw(_) => None,
            }
        })
    }

    /// Serialize the document.
    pub fn write<W: Write>(&self, out: W) -> Result<(), SvgError> {
        let mut writer = Writer::new(out);
        for event in &self.prolog {
            writer.write_event(event.borrow()).map_err(SvgError::write)?;
        }
        self.root.write_to(&mut writer)?;
        for event in &self.epilog {
            writer.write_event(event.borrow()).map_err(SvgError::write)?;
        }
        Ok(())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.write(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}
