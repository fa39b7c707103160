//! Layer enumeration.
//!
//! Walks the document once, in document order, and describes every visible
//! labelled layer group. Locked layers get an anchor marker drawn into them
//! (see [`marker`](super::marker)).

use serde::Serialize;
use std::fmt;

use super::dom::{Document, Element, Node, NodePath};
use super::marker::insert_marker;
use super::ns::Vocabulary;
use super::transform::{Translate, parse_translate};
use super::SvgError;
use crate::debug;

/// Layer classification written to the components manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Component,
    Locked,
}

impl LayerKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Locked => "locked",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One exportable layer, immutable for the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    /// Ancestor layer ids, nearest first.
    pub parents: Vec<String>,
    pub translate: Translate,
    /// Location in the source document.
    #[serde(skip)]
    pub path: NodePath,
}

/// Enumerate layers and mark locked ones in the source document.
pub fn enumerate_layers(doc: &mut Document) -> Result<Vec<Layer>, SvgError> {
    let layers = scan_layers(doc)?;

    let vocab = doc.vocab().clone();
    for layer in layers.iter().filter(|l| l.kind == LayerKind::Locked) {
        if let Some(elem) = doc.element_mut(&layer.path) {
            insert_marker(elem, &vocab, layer.translate);
            debug!("layer"; "marked locked layer [{}]", layer.label);
        }
    }

    debug!("layer"; "total number of layers: {}", layers.len());
    Ok(layers)
}

/// Enumerate layers without touching the document.
pub fn scan_layers(doc: &Document) -> Result<Vec<Layer>, SvgError> {
    let mut layers = Vec::new();
    let mut path = NodePath::new();
    let mut ancestors = vec![doc.root()];
    walk(doc.root(), doc.vocab(), &mut path, &mut ancestors, &mut layers)?;
    Ok(layers)
}

fn walk<'a>(
    elem: &'a Element,
    vocab: &Vocabulary,
    path: &mut NodePath,
    ancestors: &mut Vec<&'a Element>,
    out: &mut Vec<Layer>,
) -> Result<(), SvgError> {
    for (index, node) in elem.children.iter().enumerate() {
        let Node::Element(child) = node else {
            continue;
        };

        path.push(index);
        if vocab.is_layer(child)
            && let Some(layer) = describe(child, vocab, path, ancestors)?
        {
            debug!("layer"; "use: [{}, {}]", layer.label, layer.kind);
            out.push(layer);
        }

        ancestors.push(child);
        walk(child, vocab, path, ancestors, out)?;
        ancestors.pop();
        path.pop();
    }
    Ok(())
}

fn describe(
    elem: &Element,
    vocab: &Vocabulary,
    path: &NodePath,
    ancestors: &[&Element],
) -> Result<Option<Layer>, SvgError> {
    let Some(label) = elem.attr(&vocab.label) else {
        return Ok(None);
    };

    if elem.attr("style").is_some_and(|s| s.contains("display:none")) {
        debug!("layer"; "skip hidden: [{}]", label);
        return Ok(None);
    }

    let translate = parse_translate(elem.attr("transform"))?;
    if translate != Translate::default() {
        debug!("layer"; "[{}] has translate: x[{}] y[{}]", label, translate.x, translate.y);
    }

    let parents = ancestors
        .iter()
        .rev()
        .take_while(|parent| parent.has_attr(&vocab.label))
        .map(|parent| {
            parent
                .attr("id")
                .map(str::to_string)
                .ok_or_else(|| SvgError::missing(parent, "id"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let kind = if elem
        .attr(&vocab.insensitive)
        .is_some_and(|v| v.contains("true"))
    {
        LayerKind::Locked
    } else {
        LayerKind::Component
    };

    let id = elem.attr("id").ok_or_else(|| SvgError::missing(elem, "id"))?;

    Ok(Some(Layer {
        id: id.to_string(),
        label: label.to_string(),
        kind,
        parents,
        translate,
        path: path.clone(),
    }))
}
