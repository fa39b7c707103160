//! Per-layer isolation.
//!
//! Each exported file is a copy of the whole document reduced to a single
//! layer: the root keeps its non-layer content (defs, metadata, named view,
//! loose shapes) and the target layer is appended as its only layer, forced
//! visible. Layers nested inside the target are exported on their own, so
//! they are pruned from its copy.

use std::io::{self, BufWriter, Write};
use thiserror::Error;

use super::SvgError;
use super::bbox::BBox;
use super::dom::{Document, Element};
use super::geometry::GeometryContext;
use super::text::{is_text, repair_text};
use crate::debug;
use crate::utils::scratch::ScratchFile;

/// Isolation failures.
///
/// `NotFound` and `Empty` only drop the layer; the rest abort the run.
#[derive(Debug, Error)]
pub enum IsolateError {
    #[error("layer `{0}` not found")]
    NotFound(String),

    #[error("layer `{0}` has nothing to export")]
    Empty(String),

    #[error(transparent)]
    Svg(#[from] SvgError),

    #[error("Failed to write scratch file: {0}")]
    Io(#[from] io::Error),
}

impl IsolateError {
    /// Whether the run can continue with the next layer.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Empty(_))
    }
}

/// A layer written to its own scratch document.
#[derive(Debug)]
pub struct Isolated {
    pub scratch: ScratchFile,
    /// Union of the layer's child boxes, in the layer's own coordinates.
    /// All zero when no child has a resolvable box.
    pub bbox: BBox,
}

/// Write the layer `layer_id` of `doc` to a scratch file and measure it.
pub fn isolate_layer(doc: &Document, layer_id: &str) -> Result<Isolated, IsolateError> {
    let vocab = doc.vocab();
    let is_layer = |elem: &Element| vocab.is_layer(elem);

    let target = doc
        .root()
        .descendants()
        .find(|elem| vocab.is_layer(elem) && elem.attr("id") == Some(layer_id))
        .ok_or_else(|| IsolateError::NotFound(layer_id.to_string()))?;

    let mut layer = target.clone_pruned(&is_layer);
    layer.set_attr("style", "display:inline");
    if layer.element_count() == 0 {
        return Err(IsolateError::Empty(layer_id.to_string()));
    }

    for child in layer.child_elements_mut() {
        if is_text(vocab, child) {
            repair_text(child, vocab)?;
        }
    }

    let geometry = GeometryContext::new(doc);
    let bbox = geometry.children_box(&layer).unwrap_or_else(|| {
        debug!("isolate"; "[{}] has no measurable content", layer_id);
        BBox::default()
    });

    let mut root = doc.root().clone_pruned(&is_layer);
    root.push(layer);
    let isolated = doc.with_root(root);

    let mut scratch = ScratchFile::create()?;
    debug!("isolate"; "creating temp file {}", scratch.path().display());
    let mut out = BufWriter::new(scratch.file());
    isolated.write(&mut out)?;
    out.flush()?;
    drop(out);

    Ok(Isolated { scratch, bbox })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const HEAD: &str = r#"<svg xmlns="http://www.w3.org/2000/svg"
        xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="50" height="50">"#;

    fn doc(body: &str) -> Document {
        Document::parse(&format!("{HEAD}<defs id=\"d\"/>{body}</svg>")).unwrap()
    }

    fn written(isolated: &Isolated) -> Document {
        Document::parse(&fs::read_to_string(isolated.scratch.path()).unwrap()).unwrap()
    }

    #[test]
    fn test_single_rect_bounds() {
        let d = doc(r#"<g inkscape:groupmode="layer" id="a" inkscape:label="A" transform="translate(3,4)">
                <rect x="10" y="20" width="30" height="40"/></g>"#);
        let isolated = isolate_layer(&d, "a").unwrap();
        assert_eq!(isolated.bbox, BBox::from_edges(10.0, 20.0, 40.0, 60.0));
    }

    #[test]
    fn test_only_target_layer_remains() {
        let d = doc(r#"
            <g inkscape:groupmode="layer" id="a" inkscape:label="A" style="display:none"><rect width="1" height="1"/></g>
            <g inkscape:groupmode="layer" id="b" inkscape:label="B"><circle r="2"/></g>
        "#);
        let isolated = isolate_layer(&d, "a").unwrap();
        let out = written(&isolated);

        let layers: Vec<_> = out
            .root()
            .descendants()
            .filter(|e| out.vocab().is_layer(e))
            .collect();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].attr("id"), Some("a"));
        assert_eq!(layers[0].attr("style"), Some("display:inline"));
        // non-layer content of the root is kept
        assert!(out.root().child_elements().any(|e| e.name == "defs"));
    }

    #[test]
    fn test_nested_layers_are_pruned() {
        let d = doc(r#"
            <g inkscape:groupmode="layer" id="outer" inkscape:label="Outer">
              <rect x="0" y="0" width="5" height="5"/>
              <g inkscape:groupmode="layer" id="inner" inkscape:label="Inner">
                <rect x="100" y="100" width="5" height="5"/>
              </g>
            </g>
        "#);
        let outer = isolate_layer(&d, "outer").unwrap();
        assert_eq!(outer.bbox, BBox::from_edges(0.0, 0.0, 5.0, 5.0));
        let out = written(&outer);
        assert!(!out.root().descendants().any(|e| e.attr("id") == Some("inner")));

        // nested layers are isolated directly under the root
        let inner = isolate_layer(&d, "inner").unwrap();
        assert_eq!(inner.bbox, BBox::from_edges(100.0, 100.0, 105.0, 105.0));
        let out = written(&inner);
        let last = out.root().child_elements().last().unwrap();
        assert_eq!(last.attr("id"), Some("inner"));
    }

    #[test]
    fn test_empty_and_missing_layers_are_recoverable() {
        let d = doc(r#"
            <g inkscape:groupmode="layer" id="empty" inkscape:label="Empty"/>
            <g inkscape:groupmode="layer" id="nested" inkscape:label="OnlyLayers">
              <g inkscape:groupmode="layer" id="child" inkscape:label="Child"><rect width="1" height="1"/></g>
            </g>
        "#);

        let err = isolate_layer(&d, "empty").unwrap_err();
        assert!(matches!(err, IsolateError::Empty(_)));
        assert!(err.is_recoverable());

        assert!(matches!(isolate_layer(&d, "nested"), Err(IsolateError::Empty(_))));

        let err = isolate_layer(&d, "nope").unwrap_err();
        assert!(matches!(err, IsolateError::NotFound(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_unmeasurable_children_give_zero_box() {
        let d = doc(r#"<g inkscape:groupmode="layer" id="a" inkscape:label="A"><g/></g>"#);
        let isolated = isolate_layer(&d, "a").unwrap();
        assert_eq!(isolated.bbox, BBox::default());
    }

    #[test]
    fn test_inkscape_groups_keep_layer_bounds() {
        let d = doc(r#"<g inkscape:groupmode="layer" id="a" inkscape:label="A">
                <rect x="50" y="50" width="10" height="10"/>
                <g id="g1"/>
                <g id="g2"><text x="55" y="70"><tspan x="55" y="70">B</tspan></text></g></g>"#);
        let isolated = isolate_layer(&d, "a").unwrap();
        assert_eq!(isolated.bbox, BBox::from_edges(50.0, 50.0, 60.0, 82.0));
    }

    #[test]
    fn test_text_is_repaired_in_output() {
        let d = doc(r#"<g inkscape:groupmode="layer" id="t" inkscape:label="T">
                <text font-size="10"><tspan x="5" y="30">Hi</tspan></text></g>"#);
        let isolated = isolate_layer(&d, "t").unwrap();
        let out = written(&isolated);
        let text = out
            .root()
            .descendants()
            .find(|e| e.name == "text")
            .unwrap();
        assert_eq!(text.attr("x"), Some("5"));
        assert_eq!(text.attr("y"), Some("30"));
        let span = text.child_elements().next().unwrap();
        assert_eq!(span.attr("y"), Some("20"));
        // estimate: anchor (5,30) and span segment (5,20)-(5,32)
        assert_eq!(isolated.bbox, BBox::from_edges(5.0, 20.0, 5.0, 32.0));
    }

    #[test]
    fn test_scratch_removed_on_drop() {
        let d = doc(r#"<g inkscape:groupmode="layer" id="a" inkscape:label="A"><rect width="1" height="1"/></g>"#);
        let isolated = isolate_layer(&d, "a").unwrap();
        let path = isolated.scratch.path().to_path_buf();
        assert!(path.exists());
        drop(isolated);
        assert!(!path.exists());
    }

    #[test]
    fn test_source_document_untouched() {
        let d = doc(r#"<g inkscape:groupmode="layer" id="a" inkscape:label="A"><text><tspan x="1" y="2">x</tspan></text></g>"#);
        let before = d.clone();
        isolate_layer(&d, "a").unwrap();
        assert_eq!(d, before);
    }
}
