//! Temporary anchor markers for locked layers.
//!
//! A locked layer is the stencil's base; a degenerate line is drawn into it
//! at the insertion anchor `(1, 2)` (in document coordinates) so the anchor
//! is part of the layer's drawing area while exporting. The markers are
//! removed from the source document once all layers are processed.

use super::dom::{Document, Element};
use super::ns::{MARKER_LABEL, Vocabulary};
use super::transform::{Translate, format_coord};

const MARKER_STYLE: &str = "stroke:#000000;stroke-width:1;fill:none";

/// Build a marker path for a layer with the given offset.
pub fn marker_element(vocab: &Vocabulary, translate: Translate) -> Element {
    let x = format_coord(1.0 - translate.x);
    let y = format_coord(2.0 - translate.y);
    Element::new(vocab.svg_name("path"))
        .with_attr("style", MARKER_STYLE)
        .with_attr(vocab.label.as_str(), MARKER_LABEL)
        .with_attr("d", format!("M {x},{y} L {x},{y}"))
}

/// Append a marker to `layer`.
pub fn insert_marker(layer: &mut Element, vocab: &Vocabulary, translate: Translate) {
    layer.push(marker_element(vocab, translate));
}

/// Whether `elem` is a marker path.
pub fn is_marker(vocab: &Vocabulary, elem: &Element) -> bool {
    vocab.is_svg(elem, "path") && elem.attr(&vocab.label) == Some(MARKER_LABEL)
}

/// Remove every marker in the document, returning how many were removed.
pub fn remove_markers(doc: &mut Document) -> usize {
    let vocab = doc.vocab().clone();
    doc.root_mut().remove_where(&|elem| is_marker(&vocab, elem))
}

/// Number of markers currently in the document.
#[cfg(test)]
pub fn count_markers(doc: &Document) -> usize {
    let vocab = doc.vocab();
    doc.root()
        .descendants()
        .filter(|elem| is_marker(vocab, elem))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"><g id="l" inkscape:groupmode="layer" inkscape:label="Base"><rect/></g></svg>"#;

    #[test]
    fn test_marker_shape() {
        let doc = Document::parse(SRC).unwrap();
        let marker = marker_element(doc.vocab(), Translate { x: 10.0, y: -3.5 });
        assert_eq!(marker.name, "path");
        assert_eq!(marker.attr("d"), Some("M -9,5.5 L -9,5.5"));
        assert_eq!(marker.attr("inkscape:label"), Some(MARKER_LABEL));
        assert_eq!(marker.attr("style"), Some(MARKER_STYLE));
    }

    #[test]
    fn test_insert_then_remove_restores_document() {
        let mut doc = Document::parse(SRC).unwrap();
        let original = doc.clone();
        let vocab = doc.vocab().clone();

        let layer = doc.element_mut(&[0]).unwrap();
        insert_marker(layer, &vocab, Translate::default());
        assert_eq!(count_markers(&doc), 1);

        assert_eq!(remove_markers(&mut doc), 1);
        assert_eq!(count_markers(&doc), 0);
        assert_eq!(doc, original);
    }

    #[test]
    fn test_only_labelled_paths_are_markers() {
        let doc = Document::parse(
            r#"<svg xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"><path inkscape:label="outline"/><rect inkscape:label="temp_for_stencil_export"/></svg>"#,
        )
        .unwrap();
        assert_eq!(count_markers(&doc), 0);
    }
}
