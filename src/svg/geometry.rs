//! Node bounding boxes.
//!
//! Shapes are measured by rendering-tree construction with `usvg`: the node
//! is placed alone in a minimal document that carries the source root's
//! namespace bindings, `<defs>` and `<style>`, and the tree's geometric box
//! is read back. The box includes the node's own `transform` but not its
//! ancestors', so it is expressed in the layer's coordinate space.
//!
//! `usvg` is built without text support, so text uses a point-and-segment
//! estimate instead: the text anchor plus, for every span, a vertical
//! segment one font size tall. Text below the measured node is swapped for
//! a path tracing those segments before the node reaches `usvg`.

use usvg::{Group, Node, Options, Tree};

use super::bbox::{BBox, accumulate, merge};
use super::dom::{Document, Element};
use super::marker::is_marker;
use super::ns::{SVG_NS, Vocabulary, XLINK_NS};
use super::text::{is_text, is_tspan};
use super::transform::parse_number;
use crate::debug;

/// Font size assumed for spans without one.
const DEFAULT_FONT_SIZE: f64 = 12.0;

/// Resolves bounding boxes for nodes of one document.
pub struct GeometryContext {
    /// Root copy holding only namespace declarations, defs and styles.
    shell: Element,
    vocab: Vocabulary,
    options: Options<'static>,
}

impl GeometryContext {
    pub fn new(doc: &Document) -> Self {
        let vocab = doc.vocab().clone();
        let root = doc.root();

        let mut shell = Element::new(root.name.clone());
        for (key, value) in root.attrs() {
            if key == "xmlns" || key.starts_with("xmlns:") {
                shell.set_attr(key, value);
            }
        }
        if !root.name.contains(':') {
            shell.set_attr("xmlns", SVG_NS);
        }
        if !shell.has_attr("xmlns:xlink") {
            shell.set_attr("xmlns:xlink", XLINK_NS);
        }
        for child in root.child_elements() {
            if vocab.is_svg(child, "defs") || vocab.is_svg(child, "style") {
                shell.push(child.clone());
            }
        }

        Self {
            shell,
            vocab,
            options: Options::default(),
        }
    }

    /// Bounding box of `node`, or `None` when it has no resolvable geometry.
    pub fn shape_box(&self, node: &Element) -> Option<BBox> {
        if is_marker(&self.vocab, node) {
            return marker_point(node);
        }
        if is_text(&self.vocab, node) {
            return self.text_box(node);
        }
        self.rendered_box(node)
    }

    /// Union of the boxes of `parent`'s direct children.
    pub fn children_box(&self, parent: &Element) -> Option<BBox> {
        accumulate(parent.child_elements().map(|child| self.shape_box(child)))
    }

    fn rendered_box(&self, node: &Element) -> Option<BBox> {
        let mut doc = self.shell.clone();
        doc.push(self.with_text_proxies(node));

        let source = match doc.to_xml() {
            Ok(source) => source,
            Err(e) => {
                debug!("geometry"; "cannot serialize <{}>: {}", node.name, e);
                return None;
            }
        };
        let tree = match Tree::from_str(&source, &self.options) {
            Ok(tree) => tree,
            Err(e) => {
                debug!("geometry"; "cannot resolve <{}>: {}", node.name, e);
                return None;
            }
        };

        // Groups survive in the tree even when nothing inside them renders,
        // so only leaves count.
        let mut bounds = None;
        leaf_bounds(tree.root(), &mut bounds);
        bounds
    }

    fn text_box(&self, text: &Element) -> Option<BBox> {
        if text.has_attr("transform") {
            return self.rendered_box(text);
        }
        let boxes = text_segments(text, &self.vocab)
            .into_iter()
            .map(|(x, y, h)| Some(BBox::from_edges(x, y, x, y + h)));
        accumulate(boxes)
    }

    /// Copy of `node` with every text element swapped for its proxy path.
    fn with_text_proxies(&self, node: &Element) -> Element {
        if is_text(&self.vocab, node) {
            return self.text_proxy(node);
        }
        let mut copy = node.clone();
        self.replace_text(&mut copy);
        copy
    }

    fn replace_text(&self, elem: &mut Element) {
        for child in elem.child_elements_mut() {
            if is_text(&self.vocab, child) {
                let proxy = self.text_proxy(child);
                *child = proxy;
            } else {
                self.replace_text(child);
            }
        }
    }

    /// An outline usvg can measure in place of text: one stroke per segment,
    /// carrying the text's own transform.
    fn text_proxy(&self, text: &Element) -> Element {
        let d = text_segments(text, &self.vocab)
            .iter()
            .map(|(x, y, h)| format!("M {x},{y} L {x},{}", y + h))
            .collect::<Vec<_>>()
            .join(" ");
        let mut proxy = Element::new(self.vocab.svg_name("path"))
            .with_attr("d", d)
            .with_attr("fill", "none")
            .with_attr("stroke", "#000");
        if let Some(transform) = text.attr("transform") {
            proxy.set_attr("transform", transform);
        }
        proxy
    }
}

/// Union of the boxes of every non-group node under `group`.
fn leaf_bounds(group: &Group, bounds: &mut Option<BBox>) {
    for node in group.children() {
        match node {
            Node::Group(nested) => leaf_bounds(nested, bounds),
            leaf => *bounds = merge(*bounds, BBox::from_rect(leaf.abs_bounding_box())),
        }
    }
}

/// Anchor point and span segments `(x, y, height)` of a text element.
fn text_segments(text: &Element, vocab: &Vocabulary) -> Vec<(f64, f64, f64)> {
    let mut segments = vec![(coord(text, "x"), coord(text, "y"), 0.0)];
    segments.extend(
        text.descendants()
            .filter(|elem| is_tspan(vocab, elem))
            .map(|span| (coord(span, "x"), coord(span, "y"), span_font_size(span))),
    );
    segments
}

/// First value of a coordinate list attribute, `0` when absent or unreadable.
fn coord(elem: &Element, attr: &str) -> f64 {
    elem.attr(attr)
        .and_then(|value| value.split([' ', ',']).find(|s| !s.is_empty()))
        .and_then(|first| parse_number(first).ok())
        .unwrap_or(0.0)
}

fn span_font_size(span: &Element) -> f64 {
    span.attr("style")
        .and_then(|style| {
            style.split(';').find_map(|decl| {
                let (key, value) = decl.split_once(':')?;
                (key.trim() == "font-size").then_some(value)
            })
        })
        .and_then(|value| parse_number(value).ok())
        .unwrap_or(DEFAULT_FONT_SIZE)
}

/// Markers are a single point; read it straight from the path data.
fn marker_point(marker: &Element) -> Option<BBox> {
    let d = marker.attr("d")?;
    let point = d.trim_start_matches('M').split('L').next()?;
    let (x, y) = point.split_once(',')?;
    let x = parse_number(x).ok()?;
    let y = parse_number(y).ok()?;
    Some(BBox::from_edges(x, y, x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::marker::marker_element;
    use crate::svg::transform::Translate;

    fn context(body: &str) -> (Document, GeometryContext) {
        let doc = Document::parse(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 10 10">{body}</svg>"#
        ))
        .unwrap();
        let ctx = GeometryContext::new(&doc);
        (doc, ctx)
    }

    fn last_child(doc: &Document) -> &Element {
        doc.root().child_elements().last().unwrap()
    }

    #[test]
    fn test_rect_box_ignores_document_viewbox() {
        let (doc, ctx) = context(r#"<rect x="10" y="20" width="30" height="40"/>"#);
        assert_eq!(
            ctx.shape_box(last_child(&doc)),
            Some(BBox::from_edges(10.0, 20.0, 40.0, 60.0))
        );
    }

    #[test]
    fn test_own_transform_is_applied() {
        let (doc, ctx) = context(
            r#"<g transform="translate(5,5)"><rect x="0" y="0" width="10" height="10"/></g>"#,
        );
        assert_eq!(
            ctx.shape_box(last_child(&doc)),
            Some(BBox::from_edges(5.0, 5.0, 15.0, 15.0))
        );
    }

    #[test]
    fn test_empty_group_has_no_box() {
        let (doc, ctx) = context(r#"<g/>"#);
        assert_eq!(ctx.shape_box(last_child(&doc)), None);
    }

    #[test]
    fn test_group_with_id_and_nothing_to_render() {
        let (doc, ctx) = context(r#"<g id="g7"><g id="g8"/></g>"#);
        assert_eq!(ctx.shape_box(last_child(&doc)), None);
    }

    #[test]
    fn test_empty_sibling_group_does_not_pull_box_to_origin() {
        let (doc, ctx) = context(
            r#"<g><rect x="50" y="50" width="10" height="10"/><g id="empty"/></g>"#,
        );
        assert_eq!(
            ctx.children_box(last_child(&doc)),
            Some(BBox::from_edges(50.0, 50.0, 60.0, 60.0))
        );
    }

    #[test]
    fn test_text_inside_group() {
        let (doc, ctx) = context(
            r#"<g id="g1"><text x="10" y="20"><tspan x="10" y="20">A</tspan></text></g>"#,
        );
        assert_eq!(
            ctx.shape_box(last_child(&doc)),
            Some(BBox::from_edges(10.0, 20.0, 10.0, 32.0))
        );
    }

    #[test]
    fn test_grouped_label_next_to_shape() {
        let (doc, ctx) = context(
            r#"<g><rect x="50" y="50" width="10" height="10"/>
               <g id="g1" transform="translate(5,5)"><text x="50" y="65"><tspan x="50" y="65">A</tspan></text></g></g>"#,
        );
        assert_eq!(
            ctx.children_box(last_child(&doc)),
            Some(BBox::from_edges(50.0, 50.0, 60.0, 82.0))
        );
    }

    #[test]
    fn test_transformed_text() {
        let (doc, ctx) = context(
            r#"<text x="1" y="2" transform="translate(10,10)"><tspan x="1" y="2">A</tspan></text>"#,
        );
        assert_eq!(
            ctx.shape_box(last_child(&doc)),
            Some(BBox::from_edges(11.0, 12.0, 11.0, 24.0))
        );
    }

    #[test]
    fn test_defs_are_available() {
        let (doc, ctx) = context(
            r##"<defs><rect id="proto" width="4" height="2"/></defs><use xlink:href="#proto" x="1" y="1"/>"##,
        );
        assert_eq!(
            ctx.shape_box(last_child(&doc)),
            Some(BBox::from_edges(1.0, 1.0, 5.0, 3.0))
        );
    }

    #[test]
    fn test_text_estimate() {
        let (doc, ctx) = context(
            r#"<text x="10" y="20"><tspan x="10" y="20" style="font-size:8px">A</tspan><tspan x="12 18" y="30">B</tspan></text>"#,
        );
        assert_eq!(
            ctx.shape_box(last_child(&doc)),
            Some(BBox::from_edges(10.0, 20.0, 12.0, 42.0))
        );
    }

    #[test]
    fn test_marker_is_its_anchor_point() {
        let doc = Document::parse(r#"<svg/>"#).unwrap();
        let ctx = GeometryContext::new(&doc);
        let marker = marker_element(doc.vocab(), Translate { x: 3.0, y: -1.0 });
        assert_eq!(
            ctx.shape_box(&marker),
            Some(BBox::from_edges(-2.0, 3.0, -2.0, 3.0))
        );
    }

    #[test]
    fn test_children_box_skips_empty() {
        let (doc, ctx) = context(
            r#"<g><g/><rect x="1" y="1" width="1" height="1"/><rect x="4" y="0" width="1" height="1"/></g>"#,
        );
        assert_eq!(
            ctx.children_box(last_child(&doc)),
            Some(BBox::from_edges(1.0, 0.0, 5.0, 2.0))
        );
    }
}
