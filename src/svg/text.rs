//! Text bounding-box repair.
//!
//! Inkscape computes text boxes from the `x`/`y` of the `<text>` element and
//! its spans, which drift apart after editing. Before a layer is measured,
//! each text child gets the position of its spans copied onto it, and a
//! single-span text has its span moved up by the font size so the box
//! starts at the top of the glyphs instead of the baseline.

use super::SvgError;
use super::dom::Element;
use super::ns::Vocabulary;
use super::transform::{format_coord, parse_number, round2};
use crate::debug;

pub fn is_text(vocab: &Vocabulary, elem: &Element) -> bool {
    vocab.is_svg(elem, "text")
}

pub fn is_tspan(vocab: &Vocabulary, elem: &Element) -> bool {
    vocab.is_svg(elem, "tspan")
}

/// Repair a text element in place.
///
/// Spans are searched among the element's own descendants. The last span in
/// document order determines the element's final `x`/`y`.
pub fn repair_text(text: &mut Element, vocab: &Vocabulary) -> Result<(), SvgError> {
    let spans = text
        .descendants()
        .filter(|elem| is_tspan(vocab, elem))
        .map(|span| {
            let x = span.attr("x").ok_or_else(|| SvgError::missing(span, "x"))?;
            let y = span.attr("y").ok_or_else(|| SvgError::missing(span, "y"))?;
            Ok((x.to_string(), y.to_string()))
        })
        .collect::<Result<Vec<_>, SvgError>>()?;

    for (x, y) in &spans {
        if !text.has_attr("x") || !text.has_attr("y") {
            debug!("text"; "repairing missing text x,y");
        } else if text.attr("x") != Some(x.as_str()) || text.attr("y") != Some(y.as_str()) {
            debug!("text"; "repairing text x,y, not equal to tspan x,y");
        }
        text.set_attr("x", x.as_str());
        text.set_attr("y", y.as_str());
    }

    if text.element_count() == 1 {
        shift_first_span(text, vocab)?;
    }
    Ok(())
}

/// Move the first span up by the element's font size.
fn shift_first_span(text: &mut Element, vocab: &Vocabulary) -> Result<(), SvgError> {
    let font_size = round2(font_size(text)?);

    let spans = text.descendants_mut_where(&|elem| is_tspan(vocab, elem));
    let Some(span) = spans.into_iter().next() else {
        return Ok(());
    };

    let Some(y) = span.attr("y") else {
        return Err(SvgError::missing(span, "y"));
    };
    let shifted = round2(parse_number(y)?) - font_size;
    span.set_attr("y", format_coord(shifted));
    Ok(())
}

/// Font size of a text element: `font-size` attribute, then inline style, then 0.
pub fn font_size(text: &Element) -> Result<f64, SvgError> {
    if let Some(size) = text.attr("font-size") {
        debug!("text"; "font size in attribute: {}", size);
        return parse_number(&size.replace("px", ""));
    }

    if let Some(style) = text.attr("style")
        && let Some((_, rest)) = style.split_once("font-size")
    {
        let value = rest.split(';').next().unwrap_or_default();
        let value = value.replace(':', "").replace("px", "");
        debug!("text"; "font size in style: {}", value);
        return parse_number(&value);
    }

    Ok(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::dom::Document;

    fn repaired(src: &str) -> Element {
        let doc = Document::parse(src).unwrap();
        let mut text = doc.root().child_elements().next().unwrap().clone();
        repair_text(&mut text, doc.vocab()).unwrap();
        text
    }

    #[test]
    fn test_single_span_shifted_by_attribute_font_size() {
        let text = repaired(
            r#"<svg><text x="0" y="0" font-size="10px"><tspan x="5" y="30">Hi</tspan></text></svg>"#,
        );
        assert_eq!(text.attr("x"), Some("5"));
        assert_eq!(text.attr("y"), Some("30"));
        let span = text.child_elements().next().unwrap();
        assert_eq!(span.attr("y"), Some("20"));
    }

    #[test]
    fn test_font_size_from_style() {
        let text = repaired(
            r#"<svg><text style="fill:#000;font-size:12.5px;font-family:sans"><tspan x="1" y="20">A</tspan></text></svg>"#,
        );
        let span = text.child_elements().next().unwrap();
        assert_eq!(span.attr("y"), Some("7.5"));
        // missing x/y were filled in from the span
        assert_eq!(text.attr("x"), Some("1"));
        assert_eq!(text.attr("y"), Some("20"));
    }

    #[test]
    fn test_font_size_defaults_to_zero() {
        let text = repaired(r#"<svg><text><tspan x="1" y="20">A</tspan></text></svg>"#);
        let span = text.child_elements().next().unwrap();
        assert_eq!(span.attr("y"), Some("20"));
    }

    #[test]
    fn test_multiple_spans_not_shifted_last_wins() {
        let text = repaired(
            r#"<svg><text font-size="8"><tspan x="1" y="10">A</tspan><tspan x="2" y="20">B</tspan></text></svg>"#,
        );
        assert_eq!(text.attr("x"), Some("2"));
        assert_eq!(text.attr("y"), Some("20"));
        let ys: Vec<_> = text.child_elements().map(|s| s.attr("y").unwrap()).collect();
        assert_eq!(ys, vec!["10", "20"]);
    }

    #[test]
    fn test_nested_span_only_first_shifted() {
        let text = repaired(
            r#"<svg><text font-size="4"><tspan x="1" y="10">A<tspan x="3" y="10">b</tspan></tspan></text></svg>"#,
        );
        let outer = text.child_elements().next().unwrap();
        let inner = outer.child_elements().next().unwrap();
        assert_eq!(outer.attr("y"), Some("6"));
        assert_eq!(inner.attr("y"), Some("10"));
        assert_eq!(text.attr("x"), Some("3"));
    }

    #[test]
    fn test_span_without_coordinates_is_malformed() {
        let doc = Document::parse(r#"<svg><text><tspan>A</tspan></text></svg>"#).unwrap();
        let mut text = doc.root().child_elements().next().unwrap().clone();
        assert!(matches!(
            repair_text(&mut text, doc.vocab()),
            Err(SvgError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn test_text_without_spans_untouched() {
        let text = repaired(r#"<svg><text x="4" y="5">plain</text></svg>"#);
        assert_eq!(text.attr("x"), Some("4"));
        assert_eq!(text.attr("y"), Some("5"));
    }
}
