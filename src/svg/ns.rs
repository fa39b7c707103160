//! Namespace vocabulary for Inkscape documents.
//!
//! Inkscape binds its extension attributes to `inkscape:` and `sodipodi:`
//! prefixes on the root element. The prefixes are resolved once per document
//! so lookups work even if a file binds the namespaces to other names.

use super::dom::Element;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";
pub const SODIPODI_NS: &str = "http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd";

/// Label given to the temporary lock marker paths.
pub const MARKER_LABEL: &str = "temp_for_stencil_export";

/// Qualified attribute/element names resolved against a document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    /// Prefixes bound to the SVG namespace (`""` for the default namespace).
    svg_prefixes: Vec<String>,
    pub label: String,
    pub groupmode: String,
    pub insensitive: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::with_prefixes(vec![String::new()], "inkscape", "sodipodi")
    }
}

impl Vocabulary {
    fn with_prefixes(svg_prefixes: Vec<String>, inkscape: &str, sodipodi: &str) -> Self {
        Self {
            svg_prefixes,
            label: format!("{inkscape}:label"),
            groupmode: format!("{inkscape}:groupmode"),
            insensitive: format!("{sodipodi}:insensitive"),
        }
    }

    /// Resolve prefixes from the `xmlns` declarations of `root`.
    pub fn from_root(root: &Element) -> Self {
        let mut svg_prefixes = Vec::new();
        let mut inkscape = None;
        let mut sodipodi = None;

        for (key, value) in root.attrs() {
            let prefix = if key == "xmlns" {
                ""
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                prefix
            } else {
                continue;
            };
            match value {
                SVG_NS => svg_prefixes.push(prefix.to_string()),
                INKSCAPE_NS if !prefix.is_empty() => inkscape = Some(prefix),
                SODIPODI_NS if !prefix.is_empty() => sodipodi = Some(prefix),
                _ => {}
            }
        }

        // Documents without an explicit binding are treated as plain SVG.
        if svg_prefixes.is_empty() {
            svg_prefixes.push(String::new());
        }
        // The root may be `svg:svg`; accept its own prefix as well.
        if let Some((prefix, _)) = root.name.split_once(':')
            && !svg_prefixes.iter().any(|p| p == prefix)
            && root.local_name() == "svg"
        {
            svg_prefixes.push(prefix.to_string());
        }

        Self::with_prefixes(
            svg_prefixes,
            inkscape.unwrap_or("inkscape"),
            sodipodi.unwrap_or("sodipodi"),
        )
    }

    /// Whether `elem` is the SVG element `local`.
    pub fn is_svg(&self, elem: &Element, local: &str) -> bool {
        elem.local_name() == local && self.svg_prefixes.iter().any(|p| p == elem.prefix())
    }

    /// Qualified name to use when creating an SVG element.
    pub fn svg_name(&self, local: &str) -> String {
        match self.svg_prefixes.first().map(String::as_str) {
            Some("") | None => local.to_string(),
            Some(prefix) => format!("{prefix}:{local}"),
        }
    }

    /// Whether `elem` is an Inkscape layer group.
    pub fn is_layer(&self, elem: &Element) -> bool {
        self.is_svg(elem, "g") && elem.attr(&self.groupmode) == Some("layer")
    }
}
