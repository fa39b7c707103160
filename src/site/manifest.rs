//! JSON manifests describing the exported stencil.

use serde::{Serialize, Serializer};

use crate::config::StencilSection;
use crate::svg::transform::round2;
use crate::svg::{BBox, Layer, LayerKind};

/// Generator string recorded in `stencil-meta.json`.
pub const GENERATOR: &str = concat!("SVG Stencil Export ", env!("CARGO_PKG_VERSION"));

/// Placement of one exported file, in document coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentRecord {
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl ComponentRecord {
    /// `bbox` is in the layer's own coordinates; the record adds the layer offset.
    pub fn new(layer: &Layer, bbox: BBox) -> Self {
        let offset = layer.translate;
        let placed = bbox.rounded().translated(offset);
        Self {
            kind: layer.kind,
            top: round2(placed.top),
            bottom: round2(placed.bottom),
            left: round2(placed.left),
            right: round2(placed.right),
            translate_x: offset.x,
            translate_y: offset.y,
        }
    }
}

/// `stencil-components.json`: file names in export order plus their records.
#[derive(Debug, Default, Serialize)]
pub struct Manifest {
    components: Vec<String>,
    #[serde(serialize_with = "serialize_records")]
    components_data: Vec<(String, ComponentRecord)>,
}

impl Manifest {
    pub fn push(&mut self, file_name: String, record: ComponentRecord) {
        self.components.push(file_name.clone());
        self.components_data.push((file_name, record));
    }

    /// File names, in export order.
    pub fn names(&self) -> &[String] {
        &self.components
    }

}

fn serialize_records<S: Serializer>(
    records: &Vec<(String, ComponentRecord)>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(records.iter().map(|(name, record)| (name, record)))
}

/// `stencil-meta.json`.
#[derive(Debug, Serialize)]
pub struct Meta<'a> {
    pub name: &'a str,
    pub author: &'a str,
    pub description: &'a str,
    pub homepage: &'a str,
    pub generator: &'a str,
    pub license: &'a str,
}

impl<'a> Meta<'a> {
    pub fn new(stencil: &'a StencilSection) -> Self {
        Self {
            name: &stencil.name,
            author: &stencil.author,
            description: &stencil.description,
            homepage: &stencil.homepage,
            generator: GENERATOR,
            license: &stencil.license_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::transform::Translate;
    use serde_json::Value;

    fn layer(kind: LayerKind, translate: Translate) -> Layer {
        Layer {
            id: "l".to_string(),
            label: "L".to_string(),
            kind,
            parents: Vec::new(),
            translate,
            path: Vec::new(),
        }
    }

    #[test]
    fn test_record_adds_offset() {
        let l = layer(LayerKind::Locked, Translate { x: 0.1, y: -5.0 });
        let record = ComponentRecord::new(&l, BBox::from_edges(0.2, 10.0, 20.004, 30.0));
        assert_eq!(record.kind, LayerKind::Locked);
        assert_eq!(record.left, 0.3);
        assert_eq!(record.right, 20.1);
        assert_eq!(record.top, 5.0);
        assert_eq!(record.bottom, 25.0);
        assert_eq!(record.translate_x, 0.1);
        assert_eq!(record.translate_y, -5.0);
    }

    #[test]
    fn test_manifest_json_shape() {
        let mut manifest = Manifest::default();
        let top = layer(LayerKind::Component, Translate::default());
        let base = layer(LayerKind::Locked, Translate::default());
        manifest.push("2_B.svg".to_string(), ComponentRecord::new(&top, BBox::default()));
        manifest.push("10_A.svg".to_string(), ComponentRecord::new(&base, BBox::default()));

        let json: Value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["components"], serde_json::json!(["2_B.svg", "10_A.svg"]));

        let data = json["components_data"].as_object().unwrap();
        let names: Vec<_> = data.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["2_B.svg", "10_A.svg"]);
        assert_eq!(data["10_A.svg"]["type"], "locked");

        let fields: Vec<_> = data["2_B.svg"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            fields,
            vec!["type", "top", "bottom", "left", "right", "translate_x", "translate_y"]
        );
    }

    #[test]
    fn test_meta_fields() {
        let stencil = StencilSection {
            license_url: "https://example.org/l".to_string(),
            ..StencilSection::default()
        };
        let json = serde_json::to_value(Meta::new(&stencil)).unwrap();
        assert_eq!(json["name"], "no-name");
        assert_eq!(json["license"], "https://example.org/l");
        assert!(json["generator"].as_str().unwrap().starts_with("SVG Stencil Export "));
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["name", "author", "description", "homepage", "generator", "license"]
        );
    }
}
