//! `--list-layers`: print the layers an export would produce.

use anyhow::Result;

use crate::svg::Document;
use crate::svg::layer::scan_layers;

/// Render the layer list as pretty JSON, without modifying the document.
pub fn layers_json(doc: &Document) -> Result<String> {
    let layers = scan_layers(doc)?;
    Ok(serde_json::to_string_pretty(&layers)?)
}

pub fn list_layers(doc: &Document) -> Result<()> {
    println!("{}", layers_json(doc)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_layers_json() {
        let doc = Document::parse(
            r#"<svg xmlns="http://www.w3.org/2000/svg"
                xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape"
                xmlns:sodipodi="http://sodipodi.sourceforge.net/DTD/sodipodi-0.dtd">
              <g inkscape:groupmode="layer" id="a" inkscape:label="Outer" transform="translate(1,2)">
                <g inkscape:groupmode="layer" id="b" inkscape:label="Inner" sodipodi:insensitive="true"/>
              </g>
            </svg>"#,
        )
        .unwrap();
        let before = doc.clone();

        let json: Value = serde_json::from_str(&layers_json(&doc).unwrap()).unwrap();
        assert_eq!(json[0]["label"], "Outer");
        assert_eq!(json[0]["type"], "component");
        assert_eq!(json[0]["translate"]["x"], 1.0);
        assert_eq!(json[1]["type"], "locked");
        assert_eq!(json[1]["parents"], serde_json::json!(["a"]));
        // listing never inserts markers
        assert_eq!(doc, before);
    }
}
