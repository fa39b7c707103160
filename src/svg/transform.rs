//! Translate offsets and coordinate formatting.
//!
//! Layer offsets are read textually from `translate(x,y)`; every coordinate
//! reported in the manifest is rounded to two decimals.

use serde::Serialize;

use super::SvgError;

/// Translation offset of a layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Translate {
    pub x: f64,
    pub y: f64,
}

/// Parse the offset of a `transform` attribute.
///
/// Only attributes mentioning `translate` carry an offset; anything else is
/// `(0, 0)`. The parse is purely textual: `translate`, `(` and `)` are
/// stripped and the rest is split on `,`, so `translate(10 20)` or a
/// translate combined with other functions is rejected.
pub fn parse_translate(transform: Option<&str>) -> Result<Translate, SvgError> {
    let Some(transform) = transform.filter(|t| t.contains("translate")) else {
        return Ok(Translate::default());
    };

    let stripped = transform
        .replace("translate", "")
        .replace(['(', ')'], "");
    let parts: Vec<&str> = stripped.split(',').collect();
    let [x, y] = parts.as_slice() else {
        return Err(SvgError::MalformedTransform(transform.to_string()));
    };

    let parse = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| SvgError::MalformedTransform(transform.to_string()))
    };
    Ok(Translate {
        x: round2(parse(*x)?),
        y: round2(parse(*y)?),
    })
}

/// Parse a plain number, allowing surrounding whitespace and a `px` suffix.
pub fn parse_number(raw: &str) -> Result<f64, SvgError> {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix("px")
        .unwrap_or(trimmed)
        .trim()
        .parse()
        .map_err(|_| SvgError::MalformedNumber(raw.to_string()))
}

/// Round to two decimals.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a coordinate for an attribute value (`1`, `-0.5`, `12.25`).
pub fn format_coord(value: f64) -> String {
    // Avoid `-0` in written attributes.
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_transform() {
        assert_eq!(parse_translate(None).unwrap(), Translate::default());
        assert_eq!(
            parse_translate(Some("rotate(45)")).unwrap(),
            Translate::default()
        );
    }

    #[test]
    fn test_translate_pair() {
        let t = parse_translate(Some("translate(10,-20.5)")).unwrap();
        assert_eq!(t, Translate { x: 10.0, y: -20.5 });

        let t = parse_translate(Some("translate( 1.005 , 2 )")).unwrap();
        assert_eq!(t.y, 2.0);
    }

    #[test]
    fn test_translate_is_rounded() {
        let t = parse_translate(Some("translate(1.23456,7.891)")).unwrap();
        assert_eq!(t, Translate { x: 1.23, y: 7.89 });
    }

    #[test]
    fn test_malformed_translate() {
        assert!(matches!(
            parse_translate(Some("translate(10 20)")),
            Err(SvgError::MalformedTransform(_))
        ));
        assert!(parse_translate(Some("translate(10)")).is_err());
        assert!(parse_translate(Some("translate(1,2) rotate(4)")).is_err());
        assert!(parse_translate(Some("translate(a,b)")).is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("12px").unwrap(), 12.0);
        assert_eq!(parse_number(" 3.5 ").unwrap(), 3.5);
        assert!(parse_number("large").is_err());
    }

    #[test]
    fn test_round2_and_format() {
        assert_eq!(round2(2.345_67), 2.35);
        assert_eq!(round2(-1.004), -1.0);
        assert_eq!(format_coord(1.0), "1");
        assert_eq!(format_coord(-0.0), "0");
        assert_eq!(format_coord(-9.5), "-9.5");
    }
}
