//! SVG document model and the per-layer export core.
//!
//! # Modules
//!
//! - [`dom`]: owned XML tree (parse / query / mutate / write)
//! - [`ns`]: Inkscape namespace vocabulary
//! - [`layer`]: layer enumeration
//! - [`marker`]: temporary anchor markers for locked layers
//! - [`isolate`]: per-layer pruned copies and their scratch files
//! - [`text`]: text bounding-box repair
//! - [`geometry`]: node bounding boxes via usvg
//! - [`bbox`]: bounding-box fold
//! - [`transform`]: translate offsets and coordinate rounding
//!
//! # Architecture
//!
//! ```text
//! source.svg
//!     │
//!     ▼
//! ┌───────┐
//! │ layer │ ──► Layer records (+ lock markers)
//! └───┬───┘
//!     │  one per layer
//!     ▼
//! ┌─────────┐
//! │ isolate │ ──► text repair ─► geometry ─► bbox fold
//! └───┬─────┘
//!     │
//!     ▼
//! scratch file + BBox ──► exporter
//! ```

pub mod bbox;
pub mod dom;
pub mod geometry;
pub mod isolate;
pub mod layer;
pub mod marker;
pub mod ns;
pub mod text;
pub mod transform;

use std::fmt::Display;
use thiserror::Error;

pub use bbox::BBox;
pub use dom::{Document, Element};
pub use isolate::isolate_layer;
pub use layer::{Layer, LayerKind, enumerate_layers};
pub use marker::remove_markers;

/// Errors raised while reading or rewriting a document.
///
/// These mark malformed input and abort the run.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("XML error at byte {position}: {message}")]
    Xml { position: u64, message: String },

    #[error("Failed to write XML: {0}")]
    Write(String),

    #[error("Malformed transform `{0}`: expected `translate(x,y)`")]
    MalformedTransform(String),

    #[error("Malformed number `{0}`")]
    MalformedNumber(String),

    #[error("<{element}> is missing the `{attr}` attribute")]
    MissingAttribute { element: String, attr: String },
}

impl SvgError {
    pub(crate) fn xml(position: u64, message: impl Display) -> Self {
        Self::Xml {
            position,
            message: message.to_string(),
        }
    }

    pub(crate) fn write(err: impl Display) -> Self {
        Self::Write(err.to_string())
    }

    pub(crate) fn missing(element: &Element, attr: &str) -> Self {
        let id = element.attr("id").map(|id| format!(" id={id}")).unwrap_or_default();
        Self::MissingAttribute {
            element: format!("{}{id}", element.name),
            attr: attr.to_string(),
        }
    }
}
