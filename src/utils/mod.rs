//! Utility modules for the stencil exporter.

pub mod html;
pub mod path;
pub mod scratch;
