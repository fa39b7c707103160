//! Command-line interface module.

mod args;
pub mod export;
pub mod layers;

pub use args::Cli;
