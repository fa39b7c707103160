//! Command-line interface definitions.
//!
//! Flag names follow the Inkscape extension descriptor, which passes every
//! value as `--name=value`. Toggles take `true`/`false` (case-insensitive,
//! anything but `true` is false); a bare toggle means `true`.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

use crate::config::parse_toggle;

/// Export every Inkscape layer of a drawing as a stencil component
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Inkscape SVG document to export
    #[arg(value_name = "INPUT", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: stencil.toml beside INPUT or in the current directory)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Stencil name
    #[arg(long)]
    pub stencil_name: Option<String>,

    /// Stencil homepage URL
    #[arg(long)]
    pub stencil_homepage: Option<String>,

    /// Stencil author
    #[arg(long)]
    pub stencil_author: Option<String>,

    /// Stencil description (`\n` starts a new line)
    #[arg(long)]
    pub stencil_description: Option<String>,

    /// Stencil license URL
    #[arg(long)]
    pub stencil_license_url: Option<String>,

    /// Output directory
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub path: Option<PathBuf>,

    /// Re-export files that already exist
    #[arg(long, action = clap::ArgAction::Set, value_parser = parse_toggle, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub overwrite_files: Option<bool>,

    /// Write svg_stencil_export.log into the output directory
    #[arg(long, action = clap::ArgAction::Set, value_parser = parse_toggle, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub use_logging: Option<bool>,

    /// Write stencil-meta.json
    #[arg(long, action = clap::ArgAction::Set, value_parser = parse_toggle, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub write_meta: Option<bool>,

    /// Write stencil-components.json
    #[arg(long, action = clap::ArgAction::Set, value_parser = parse_toggle, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub write_components: Option<bool>,

    /// Write a GitHub Pages workflow
    #[arg(long, action = clap::ArgAction::Set, value_parser = parse_toggle, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub create_github_action: Option<bool>,

    /// Write a GitLab Pages pipeline
    #[arg(long, action = clap::ArgAction::Set, value_parser = parse_toggle, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub create_gitlab_action: Option<bool>,

    /// Write index.html with a preview of every component
    #[arg(long, action = clap::ArgAction::Set, value_parser = parse_toggle, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub create_cover_page: Option<bool>,

    /// Write readme.md
    #[arg(long, action = clap::ArgAction::Set, value_parser = parse_toggle, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub create_readme: Option<bool>,

    /// Exporter command, whitespace separated (destination and source are appended)
    #[arg(long, value_name = "COMMAND")]
    pub exporter: Option<String>,

    /// Seconds a single export may take
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Print the layers found in INPUT as JSON and exit
    #[arg(long)]
    pub list_layers: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Notebook page passed by Inkscape (ignored)
    #[arg(long, hide = true)]
    pub tab: Option<String>,
}
