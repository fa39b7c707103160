//! svg-stencil-export - Export every Inkscape layer of a drawing as a stencil component.

mod cli;
mod config;
mod embed;
mod exporter;
mod logger;
mod site;
mod svg;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, export::run_export, layers::list_layers};
use config::StencilConfig;
use exporter::InkscapeExporter;
use svg::Document;

fn main() {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    if let Err(e) = run(&cli) {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = StencilConfig::load(cli)?;
    let mut doc = Document::from_file(&config.input)?;

    if cli.list_layers {
        return list_layers(&doc);
    }

    let mut exporter = InkscapeExporter::new(config.export.command.clone(), config.export.timeout());
    let report = run_export(&config, &mut doc, &mut exporter)?;
    for path in &report.site_files {
        debug!("site"; "wrote {}", path.display());
    }
    log!("done"; "{}, {} component(s) recorded", report, report.manifest.names().len());
    Ok(())
}
