//! The export pipeline.
//!
//! ```text
//! enumerate layers (mark locked ones)
//!     │
//!     ▼  for each layer, in document order
//! isolate ─► record component ─► export unless up to date
//!     │
//!     ▼
//! remove markers ─► manifests / site files
//! ```
//!
//! Layers are numbered in enumeration order; a layer dropped by isolation
//! still consumes its number.

use anyhow::{Context, Result};
use std::{fmt, fs, path::PathBuf};

use crate::config::{LOG_FILE, StencilConfig};
use crate::exporter::Exporter;
use crate::logger::{self, ProgressLine};
use crate::site::{ComponentRecord, Manifest, write_site};
use crate::svg::{Document, Layer, LayerKind, enumerate_layers, isolate_layer, remove_markers};
use crate::utils::path::file_component;
use crate::{debug, log};


/// Outcome of one run.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub manifest: Manifest,
    /// Layers handed to the exporter.
    pub exported: usize,
    /// Layers whose output already existed.
    pub up_to_date: usize,
    /// Layers dropped by isolation (empty or missing).
    pub skipped: usize,
    pub markers_inserted: usize,
    pub markers_removed: usize,
    pub site_files: Vec<PathBuf>,
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} exported, {} up to date, {} skipped",
            self.exported, self.up_to_date, self.skipped
        )
    }
}

/// Export every layer of `doc` and write the enabled site files.
///
/// Lock markers are inserted into `doc` for the duration of the run and
/// removed again before returning, whether or not the run succeeded.
pub fn run_export(
    config: &StencilConfig,
    doc: &mut Document,
    exporter: &mut dyn Exporter,
) -> Result<ExportReport> {
    let out_dir = config.output_dir();
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    if config.export.use_logging {
        let path = config.output_join(LOG_FILE);
        logger::open_log_file(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
    }

    let result = run(config, doc, exporter);

    if config.export.use_logging {
        logger::close_log_file();
    }
    result
}

fn run(
    config: &StencilConfig,
    doc: &mut Document,
    exporter: &mut dyn Exporter,
) -> Result<ExportReport> {
    debug!("export"; "stencil name: {}", config.stencil.name);
    debug!("export"; "current file: {}", config.input.display());
    if let Some(path) = &config.config_path {
        debug!("export"; "config file: {}", path.display());
    }
    debug!("export"; "path: {}", config.output_dir().display());
    debug!("export"; "overwrite files: {}", config.export.overwrite_files);

    let layers = enumerate_layers(doc)?;
    let mut report = ExportReport {
        markers_inserted: layers
            .iter()
            .filter(|layer| layer.kind == LayerKind::Locked)
            .count(),
        ..ExportReport::default()
    };

    let layers_result = export_layers(config, doc, &layers, exporter, &mut report);
    report.markers_removed = remove_markers(doc);
    debug!("export"; "removed {} marker(s)", report.markers_removed);
    layers_result?;

    report.site_files = write_site(config, &report.manifest)?;
    debug!("export"; "stencil export finished");
    Ok(report)
}

fn export_layers(
    config: &StencilConfig,
    doc: &Document,
    layers: &[Layer],
    exporter: &mut dyn Exporter,
    report: &mut ExportReport,
) -> Result<()> {
    if layers.is_empty() {
        log!("export"; "no visible layers in {}", config.input.display());
        return Ok(());
    }

    let progress = ProgressLine::new("layers", layers.len());
    for (index, layer) in layers.iter().enumerate() {
        progress.inc();

        let file_name = format!("{}_{}.svg", index + 1, file_component(&layer.label));
        debug!("export"; "file name: {}", file_name);

        let isolated = match isolate_layer(doc, &layer.id) {
            Ok(isolated) => isolated,
            Err(e) if e.is_recoverable() => {
                debug!("export"; "skip [{}]: {}", layer.label, e);
                report.skipped += 1;
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to isolate layer [{}]", layer.label));
            }
        };

        report
            .manifest
            .push(file_name.clone(), ComponentRecord::new(layer, isolated.bbox));

        let destination = config.output_join(&file_name);
        if !config.export.overwrite_files && destination.exists() {
            debug!("export"; "file already exists: {}", file_name);
            report.up_to_date += 1;
            continue;
        }

        debug!("export"; "exporting [{}] as {}", layer.label, file_name);
        exporter
            .export(isolated.scratch.path(), &destination)
            .with_context(|| format!("Failed to export layer [{}]", layer.label))?;
        report.exported += 1;
    }
    progress.finish();
    Ok(())
}
