//! Run configuration: `stencil.toml` layered under command-line flags.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError
//! ├── util       # toggle parsing, config file lookup
//! └── mod.rs     # StencilConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section      | Purpose                                         |
//! |--------------|-------------------------------------------------|
//! | `[stencil]`  | Metadata (name, author, description, license)   |
//! | `[export]`   | Output path, overwrite, logging, exporter       |
//! | `[output]`   | Which manifests and site files are written      |
//!
//! # Example
//!
//! ```toml
//! [stencil]
//! name = "Network icons"
//! author = "Ada"
//!
//! [export]
//! path = "dist"               # relative to this file
//! overwrite_files = true
//! command = ["inkscape", "--export-plain-svg", "--export-type=svg", "--export-area-drawing"]
//! timeout = 120
//!
//! [output]
//! write_components = true
//! create_cover_page = true
//! ```

mod error;
mod util;

pub use error::ConfigError;
pub use util::parse_toggle;

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    cli::Cli,
    debug,
    exporter::{DEFAULT_COMMAND, DEFAULT_TIMEOUT},
    utils::path::{normalize_path, resolve_against},
};
use util::find_config_file;

/// Default config file name.
pub const CONFIG_FILE: &str = "stencil.toml";

/// Run log written into the output directory when logging is enabled.
pub const LOG_FILE: &str = "svg_stencil_export.log";

// ============================================================================
// root configuration
// ============================================================================

/// Immutable configuration for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StencilConfig {
    /// Input document (internal use only)
    #[serde(skip)]
    pub input: PathBuf,

    /// Config file the values were read from, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    pub stencil: StencilSection,
    pub export: ExportSection,
    pub output: OutputSection,
}

/// `[stencil]` metadata written to manifests, README and cover page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StencilSection {
    pub name: String,
    pub homepage: String,
    pub author: String,
    /// May contain literal `\n` sequences.
    pub description: String,
    pub license_url: String,
}

impl Default for StencilSection {
    fn default() -> Self {
        Self {
            name: "no-name".to_string(),
            homepage: String::new(),
            author: String::new(),
            description: String::new(),
            license_url: String::new(),
        }
    }
}

/// `[export]` settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSection {
    /// Output directory; empty means the current directory.
    pub path: PathBuf,
    pub overwrite_files: bool,
    pub use_logging: bool,
    /// Exporter program and fixed arguments.
    pub command: Vec<String>,
    /// Seconds a single export may run.
    pub timeout: u64,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            overwrite_files: false,
            use_logging: false,
            command: DEFAULT_COMMAND.iter().map(|s| s.to_string()).collect(),
            timeout: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ExportSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// `[output]` toggles, all off by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub write_meta: bool,
    pub write_components: bool,
    pub create_github_action: bool,
    pub create_gitlab_action: bool,
    pub create_cover_page: bool,
    pub create_readme: bool,
}

impl StencilConfig {
    /// Load configuration from CLI arguments.
    ///
    /// An explicit `--config` must exist; the default `stencil.toml` is
    /// optional.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let config_path = match &cli.config {
            Some(path) if path.is_file() => Some(normalize_path(path)),
            Some(path) => return Err(ConfigError::NotFound(path.clone())),
            None => find_config_file(Path::new(CONFIG_FILE), &cli.input),
        };

        let mut config = match &config_path {
            Some(path) => {
                debug!("config"; "using {}", path.display());
                Self::from_path(path)?
            }
            None => Self::default(),
        };

        config.input = cli.input.clone();
        config.config_path = config_path;
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a config file, resolving its relative paths against its directory.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config =
            Self::from_str(&content).map_err(|err| ConfigError::Toml(path.to_path_buf(), err))?;

        if !config.export.path.as_os_str().is_empty()
            && let Some(dir) = path.parent()
        {
            config.export.path = resolve_against(dir, &config.export.path);
        }
        Ok(config)
    }

    /// Command-line values win over file values.
    fn apply_cli(&mut self, cli: &Cli) {
        let stencil = &mut self.stencil;
        for (slot, value) in [
            (&mut stencil.name, &cli.stencil_name),
            (&mut stencil.homepage, &cli.stencil_homepage),
            (&mut stencil.author, &cli.stencil_author),
            (&mut stencil.description, &cli.stencil_description),
            (&mut stencil.license_url, &cli.stencil_license_url),
        ] {
            if let Some(value) = value {
                slot.clone_from(value);
            }
        }

        let export = &mut self.export;
        if let Some(path) = &cli.path {
            export.path.clone_from(path);
        }
        Self::update_option(&mut export.overwrite_files, cli.overwrite_files);
        Self::update_option(&mut export.use_logging, cli.use_logging);
        if let Some(command) = &cli.exporter {
            export.command = command.split_whitespace().map(str::to_string).collect();
        }
        Self::update_option(&mut export.timeout, cli.timeout);

        let output = &mut self.output;
        Self::update_option(&mut output.write_meta, cli.write_meta);
        Self::update_option(&mut output.write_components, cli.write_components);
        Self::update_option(&mut output.create_github_action, cli.create_github_action);
        Self::update_option(&mut output.create_gitlab_action, cli.create_gitlab_action);
        Self::update_option(&mut output.create_cover_page, cli.create_cover_page);
        Self::update_option(&mut output.create_readme, cli.create_readme);
    }

    /// Update config option if CLI value is provided.
    fn update_option<T>(config_option: &mut T, cli_option: Option<T>) {
        if let Some(option) = cli_option {
            *config_option = option;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.export.command.is_empty() {
            return Err(ConfigError::Validation(
                "export.command must name a program".to_string(),
            ));
        }
        if self.export.timeout == 0 {
            return Err(ConfigError::Validation(
                "export.timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    /// Output directory; an empty path is the current directory.
    pub fn output_dir(&self) -> PathBuf {
        if self.export.path.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            self.export.path.clone()
        }
    }

    /// Path of a file inside the output directory.
    pub fn output_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.output_dir().join(path)
    }
}

// ============================================================================
// tests
// ============================================================================
