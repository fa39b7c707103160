//! Stencil metadata and site files.
//!
//! Every writer is gated by its `[output]` toggle and overwrites its target
//! unconditionally.
//!
//! | Toggle                 | File                               |
//! |------------------------|------------------------------------|
//! | `write_components`     | `stencil-components.json`          |
//! | `write_meta`           | `stencil-meta.json`                |
//! | `create_github_action` | `.github/workflows/gh-pages.yml`   |
//! | `create_gitlab_action` | `.gitlab-ci.yml`                   |
//! | `create_readme`        | `readme.md`                        |
//! | `create_cover_page`    | `index.html`                       |

pub mod manifest;

pub use manifest::{ComponentRecord, Manifest, Meta};

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::StencilConfig;
use crate::debug;
use crate::embed::{
    ci::{GH_PAGES_YML, GITLAB_CI_YML},
    site::{CoverVars, INDEX_HTML, README_MD, ReadmeVars},
};

pub const COMPONENTS_JSON: &str = "stencil-components.json";
pub const META_JSON: &str = "stencil-meta.json";
pub const GH_PAGES_PATH: &str = ".github/workflows/gh-pages.yml";
pub const GITLAB_CI_PATH: &str = ".gitlab-ci.yml";
pub const README_PATH: &str = "readme.md";
pub const INDEX_PATH: &str = "index.html";

/// Run every enabled writer, returning the files written.
pub fn write_site(config: &StencilConfig, manifest: &Manifest) -> Result<Vec<PathBuf>> {
    let output = &config.output;
    let stencil = &config.stencil;
    let mut written = Vec::new();

    let mut emit = |name: &str, content: String| -> Result<()> {
        let path = config.output_join(name);
        write_file(&path, &content)?;
        debug!("site"; "wrote {}", path.display());
        written.push(path);
        Ok(())
    };

    if output.write_components {
        let json = serde_json::to_string(manifest).context("Failed to encode components")?;
        emit(COMPONENTS_JSON, json)?;
    }

    if output.write_meta {
        let json = serde_json::to_string(&Meta::new(stencil)).context("Failed to encode meta")?;
        emit(META_JSON, json)?;
    }

    if output.create_github_action {
        emit(GH_PAGES_PATH, GH_PAGES_YML.to_string())?;
    }

    if output.create_gitlab_action {
        emit(GITLAB_CI_PATH, GITLAB_CI_YML.to_string())?;
    }

    if output.create_readme {
        emit(
            README_PATH,
            README_MD.render(&ReadmeVars {
                name: &stencil.name,
                description: &stencil.description,
                author: &stencil.author,
                license: &stencil.license_url,
            }),
        )?;
    }

    if output.create_cover_page {
        emit(
            INDEX_PATH,
            INDEX_HTML.render(&CoverVars {
                name: &stencil.name,
                description: &stencil.description,
                author: &stencil.author,
                license: &stencil.license_url,
                components: manifest.names(),
            }),
        )?;
    }

    Ok(written)
}

/// Write `content` to `path`, creating parent directories.
fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
