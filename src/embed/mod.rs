//! Embedded static resources for generated stencil sites.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `ci` - Pipeline definitions for GitHub Pages and GitLab Pages
//! - `site` - README and cover page templates
//!
//! # Usage
//!
//! ```ignore
//! use embed::site::{README_MD, ReadmeVars};
//!
//! let md = README_MD.render(&ReadmeVars { name: "Icons", ..vars });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod ci {
    /// GitHub Actions workflow publishing the output directory to Pages.
    pub const GH_PAGES_YML: &str = include_str!("ci/gh-pages.yml");

    /// GitLab CI job publishing the output directory to Pages.
    pub const GITLAB_CI_YML: &str = include_str!("ci/gitlab-ci.yml");
}

pub mod site {
    use super::{Template, TemplateVars};
    use crate::utils::html::{escape, escape_attr, line_breaks};

    /// Variables for readme.md.
    pub struct ReadmeVars<'a> {
        pub name: &'a str,
        pub description: &'a str,
        pub author: &'a str,
        pub license: &'a str,
    }

    impl TemplateVars for ReadmeVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__NAME__", self.name)
                .replace("__DESCRIPTION__", &self.description.replace("\\n", "\n"))
                .replace("__AUTHOR__", self.author)
                .replace("__LICENSE__", self.license)
        }
    }

    /// Stencil README.
    pub const README_MD: Template<ReadmeVars<'static>> =
        Template::new(include_str!("site/readme.md"));

    /// Variables for index.html.
    pub struct CoverVars<'a> {
        pub name: &'a str,
        pub description: &'a str,
        pub author: &'a str,
        pub license: &'a str,
        /// Exported file names, in export order.
        pub components: &'a [String],
    }

    impl CoverVars<'_> {
        fn thumbnails(&self) -> String {
            self.components
                .iter()
                .map(|name| {
                    format!(
                        r#"<div class="col-sm"> <img style="max-width:200px;" class="img-thumbnail" src="{}" /></div>"#,
                        escape_attr(name)
                    )
                })
                .collect()
        }
    }

    impl TemplateVars for CoverVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__COMPONENTS__", &self.thumbnails())
                .replace("__NAME__", &escape(self.name))
                .replace("__DESCRIPTION__", &line_breaks(&escape(self.description)))
                .replace("__AUTHOR__", &escape(self.author))
                .replace("__LICENSE__", &escape_attr(self.license))
        }
    }

    /// Stencil cover page with one thumbnail per component.
    pub const INDEX_HTML: Template<CoverVars<'static>> =
        Template::new(include_str!("site/index.html"));
}
