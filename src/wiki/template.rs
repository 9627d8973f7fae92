//! Page templates
//!
//! `view.html` and `edit.html` are read once from the template directory when
//! the server starts. The registry is immutable afterwards and shared by
//! reference between request tasks.

use std::path::Path;

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;

use super::page::Page;

pub const VIEW: &str = "view";
pub const EDIT: &str = "edit";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Template(#[from] handlebars::TemplateError),
    #[error(transparent)]
    Render(#[from] handlebars::RenderError),
}

/// Data handed to a template
#[derive(Debug, Serialize)]
struct PageContext<'a> {
    title: &'a str,
    body: &'a str,
}

/// The fixed pair of page templates
#[derive(Debug)]
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    /// Load `view.html` and `edit.html` from `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, RenderError> {
        let dir = dir.as_ref();
        let view = read_template(&dir.join(format!("{VIEW}.html")))?;
        let edit = read_template(&dir.join(format!("{EDIT}.html")))?;
        Self::from_sources(&view, &edit)
    }

    pub fn from_sources(view: &str, edit: &str) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        // Unknown fields are an execution error, not an empty string
        registry.set_strict_mode(true);
        registry.register_template_string(VIEW, view)?;
        registry.register_template_string(EDIT, edit)?;
        Ok(Self { registry })
    }

    /// Render the named template with `page`. Output is HTML-escaped.
    pub fn render(&self, name: &str, page: &Page) -> Result<String, RenderError> {
        let body = page.body_text();
        let ctx = PageContext {
            title: page.title.as_str(),
            body: &body,
        };
        Ok(self.registry.render(name, &ctx)?)
    }
}

fn read_template(path: &Path) -> Result<String, RenderError> {
    std::fs::read_to_string(path).map_err(|source| RenderError::Read {
        path: path.display().to_string(),
        source,
    })
}
