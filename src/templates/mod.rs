//! Page rendering with the Tera template engine
//!
//! The `view` and `edit` templates are embedded in the binary. A templates
//! directory holding `view.html` or `edit.html` overrides the embedded copy.

use serde::Serialize;
use std::path::Path;
use tera::{Context, Tera};

use crate::error::Result;
use crate::store::Page;

/// Which page template to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    View,
    Edit,
}

impl View {
    pub fn template_name(self) -> &'static str {
        match self {
            View::View => "view.html",
            View::Edit => "edit.html",
        }
    }
}

/// Template renderer for wiki pages
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a renderer with the embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Autoescaping stays on for .html: page bodies are user input
        tera.add_raw_templates(vec![
            ("view.html", include_str!("wiki/view.html")),
            ("edit.html", include_str!("wiki/edit.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Create a renderer, preferring templates found in `dir`
    pub fn with_overrides<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut renderer = Self::new()?;

        for view in [View::View, View::Edit] {
            let name = view.template_name();
            let path = dir.as_ref().join(name);
            if path.is_file() {
                renderer.tera.add_template_file(&path, Some(name))?;
                tracing::debug!("Loaded template override from {:?}", path);
            }
        }

        Ok(renderer)
    }

    /// Render a page with the given view
    pub fn render(&self, view: View, page: &Page) -> Result<String> {
        let context = Context::from_serialize(PageData::from(page))?;
        Ok(self.tera.render(view.template_name(), &context)?)
    }
}

/// Data structure for template context
#[derive(Debug, Clone, Serialize)]
pub struct PageData {
    pub title: String,
    pub body: String,
    pub images: Vec<String>,
}

impl From<&Page> for PageData {
    fn from(page: &Page) -> Self {
        Self {
            title: page.title().to_string(),
            body: page.body_text().into_owned(),
            images: page.image_refs().to_vec(),
        }
    }
}
