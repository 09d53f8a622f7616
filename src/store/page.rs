//! Wiki page data structure

use serde::Serialize;
use std::borrow::Cow;

use super::PageStore;
use crate::error::{Result, WikiError};

/// Image slots available to every page, numbered from 1
pub const IMAGE_SLOTS: u8 = 9;

/// A wiki page
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    title: String,
    body: Vec<u8>,
    /// Cache-busting references to the nine image slots; derived, never stored
    image_refs: Vec<String>,
}

impl Page {
    /// Create a page, stamping its image references with the current time
    pub fn new(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Result<Self> {
        let title = title.into();
        if title.is_empty() {
            return Err(WikiError::EmptyTitle);
        }

        let image_refs = (1..=IMAGE_SLOTS)
            .map(|n| PageStore::image_ref(&title, n))
            .collect();

        Ok(Self {
            title,
            body: body.into(),
            image_refs,
        })
    }

    /// A page with a title and nothing else, used to start new pages
    pub fn blank(title: impl Into<String>) -> Result<Self> {
        Self::new(title, Vec::new())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, with invalid UTF-8 replaced
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn image_refs(&self) -> &[String] {
        &self.image_refs
    }
}
