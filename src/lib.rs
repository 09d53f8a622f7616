//! flatwiki: a minimal personal wiki over flat files
//!
//! Pages are `<title>.txt` files in one directory, each with up to nine
//! image slots under `images/`. They are viewed, edited, listed, deleted and
//! decorated with uploads over HTTP.

pub mod commands;
pub mod config;
pub mod error;
pub mod helpers;
pub mod route;
pub mod server;
pub mod store;
pub mod templates;
pub mod upload;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use error::WikiError;

/// The main wiki application
#[derive(Clone)]
pub struct Wiki {
    /// Wiki configuration
    pub config: config::WikiConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding `<title>.txt` pages and their backups
    pub pages_dir: PathBuf,
    /// Directory holding uploaded images
    pub images_dir: PathBuf,
    /// Directory with template overrides, if configured
    pub templates_dir: Option<PathBuf>,
}

impl Wiki {
    /// Create a new Wiki instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::WikiConfig::load(&config_path)?
        } else {
            config::WikiConfig::default()
        };

        let pages_dir = base_dir.join(&config.pages_dir);
        let images_dir = base_dir.join(&config.images_dir);
        let templates_dir = config.templates_dir.as_ref().map(|dir| base_dir.join(dir));

        Ok(Self {
            config,
            base_dir,
            pages_dir,
            images_dir,
            templates_dir,
        })
    }

    /// Page store over the pages directory
    pub fn store(&self) -> store::PageStore {
        store::PageStore::new(&self.pages_dir)
    }

    /// Titles of every stored page
    pub fn list_pages(&self) -> Vec<String> {
        self.store().list()
    }
}
