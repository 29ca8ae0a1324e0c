//! blogd: a small personal-blog server
//!
//! Posts are described by one YAML file each; the site by a single config
//! document. Everything is re-read on every request and rendered through
//! embedded Tera templates.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod page;
pub mod server;
pub mod templates;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

/// The main application: the base directory and the content paths resolved
/// from it. Constructed once at process start and shared read-only.
#[derive(Clone)]
pub struct App {
    /// Base directory
    pub base_dir: PathBuf,
    /// Site configuration document (config/config.yml)
    pub config_path: PathBuf,
    /// Directory of post descriptors and markdown sources
    pub posts_dir: PathBuf,
    /// Directory served under /static
    pub static_dir: PathBuf,
}

impl App {
    /// Create a new App rooted at a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("config").join("config.yml");
        let posts_dir = base_dir.join("posts");
        let static_dir = base_dir.join("static");

        Self {
            base_dir,
            config_path,
            posts_dir,
            static_dir,
        }
    }

    /// Load the site configuration
    pub fn load_site(&self) -> Result<config::Site> {
        config::Site::load(&self.config_path)
    }
}
