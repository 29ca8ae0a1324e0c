//! Site configuration (config/config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Site-wide configuration, read fresh from its YAML document on every
/// request. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub title: String,
    pub name: String,
    pub job_title: String,
    pub email: String,
    pub description: String,

    /// Sidebar avatar, relative to the static root
    pub avatar: String,
    pub favicon: String,

    pub twitter_handler: String,
    pub analytics_code: String,
    /// Disqus shortname, empty disables the embed
    pub disqus: String,

    /// Navigation entries, in display order
    pub pages: Vec<NavPage>,
    /// Social links, in display order
    pub social_networks: Vec<SocialNetwork>,

    // Display flags
    pub show_tags: bool,
    pub show_email: bool,
    pub show_rss: bool,
    pub show_comments: bool,
    pub show_menu: bool,
    pub fixed_sidebar: bool,
}

/// A navigation page entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavPage {
    pub title: String,
    pub url: String,
}

/// A social network link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialNetwork {
    pub name: String,
    pub url: String,
    pub icon: String,
}

impl Site {
    /// Load the configuration from a YAML file.
    ///
    /// A missing or unparseable file is a config error; a parseable document
    /// that lacks required fields is a schema error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        let value: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| Error::Config {
                path: path.to_path_buf(),
                source: e.into(),
            })?;

        serde_yaml::from_value(value).map_err(|e| Error::Schema {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}
