//! Post model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::MarkdownRenderer;
use crate::error::{Error, Result};

/// Date format used by post descriptors, e.g. `15/03/24 09:30`
pub const DATE_FORMAT: &str = "%d/%m/%y %H:%M";

const DEFAULT_EXCERPT_LENGTH: usize = 3000;

fn default_excerpt_length() -> usize {
    DEFAULT_EXCERPT_LENGTH
}

/// Raw post descriptor as it appears in the YAML file
#[derive(Debug, Deserialize)]
struct PostDoc {
    title: String,
    date: String,
    image: String,
    markdown_path: String,
    tags: Vec<String>,
    show_comments: bool,
    slug: String,
    draft: bool,
    #[serde(default = "default_excerpt_length")]
    excerpt_length: usize,
}

/// A blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date (wall-clock, no timezone)
    pub date: NaiveDateTime,

    /// Image filename, resolved under images/posts/<slug>/
    pub image: String,

    /// Path of the markdown source, resolved against the posts directory
    pub markdown_path: PathBuf,

    /// Tags, in descriptor order
    pub tags: Vec<String>,

    /// Whether comments are enabled for this post
    pub show_comments: bool,

    /// Unique slug, the lookup key
    pub slug: String,

    /// Draft posts are excluded from every rendered view
    pub draft: bool,

    /// Number of characters kept in the excerpt
    pub excerpt_length: usize,

    /// Rendered HTML content, computed once at load time
    pub content: String,

    /// Prefix of `content`, capped at `excerpt_length` characters
    pub excerpt: String,
}

impl Post {
    /// Load a post from its YAML descriptor, rendering the markdown body.
    ///
    /// Any failure (unreadable descriptor, bad schema, bad date, unreadable
    /// markdown) is reported as a `PostParse` error carrying the descriptor
    /// path, so the loader can isolate it per file.
    pub fn load(path: &Path, posts_dir: &Path, renderer: &MarkdownRenderer) -> Result<Self> {
        let parse_err = |source: anyhow::Error| Error::PostParse {
            path: path.to_path_buf(),
            source,
        };

        let doc = fs::read_to_string(path).map_err(|e| parse_err(e.into()))?;
        let doc: PostDoc = serde_yaml::from_str(&doc).map_err(|e| parse_err(e.into()))?;

        let date = NaiveDateTime::parse_from_str(&doc.date, DATE_FORMAT)
            .map_err(|e| parse_err(anyhow::anyhow!("invalid date {:?}: {}", doc.date, e)))?;

        let markdown_path = posts_dir.join(&doc.markdown_path);
        let raw = fs::read_to_string(&markdown_path).map_err(|e| {
            parse_err(anyhow::anyhow!(
                "cannot read markdown {:?}: {}",
                markdown_path,
                e
            ))
        })?;

        let content = renderer.render(&raw);
        let excerpt = excerpt_of(&content, doc.excerpt_length);

        Ok(Self {
            title: doc.title,
            date,
            image: doc.image,
            markdown_path,
            tags: doc.tags,
            show_comments: doc.show_comments,
            slug: doc.slug,
            draft: doc.draft,
            excerpt_length: doc.excerpt_length,
            content,
            excerpt,
        })
    }
}

/// First `length` characters of `content`; the whole string if it fits
fn excerpt_of(content: &str, length: usize) -> String {
    match content.char_indices().nth(length) {
        Some((byte_pos, _)) => content[..byte_pos].to_string(),
        None => content.to_string(),
    }
}
