//! Post loader - scans the posts directory for YAML descriptors

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{MarkdownRenderer, Post};
use crate::error::{Error, Result};
use crate::App;

/// Loads posts from the posts directory.
///
/// Every call re-reads the directory; nothing is cached across requests.
pub struct PostLoader<'a> {
    app: &'a App,
    renderer: MarkdownRenderer,
}

impl<'a> PostLoader<'a> {
    /// Create a new post loader
    pub fn new(app: &'a App) -> Self {
        Self {
            app,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load all publishable posts, newest first.
    ///
    /// A descriptor that fails to parse is logged and skipped; it never
    /// aborts the rest of the collection. Duplicate slugs keep the first
    /// file in lexicographic path order. Drafts are dropped after dedup,
    /// so a draft still claims its slug.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let mut by_slug: IndexMap<String, Post> = IndexMap::new();

        for path in self.descriptor_paths() {
            match Post::load(&path, &self.app.posts_dir, &self.renderer) {
                Ok(post) => {
                    if by_slug.contains_key(&post.slug) {
                        tracing::warn!(
                            "Duplicate slug {:?} in {:?}, keeping the earlier file",
                            post.slug,
                            path
                        );
                    } else {
                        by_slug.insert(post.slug.clone(), post);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to load post {:?}: {}", path, e);
                }
            }
        }

        let mut posts: Vec<Post> = by_slug.into_values().filter(|p| !p.draft).collect();

        // Sort by date descending (newest first); stable, ties keep scan order
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(posts)
    }

    /// Load posts carrying the given tag, newest first.
    ///
    /// Equivalent to `load_posts()` followed by a membership filter; an
    /// unused tag yields an empty collection, not an error.
    pub fn load_posts_by_tag(&self, tag: &str) -> Result<Vec<Post>> {
        Ok(self
            .load_posts()?
            .into_iter()
            .filter(|post| post.tags.iter().any(|t| t == tag))
            .collect())
    }

    /// Find a single post by slug
    pub fn find_post(&self, slug: &str) -> Result<Post> {
        self.load_posts()?
            .into_iter()
            .find(|post| post.slug == slug)
            .ok_or_else(|| Error::NotFound {
                slug: slug.to_string(),
            })
    }

    /// Parse every descriptor, collecting the failures instead of skipping
    /// them. Used by `blogd check`.
    pub fn validate(&self) -> Vec<(PathBuf, Error)> {
        let mut failures = Vec::new();
        for path in self.descriptor_paths() {
            if let Err(e) = Post::load(&path, &self.app.posts_dir, &self.renderer) {
                failures.push((path, e));
            }
        }
        failures
    }

    /// YAML descriptor paths directly under the posts directory, sorted so
    /// the scan order is deterministic
    fn descriptor_paths(&self) -> Vec<PathBuf> {
        if !self.app.posts_dir.exists() {
            return Vec::new();
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(&self.app.posts_dir)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file() && is_yaml_file(e.path()))
            .map(|e| e.into_path())
            .collect();
        paths.sort();
        paths
    }
}

/// Check if a file is a YAML descriptor
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "yml" || e == "yaml")
        .unwrap_or(false)
}
