//! Error taxonomy for loading and rendering

use std::path::PathBuf;

/// Errors surfaced by the loaders, builders and renderer.
///
/// Config failures are fatal to a request. Post parse failures are isolated
/// per file by the loader and only reach callers through `blogd check`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The site configuration document is missing or not valid YAML
    #[error("failed to load site config from {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// The site configuration parsed as YAML but does not match the schema
    #[error("site config {path:?} is missing required fields: {detail}")]
    Schema { path: PathBuf, detail: String },

    /// A single post descriptor (or its markdown body) is malformed
    #[error("failed to load post {path:?}: {source}")]
    PostParse {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// No post matches the requested slug
    #[error("no post with slug {slug:?}")]
    NotFound { slug: String },

    /// Template rendering failed
    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),

    /// Other I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
