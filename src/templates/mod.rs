//! Embedded notebook theme rendered with Tera
//!
//! All templates are compiled into the binary; a body template (index or
//! post) extends the shared layout, which pulls in the head and sidebar
//! partials.

use chrono::NaiveDateTime;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::Site;
use crate::content::Post;
use crate::error::Result;
use crate::page::Page;

/// Template renderer with the embedded notebook theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all theme templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // Post content and excerpts are pre-rendered trusted HTML
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("notebook/layout.html")),
            ("index.html", include_str!("notebook/index.html")),
            ("post.html", include_str!("notebook/post.html")),
            (
                "partials/head.html",
                include_str!("notebook/partials/head.html"),
            ),
            (
                "partials/sidebar.html",
                include_str!("notebook/partials/sidebar.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);
        tera.register_filter("tag_url", tag_url_filter);

        Ok(Self { tera })
    }

    /// Render the listing view (index and tag pages)
    pub fn render_index(&self, site: &Site, page: &Page, posts: &[Post]) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("page", page);
        context.insert("posts", posts);
        Ok(self.tera.render("index.html", &context)?)
    }

    /// Render the single-post view
    pub fn render_post(&self, site: &Site, page: &Page, post: &Post) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("page", page);
        context.insert("post", post);
        Ok(self.tera.render("post.html", &context)?)
    }
}

/// Tera filter: format a serialized post timestamp for display
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "%B %d, %Y".to_string(),
    };

    match NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(date) => Ok(tera::Value::String(date.format(&format).to_string())),
        Err(_) => Ok(tera::Value::String(s)),
    }
}

/// Tera filter: turn a tag into its listing URL
fn tag_url_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let tag = tera::try_get_value!("tag_url", "value", String, value);
    let encoded = utf8_percent_encode(&tag, NON_ALPHANUMERIC).to_string();
    Ok(tera::Value::String(format!("/tag/{}", encoded)))
}
