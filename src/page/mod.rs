//! Per-request view metadata

use serde::Serialize;

use crate::config::Site;
use crate::content::Post;

/// Metadata for the page being rendered: document title, share title,
/// description, canonical URL fragment and share image. Never outlives the
/// request.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    pub title: String,
    pub title_share: String,
    pub description: String,
    pub url: String,
    /// Share image, relative to the static root
    pub image: String,
}

impl Page {
    /// Page metadata for a multi-post listing (index or tag view)
    pub fn listing(site: &Site) -> Self {
        Self {
            title: site.title.clone(),
            title_share: site.title.clone(),
            description: site.description.clone(),
            url: String::new(),
            image: site.avatar.clone(),
        }
    }

    /// Page metadata for a single post
    pub fn single_post(site: &Site, post: &Post) -> Self {
        let title = format!("{} | {}", post.title, site.title);
        Self {
            title: title.clone(),
            title_share: title,
            description: post.excerpt.clone(),
            url: format!("post/{}", post.slug),
            image: format!("images/posts/{}/{}", post.slug, post.image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::path::PathBuf;

    fn test_site() -> Site {
        Site {
            title: "Notebook".to_string(),
            name: "Phoebe".to_string(),
            job_title: "Engineer".to_string(),
            email: "p@example.com".to_string(),
            description: "Assorted notes".to_string(),
            avatar: "images/avatar.png".to_string(),
            favicon: "images/favicon.ico".to_string(),
            twitter_handler: "phoebe".to_string(),
            analytics_code: String::new(),
            disqus: String::new(),
            pages: Vec::new(),
            social_networks: Vec::new(),
            show_tags: true,
            show_email: false,
            show_rss: false,
            show_comments: false,
            show_menu: true,
            fixed_sidebar: false,
        }
    }

    fn test_post() -> Post {
        Post {
            title: "A post".to_string(),
            date: NaiveDateTime::parse_from_str("15/03/24 09:30", crate::content::DATE_FORMAT)
                .unwrap(),
            image: "cover.png".to_string(),
            markdown_path: PathBuf::from("a.md"),
            tags: vec!["misc".to_string()],
            show_comments: true,
            slug: "a-post".to_string(),
            draft: false,
            excerpt_length: 3000,
            content: "<p>Hello</p>".to_string(),
            excerpt: "<p>Hello</p>".to_string(),
        }
    }

    #[test]
    fn test_listing_page_comes_from_site() {
        let site = test_site();
        let page = Page::listing(&site);
        assert_eq!(page.title, "Notebook");
        assert_eq!(page.title_share, "Notebook");
        assert_eq!(page.description, "Assorted notes");
        assert_eq!(page.image, "images/avatar.png");
        assert_eq!(page.url, "");
    }

    #[test]
    fn test_single_post_page() {
        let site = test_site();
        let post = test_post();
        let page = Page::single_post(&site, &post);
        assert_eq!(page.title, "A post | Notebook");
        assert_eq!(page.description, post.excerpt);
        assert_eq!(page.url, "post/a-post");
        assert_eq!(page.image, "images/posts/a-post/cover.png");
    }
}
