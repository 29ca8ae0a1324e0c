//! Markdown rendering with syntax highlighting, heading anchors and math

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Marker paragraph replaced by the generated table of contents
const TOC_MARKER: &str = "<p>[TOC]</p>";

/// Markdown renderer. Output is trusted, author-controlled HTML.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: "base16-ocean.dark".to_string(),
        }
    }

    /// Render markdown to HTML.
    ///
    /// Fenced code blocks are syntax-highlighted, headings get stable id
    /// anchors, `$...$`/`$$...$$` become math spans for a client-side
    /// renderer, and a `[TOC]` paragraph is replaced by the collected
    /// table of contents.
    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_MATH;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_lang: Option<String> = None;
        let mut code_buf = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_buf.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted = self.highlight_code(&code_buf, code_lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_buf.push_str(&text);
                }
                Event::InlineMath(expr) => {
                    events.push(Event::Html(CowStr::from(format!(
                        r#"<span class="math">\({}\)</span>"#,
                        html_escape(&expr)
                    ))));
                }
                Event::DisplayMath(expr) => {
                    events.push(Event::Html(CowStr::from(format!(
                        r#"<div class="math">\[{}\]</div>"#,
                        html_escape(&expr)
                    ))));
                }
                other => events.push(other),
            }
        }

        let toc = assign_heading_ids(&mut events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        if html_output.contains(TOC_MARKER) {
            html_output = html_output.replace(TOC_MARKER, &toc);
        }

        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .unwrap_or_else(|| {
                self.theme_set
                    .themes
                    .values()
                    .next()
                    .expect("No themes available")
            });

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => {
                format!(r#"<figure class="highlight {}">{}</figure>"#, lang, highlighted)
            }
            Err(_) => {
                // Fallback to plain code block
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    lang,
                    html_escape(code)
                )
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Assign anchor ids to headings without an explicit one and collect the
/// table of contents. Repeated titles get `-2`, `-3`... suffixes.
fn assign_heading_ids(events: &mut Vec<Event<'_>>) -> String {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<(usize, String, String)> = Vec::new();

    let mut i = 0;
    while i < events.len() {
        let (depth, explicit) = match &events[i] {
            Event::Start(Tag::Heading { level, id, .. }) => {
                (heading_depth(*level), id.as_ref().map(|s| s.to_string()))
            }
            _ => {
                i += 1;
                continue;
            }
        };

        // Gather the heading text up to the matching end tag
        let mut text = String::new();
        let mut j = i + 1;
        while j < events.len() {
            match &events[j] {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
            j += 1;
        }

        let anchor = match explicit {
            Some(id) => id,
            None => {
                let base = slug::slugify(&text);
                let count = seen.entry(base.clone()).or_insert(0);
                *count += 1;
                let unique = if *count == 1 {
                    base
                } else {
                    format!("{}-{}", base, count)
                };
                if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
                    *id = Some(CowStr::from(unique.clone()));
                }
                unique
            }
        };

        entries.push((depth, anchor, text));
        i = j + 1;
    }

    if entries.is_empty() {
        return String::new();
    }

    let mut toc = String::from("<ul class=\"toc\">\n");
    for (depth, anchor, text) in &entries {
        toc.push_str(&format!(
            "<li class=\"toc-level-{}\"><a href=\"#{}\">{}</a></li>\n",
            depth,
            anchor,
            html_escape(text)
        ));
    }
    toc.push_str("</ul>");
    toc
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Just a paragraph.");
        assert!(html.contains("<p>Just a paragraph.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```");
        assert!(html.contains("highlight"));
    }

    #[test]
    fn test_heading_anchor() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World");
        assert!(html.contains(r##"<h1 id="hello-world">"##));
    }

    #[test]
    fn test_duplicate_headings_get_unique_anchors() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Notes\n\n# Notes");
        assert!(html.contains(r##"id="notes""##));
        assert!(html.contains(r##"id="notes-2""##));
    }

    #[test]
    fn test_toc_marker_replaced() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("[TOC]\n\n# First\n\n## Second");
        assert!(!html.contains("[TOC]"));
        assert!(html.contains(r#"<ul class="toc">"#));
        assert!(html.contains(r##"<a href="#first">First</a>"##));
        assert!(html.contains("toc-level-2"));
    }

    #[test]
    fn test_inline_math() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render(r"Euler: $e^{i\pi} + 1 = 0$");
        assert!(html.contains(r#"<span class="math">\(e^{i\pi} + 1 = 0\)</span>"#));
    }

    #[test]
    fn test_display_math() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("$$x = 1$$");
        assert!(html.contains(r#"<div class="math">\[x = 1\]</div>"#));
    }
}
