//! Rich-text rendering
//!
//! CMS bodies arrive as Markdown, HTML, or a mix of both. pulldown-cmark
//! renders the Markdown and passes HTML blocks through untouched.
//!
//! # Example
//!
//! ```
//! use gameloop::services::markdown::RichTextRenderer;
//!
//! let renderer = RichTextRenderer::new("http://localhost:1337");
//! let html = renderer.render("# Hello World\n\nThis is **bold** text.");
//! assert!(html.contains("<h1>"));
//! assert!(html.contains("<strong>"));
//! ```

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

use super::format::Formatter;

/// Renders CMS rich text to HTML
///
/// Supports tables, strikethrough, task lists and smart punctuation. Image
/// sources that point at CMS uploads are made absolute, and fenced code
/// blocks carry a `language-*` class for client-side highlighting.
#[derive(Debug, Clone)]
pub struct RichTextRenderer {
    formatter: Formatter,
}

impl RichTextRenderer {
    pub fn new(media_base: &str) -> Self {
        Self {
            formatter: Formatter::new(media_base),
        }
    }

    pub fn with_formatter(formatter: Formatter) -> Self {
        Self { formatter }
    }

    /// Render a body to HTML
    pub fn render(&self, content: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);

        let parser = Parser::new_ext(content, options);
        let events = self.process_events(parser);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Plain-text summary of a body, cut at a word boundary
    pub fn summary(&self, content: &str, max_chars: usize) -> String {
        let mut text = String::new();
        for event in Parser::new(content) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak
                | Event::HardBreak
                | Event::End(TagEnd::Paragraph)
                | Event::End(TagEnd::Heading(_)) => text.push(' '),
                _ => {}
            }
        }

        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.chars().count() <= max_chars {
            return text;
        }

        let cut: String = text.chars().take(max_chars).collect();
        let cut = match cut.rfind(' ') {
            Some(idx) if idx > 0 => &cut[..idx],
            _ => cut.as_str(),
        };
        format!("{}…", cut.trim_end_matches(|c: char| c.is_ascii_punctuation()))
    }

    fn process_events<'a>(&self, parser: Parser<'a>) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        let mut in_code_block = false;
        let mut code_lang: Option<String> = None;
        let mut code_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_content.clear();
                    code_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.trim().is_empty() => {
                            lang.split_whitespace().next().map(str::to_string)
                        }
                        _ => None,
                    };
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    events.push(Event::Html(code_block(&code_content, code_lang.as_deref()).into()));
                    code_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_content.push_str(&text);
                }
                Event::Start(Tag::Image { link_type, dest_url, title, id }) => {
                    let dest_url = CowStr::from(self.formatter.resolve_url(&dest_url));
                    events.push(Event::Start(Tag::Image { link_type, dest_url, title, id }));
                }
                _ => events.push(event),
            }
        }

        events
    }
}

fn code_block(code: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            html_escape(lang),
            html_escape(code)
        ),
        None => format!("<pre><code>{}</code></pre>", html_escape(code)),
    }
}

/// Escapes HTML special characters in a string.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> RichTextRenderer {
        RichTextRenderer::new("http://cms.local")
    }

    #[test]
    fn test_render_heading_and_emphasis() {
        let html = renderer().render("## Flow\n\nThis is **bold** and *italic*.");
        assert!(html.contains("<h2>Flow</h2>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn test_html_passes_through() {
        let html = renderer().render("<h3>Monetization Models:</h3>\n<ul>\n<li>Freemium</li>\n</ul>\n");
        assert!(html.contains("<h3>Monetization Models:</h3>"));
        assert!(html.contains("<li>Freemium</li>"));
    }

    #[test]
    fn test_upload_images_made_absolute() {
        let html = renderer().render("![map](/uploads/map.png)");
        assert!(html.contains("src=\"http://cms.local/uploads/map.png\""));
        assert!(html.contains("alt=\"map\""));

        let html = renderer().render("![cdn](https://cdn.example.com/x.png)");
        assert!(html.contains("src=\"https://cdn.example.com/x.png\""));
    }

    #[test]
    fn test_code_block_with_language() {
        let html = renderer().render("```csharp\nvar x = 1 < 2;\n```");
        assert!(html.contains("<pre><code class=\"language-csharp\">"));
        assert!(html.contains("var x = 1 &lt; 2;"));
    }

    #[test]
    fn test_code_block_without_language() {
        let html = renderer().render("    indented code");
        assert!(html.contains("<pre><code>indented code"));
    }

    #[test]
    fn test_render_table() {
        let html = renderer().render("| Engine | Language |\n|---|---|\n| Unity | C# |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>Unity</td>"));
    }

    #[test]
    fn test_render_smart_punctuation() {
        let html = renderer().render("\"quoted\" -- dash");
        assert!(html.contains('\u{201c}'));
        assert!(html.contains('\u{2013}'));
    }

    #[test]
    fn test_summary_strips_markup_and_truncates() {
        let r = renderer();
        assert_eq!(r.summary("## Title\n\nSome **bold** text.", 100), "Title Some bold text.");
        assert_eq!(r.summary("one two three four", 9), "one two…");
        assert_eq!(r.summary("", 10), "");
    }
}
