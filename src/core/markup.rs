//! Turning assistant replies into HTML
//!
//! Pages may ship a markdown library; when they don't, replies are shown as
//! escaped text.

/// Renders reply text into markup suitable for `innerHTML`
pub trait MarkupRenderer {
    fn render(&self, text: &str) -> String;
}

/// Escapes HTML and keeps line breaks
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextRenderer;

impl MarkupRenderer for PlainTextRenderer {
    fn render(&self, text: &str) -> String {
        escape_html(text).replace('\n', "<br>")
    }
}

/// Render with `renderer` when present, plain text otherwise
pub fn render_or_plain(renderer: Option<&dyn MarkupRenderer>, text: &str) -> String {
    match renderer {
        Some(r) => r.render(text),
        None => PlainTextRenderer.render(text),
    }
}

/// Minimal HTML escaping for text and attribute content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shouting;

    impl MarkupRenderer for Shouting {
        fn render(&self, text: &str) -> String {
            text.to_uppercase()
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_plain_text_keeps_line_breaks() {
        assert_eq!(PlainTextRenderer.render("a<b\nc"), "a&lt;b<br>c");
    }

    #[test]
    fn test_render_or_plain_prefers_capability() {
        assert_eq!(render_or_plain(Some(&Shouting), "hi"), "HI");
        assert_eq!(render_or_plain(None, "<hi>"), "&lt;hi&gt;");
    }
}
