//! Markdown-to-HTML rendering for markdown-suffixed keys.

/// Renderer options mapped onto markdown-rs options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Enable GitHub Flavored Markdown constructs.
    pub gfm: bool,
    /// Pass raw HTML through instead of escaping it.
    pub raw_html: bool,
    /// Enable math constructs ($inline$ and $$block$$).
    pub math: bool,
}

impl RenderOptions {
    /// Frontmatter-friendly defaults: GFM on, raw HTML escaped.
    pub const fn frontmatter() -> Self {
        Self {
            gfm: true,
            raw_html: false,
            math: false,
        }
    }

    /// Convert to markdown-rs `Options`.
    pub fn to_markdown(self) -> markdown::Options {
        let mut options = if self.gfm {
            markdown::Options::gfm()
        } else {
            markdown::Options::default()
        };

        options.parse.constructs.html_flow = true;
        options.parse.constructs.html_text = true;
        options.compile.allow_dangerous_html = self.raw_html;

        if self.math {
            options.parse.constructs.math_flow = true;
            options.parse.constructs.math_text = true;
            options.parse.math_text_single_dollar = true;
        }

        options
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::frontmatter()
    }
}

/// Turns a markdown string into HTML.
///
/// `None` (or an empty string) means "no output"; the engine then keeps the
/// original suffixed key.
pub trait MarkdownRenderer: Send + Sync {
    /// Render `input` to HTML.
    fn render(&self, input: &str) -> Option<String>;
}

impl<F> MarkdownRenderer for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn render(&self, input: &str) -> Option<String> {
        (self)(input)
    }
}

/// Default renderer backed by markdown-rs.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    /// Create a renderer from render options.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl MarkdownRenderer for HtmlRenderer {
    fn render(&self, input: &str) -> Option<String> {
        match markdown::to_html_with_options(input, &self.options.to_markdown()) {
            Ok(html) => {
                let html = html.trim_end();
                (!html.is_empty()).then(|| html.to_string())
            }
            Err(message) => {
                log::warn!("Markdown rendering failed: {}", message);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(input: &str) -> Option<String> {
        HtmlRenderer::default().render(input)
    }

    #[test]
    fn renders_heading() {
        assert_eq!(render("# Hi").as_deref(), Some("<h1>Hi</h1>"));
    }

    #[test]
    fn renders_inline_strong() {
        assert_eq!(
            render("**X**").as_deref(),
            Some("<p><strong>X</strong></p>")
        );
    }

    #[test]
    fn escapes_raw_html_by_default() {
        let html = render("<script>alert(1)</script>").unwrap();
        assert!(!html.contains("<script>"), "{html}");
    }

    #[test]
    fn passes_raw_html_when_allowed() {
        let renderer = HtmlRenderer::new(RenderOptions {
            raw_html: true,
            ..RenderOptions::default()
        });
        let html = renderer.render("<em>hi</em>").unwrap();
        assert!(html.contains("<em>hi</em>"), "{html}");
    }

    #[test]
    fn gfm_strikethrough() {
        let html = render("~~gone~~").unwrap();
        assert_eq!(html, "<p><del>gone</del></p>");
    }

    #[test]
    fn whitespace_only_renders_nothing() {
        assert_eq!(render("   \n"), None);
    }

    #[test]
    fn closures_are_renderers() {
        let renderer = |s: &str| Some(format!("<p>{s}</p>"));
        assert_eq!(renderer.render("x").as_deref(), Some("<p>x</p>"));
    }
}
