//! Page shell around the rendered host page.

use minijinja::{context, Environment, Value};

use crate::theme::Theme;

/// Context for rendering the page shell.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PageContext {
    /// Document title
    pub title: String,
    /// Rendered host page HTML
    pub body: String,
    /// Theme written to `data-theme` before the runtime script runs
    pub theme: Theme,
    /// Base URL prefix for assets
    pub base_url: String,
    /// Extra stylesheets, linked before the generated one
    pub styles: Vec<String>,
    /// Width below which the navigation collapses
    pub breakpoint_px: u32,
    /// Extra scripts loaded after the runtime script
    pub scripts: Vec<String>,
}

impl PageContext {
    /// Context with default settings for a title and body.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            theme: Theme::default(),
            base_url: "/".to_string(),
            styles: Vec::new(),
            breakpoint_px: 768,
            scripts: Vec::new(),
        }
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a template engine with the page shell loaded.
    pub fn new() -> Self {
        let mut env = Environment::new();

        env.add_template_owned("page.html".to_string(), PAGE_TEMPLATE.to_string())
            .expect("Failed to add page template");

        Self { env }
    }

    /// Render the full HTML document.
    pub fn render_page(&self, page: &PageContext) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("page.html")?;

        let styles: Vec<Value> = page.styles.iter().map(|s| url_attr(s)).collect();
        let scripts: Vec<Value> = page.scripts.iter().map(|s| url_attr(s)).collect();

        tmpl.render(context! {
            title => &page.title,
            body => &page.body,
            theme => page.theme.token(),
            css_href => url_attr(&format!("{}assets/main.css", page.base_url)),
            js_href => url_attr(&format!("{}assets/main.js", page.base_url)),
            styles => styles,
            breakpoint_px => page.breakpoint_px,
            scripts => scripts,
        })
    }
}

/// A URL for a double-quoted attribute. Auto-escaping would turn `/` into
/// `&#x2f;`, so only the characters that can break out of the attribute are
/// escaped here.
fn url_attr(url: &str) -> Value {
    let escaped = url
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    Value::from_safe_string(escaped)
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en" data-theme="{{ theme }}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  {% for style in styles %}<link rel="stylesheet" href="{{ style }}">
  {% endfor %}<link rel="stylesheet" href="{{ css_href }}">
</head>
<body data-breakpoint="{{ breakpoint_px }}">
  {{ body | safe }}
  <script src="{{ js_href }}"></script>
  {% for script in scripts %}<script src="{{ script }}"></script>
  {% endfor %}
</body>
</html>"##;
