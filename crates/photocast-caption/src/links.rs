//! Links message rendering.
//!
//! Uses Handlebars with a Telegram-HTML escape function and one helper:
//! - keycap: zero-based index to the keycap emoji 1️⃣..🔟

use handlebars::{handlebars_helper, Handlebars, Template};
use photocast_core::LinkEntry;
use serde_json::json;
use thiserror::Error;

const KEYCAPS: [&str; 10] = [
    "1️⃣", "2️⃣", "3️⃣", "4️⃣", "5️⃣", "6️⃣", "7️⃣", "8️⃣", "9️⃣", "🔟",
];

/// One line per photo, no trailing newline
pub const DEFAULT_LINKS_TEMPLATE: &str =
    "{{#each photos}}{{#if @index}}\n{{/if}}{{keycap @index}} <a href=\"{{url}}\">{{caption}}</a>{{/each}}";

#[derive(Debug, Error)]
pub enum LinksError {
    #[error("invalid links template: {0}")]
    Template(String),
    #[error("links render failed: {0}")]
    Render(String),
}

pub fn keycap(index: usize) -> String {
    KEYCAPS
        .get(index)
        .map(|k| k.to_string())
        .unwrap_or_else(|| format!("{}.", index + 1))
}

handlebars_helper!(keycap_helper: |index: u64| keycap(index as usize));

/// Escapes the characters Telegram's HTML mode treats as markup
pub fn escape_telegram_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

pub struct LinksRenderer {
    handlebars: Handlebars<'static>,
    template: String,
}

impl LinksRenderer {
    pub fn new(template: &str) -> Result<Self, LinksError> {
        Template::compile(template).map_err(|e| LinksError::Template(e.to_string()))?;

        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(escape_telegram_html);
        handlebars.register_helper("keycap", Box::new(keycap_helper));

        Ok(Self {
            handlebars,
            template: template.to_string(),
        })
    }

    pub fn render(&self, entries: &[LinkEntry]) -> Result<String, LinksError> {
        self.handlebars
            .render_template(&self.template, &json!({ "photos": entries }))
            .map_err(|e| LinksError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keycaps() {
        assert_eq!(keycap(0), "1️⃣");
        assert_eq!(keycap(9), "🔟");
        assert_eq!(keycap(10), "11.");
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape_telegram_html("Tom & \"Jerry\" <3"),
            "Tom &amp; &quot;Jerry&quot; &lt;3"
        );
    }

    #[test]
    fn test_bad_template_rejected() {
        assert!(matches!(
            LinksRenderer::new("{{#each photos}}"),
            Err(LinksError::Template(_))
        ));
    }
}
