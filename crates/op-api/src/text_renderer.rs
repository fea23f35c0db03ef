//! Rich text to HTML rendering for formattable attributes

use op_core::types::{Formattable, TextFormat};

/// Renders raw markup to HTML
pub trait TextRenderer: Send + Sync {
    fn to_html(&self, raw: Option<&str>) -> String;

    /// The `{format, raw, html}` triple of a formattable attribute
    fn formattable(&self, format: TextFormat, raw: Option<&str>) -> Formattable {
        Formattable {
            format,
            raw: raw.map(str::to_string),
            html: self.to_html(raw),
        }
    }
}

/// Minimal textile rendering: escaped paragraphs split on blank lines,
/// single line breaks become `<br />`
#[derive(Debug, Default, Clone, Copy)]
pub struct TextileRenderer;

impl TextRenderer for TextileRenderer {
    fn to_html(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return String::new();
        };

        raw.replace("\r\n", "\n")
            .split("\n\n")
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
            .map(|paragraph| {
                let lines: Vec<String> = paragraph.lines().map(html_escape).collect();
                format!("<p>{}</p>", lines.join("<br />"))
            })
            .collect::<Vec<_>>()
            .join("\n")
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
