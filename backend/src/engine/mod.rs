//! Pure document logic: block flattening, placeholder resolution, rendering
//! and version-label ordering. Nothing in here touches the database.

pub mod blocks;
pub mod renderer;
pub mod resolver;
pub mod versions;

/// Escapes the characters that would otherwise be read as markup.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// md5 hex digest used to detect changed derived content.
pub fn content_hash(markup: &str, stylesheet: &str) -> String {
    format!("{:x}", md5::compute(format!("{}\0{}", markup, stylesheet)))
}
