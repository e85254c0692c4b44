//! Flattening of a block tree into directly renderable markup and stylesheet.
//!
//! This runs once per save (and for unsaved previews). Rendering never
//! re-flattens; it works on the stored result.
//!
//! Text payloads are editor-produced inline markup and are copied as they are,
//! placeholder tokens included. Plain attributes (titles, labels, image
//! sources) are escaped.

use super::escape_html;
use common::model::block::{Block, DocumentStyle, StructuredContent};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct Flattened {
    pub markup: String,
    pub stylesheet: String,
}

pub fn flatten(content: &StructuredContent) -> Flattened {
    let mut markup = String::from("<article class=\"document\">\n");
    for block in &content.blocks {
        write_block(&mut markup, block);
    }
    markup.push_str("</article>\n");

    Flattened {
        markup,
        stylesheet: stylesheet(&content.style),
    }
}

fn write_block(out: &mut String, block: &Block) {
    match block {
        Block::Heading { level, content } => {
            let level = (*level).clamp(1, 6);
            let _ = writeln!(
                out,
                "<h{level} class=\"block block-heading\">{content}</h{level}>"
            );
        }
        Block::Paragraph { content } => {
            let _ = writeln!(out, "<p class=\"block block-paragraph\">{}</p>", content);
        }
        Block::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            let _ = writeln!(out, "<{} class=\"block block-list\">", tag);
            for item in items {
                let _ = writeln!(out, "<li>{}</li>", item);
            }
            let _ = writeln!(out, "</{}>", tag);
        }
        Block::Table { header, rows } => {
            out.push_str("<table class=\"block block-table\">\n");
            if !header.is_empty() {
                out.push_str("<thead><tr>");
                for cell in header {
                    let _ = write!(out, "<th>{}</th>", cell);
                }
                out.push_str("</tr></thead>\n");
            }
            out.push_str("<tbody>\n");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    let _ = write!(out, "<td>{}</td>", cell);
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</tbody>\n</table>\n");
        }
        Block::Section { title, children } => {
            out.push_str("<section class=\"block block-section\">\n");
            if let Some(title) = title {
                let _ = writeln!(out, "<h2 class=\"section-title\">{}</h2>", escape_html(title));
            }
            for child in children {
                write_block(out, child);
            }
            out.push_str("</section>\n");
        }
        Block::Columns { columns } => {
            out.push_str("<div class=\"block block-columns\">\n");
            for column in columns {
                out.push_str("<div class=\"column\">\n");
                for child in column {
                    write_block(out, child);
                }
                out.push_str("</div>\n");
            }
            out.push_str("</div>\n");
        }
        Block::Signature { label, content } => {
            out.push_str("<div class=\"block block-signature\">\n");
            if !content.is_empty() {
                let _ = writeln!(out, "<div class=\"signature-content\">{}</div>", content);
            }
            out.push_str("<div class=\"signature-line\"></div>\n");
            let _ = writeln!(
                out,
                "<div class=\"signature-label\">{}</div>",
                escape_html(label)
            );
            out.push_str("</div>\n");
        }
        Block::LegalDocument { document_type } => {
            let _ = writeln!(
                out,
                "<div class=\"block block-legal\" data-legal-document=\"{}\">{{{{legal.{}}}}}</div>",
                document_type.as_str(),
                document_type.placeholder_field()
            );
        }
        Block::Image { src, alt } => {
            let _ = writeln!(
                out,
                "<figure class=\"block block-image\"><img src=\"{}\" alt=\"{}\"></figure>",
                escape_html(src),
                escape_html(alt.as_deref().unwrap_or_default())
            );
        }
        Block::Divider => out.push_str("<hr class=\"block block-divider\">\n"),
        Block::PageBreak => out.push_str("<div class=\"block block-page-break\"></div>\n"),
    }
}

/// Strips characters that could end a CSS declaration early.
fn css_value(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>' | '\\'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn stylesheet(style: &DocumentStyle) -> String {
    let defaults = DocumentStyle::default();
    let font_family = match css_value(&style.font_family) {
        f if f.is_empty() => defaults.font_family,
        f => f,
    };
    let accent = match css_value(&style.accent_color) {
        c if c.is_empty() => defaults.accent_color,
        c => c,
    };
    let font_size = positive_or(style.font_size_pt, defaults.font_size_pt);
    let line_height = positive_or(style.line_height, defaults.line_height);
    let margin = if style.page_margin_mm.is_finite() && style.page_margin_mm >= 0.0 {
        style.page_margin_mm
    } else {
        defaults.page_margin_mm
    };

    format!(
        "@page {{ margin: {margin}mm; }}
.document {{ font-family: {font_family}; font-size: {font_size}pt; line-height: {line_height}; color: #111827; }}
.document h1, .document h2, .document h3, .document h4, .document h5, .document h6 {{ color: {accent}; }}
.block {{ margin: 0 0 0.8em 0; }}
.block-table {{ border-collapse: collapse; width: 100%; }}
.block-table th, .block-table td {{ border: 1px solid #d1d5db; padding: 0.3em 0.5em; text-align: left; }}
.block-columns {{ display: flex; gap: 1.5em; }}
.block-columns .column {{ flex: 1; }}
.block-signature {{ margin-top: 2.5em; }}
.signature-line {{ border-bottom: 1px solid {accent}; height: 2.5em; width: 60%; }}
.signature-label {{ font-size: 0.85em; color: #4b5563; }}
.block-image img {{ max-width: 100%; }}
.block-divider {{ border: 0; border-top: 1px solid #d1d5db; }}
.block-page-break {{ page-break-after: always; break-after: page; }}
.placeholder-missing {{ display: inline-block; min-width: 4em; border-bottom: 1px dashed #dc2626; }}
.preview-notice {{ margin-top: 1.5em; padding: 0.6em 0.8em; border: 1px solid #f59e0b; background: #fffbeb; color: #92400e; }}
"
    )
}

fn positive_or(value: f32, default: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        default
    }
}
