//! The structured content of a template: an ordered tree of blocks.
//!
//! The visual editor produces this tree. Order is significant, it is the
//! render order, so the tree is kept as plain vectors and serialized to JSON
//! without any reordering.

use crate::model::legal::LegalDocumentType;
use serde::{Deserialize, Serialize};

/// One content block. Text payloads are inline markup fragments and may
/// embed placeholder tokens such as `{{member.firstName}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Heading {
        level: u8,
        content: String,
    },
    Paragraph {
        content: String,
    },
    List {
        #[serde(default)]
        ordered: bool,
        items: Vec<String>,
    },
    Table {
        #[serde(default)]
        header: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// A titled group of nested blocks.
    Section {
        #[serde(default)]
        title: Option<String>,
        children: Vec<Block>,
    },
    /// Side-by-side columns, each an ordered list of blocks.
    Columns {
        columns: Vec<Vec<Block>>,
    },
    Signature {
        label: String,
        #[serde(default)]
        content: String,
    },
    /// Transclusion of the tenant's currently active legal document.
    LegalDocument {
        document_type: LegalDocumentType,
    },
    Image {
        src: String,
        #[serde(default)]
        alt: Option<String>,
    },
    Divider,
    PageBreak,
}

impl Block {
    /// Visits this block and all nested blocks in render order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Block)) {
        visit(self);
        match self {
            Block::Section { children, .. } => {
                for child in children {
                    child.walk(visit);
                }
            }
            Block::Columns { columns } => {
                for column in columns {
                    for child in column {
                        child.walk(visit);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Page-level styling captured alongside the blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStyle {
    pub font_family: String,
    pub font_size_pt: f32,
    pub line_height: f32,
    pub accent_color: String,
    pub page_margin_mm: f32,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            font_size_pt: 10.5,
            line_height: 1.4,
            accent_color: "#1f2937".to_string(),
            page_margin_mm: 20.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredContent {
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub style: DocumentStyle,
}

impl StructuredContent {
    /// Legal document types transcluded anywhere in the tree, in first-seen order.
    pub fn referenced_legal_documents(&self) -> Vec<LegalDocumentType> {
        let mut found = Vec::new();
        for block in &self.blocks {
            block.walk(&mut |b| {
                if let Block::LegalDocument { document_type } = b {
                    if !found.contains(document_type) {
                        found.push(*document_type);
                    }
                }
            });
        }
        found
    }
}
