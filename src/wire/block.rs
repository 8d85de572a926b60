//! Wire block shapes.
//!
//! A wire block serializes to `{"object": "block", "type": <kind>,
//! <kind>: {...}}`. The payload key repeats the kind name, and for
//! headings the kind carries the level (`heading_2`), so serialization
//! is hand-written rather than derived.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// A minimal rich-text span: `{"type": "text", "text": {"content": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    /// Token kind; always `"text"` for spans built here
    #[serde(rename = "type")]
    pub kind: String,

    /// The text payload
    pub text: TextSpan,
}

/// The text payload of a rich-text span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Text content
    pub content: String,
}

impl RichText {
    /// Create a plain text span.
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: TextSpan {
                content: content.into(),
            },
        }
    }

    /// Get the span's content.
    pub fn content(&self) -> &str {
        &self.text.content
    }
}

/// The nested-object serialization of a block, one per document block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireBlock {
    /// `heading_{level}` block
    Heading {
        /// Heading level (1..=6, validated by the builder)
        level: u8,
        /// Heading rich text
        rich_text: Vec<RichText>,
    },

    /// `bulleted_list_item` block
    BulletItem {
        /// Item rich text
        rich_text: Vec<RichText>,
    },

    /// `numbered_list_item` block
    NumberedItem {
        /// Item rich text
        rich_text: Vec<RichText>,
    },

    /// `table` block with nested `table_row` children
    Table {
        /// Declared column count
        width: usize,
        /// Whether the first row is a header row
        has_column_header: bool,
        /// Whether the first column is a header column
        has_row_header: bool,
        /// Child rows
        children: Vec<WireRow>,
    },

    /// `paragraph` block
    Paragraph {
        /// Paragraph rich text
        rich_text: Vec<RichText>,
    },
}

impl WireBlock {
    /// The wire `type` tag this block serializes with.
    pub fn wire_type(&self) -> String {
        match self {
            WireBlock::Heading { level, .. } => format!("heading_{}", level),
            WireBlock::BulletItem { .. } => "bulleted_list_item".to_string(),
            WireBlock::NumberedItem { .. } => "numbered_list_item".to_string(),
            WireBlock::Table { .. } => "table".to_string(),
            WireBlock::Paragraph { .. } => "paragraph".to_string(),
        }
    }
}

/// A table row wire object: cells are lists of single-token rich text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRow {
    /// Cells in column order, each wrapped as rich-text spans
    pub cells: Vec<Vec<RichText>>,
}

#[derive(Serialize)]
struct RichTextPayload<'a> {
    rich_text: &'a [RichText],
}

#[derive(Serialize)]
struct TablePayload<'a> {
    table_width: usize,
    has_column_header: bool,
    has_row_header: bool,
    children: &'a [WireRow],
}

#[derive(Serialize)]
struct RowPayload<'a> {
    cells: &'a [Vec<RichText>],
}

impl Serialize for WireBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("object", "block")?;
        let kind = self.wire_type();
        map.serialize_entry("type", &kind)?;
        match self {
            WireBlock::Heading { rich_text, .. }
            | WireBlock::BulletItem { rich_text }
            | WireBlock::NumberedItem { rich_text }
            | WireBlock::Paragraph { rich_text } => {
                map.serialize_entry(&kind, &RichTextPayload { rich_text })?;
            }
            WireBlock::Table {
                width,
                has_column_header,
                has_row_header,
                children,
            } => {
                map.serialize_entry(
                    &kind,
                    &TablePayload {
                        table_width: *width,
                        has_column_header: *has_column_header,
                        has_row_header: *has_row_header,
                        children,
                    },
                )?;
            }
        }
        map.end()
    }
}

impl Serialize for WireRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("object", "block")?;
        map.serialize_entry("type", "table_row")?;
        map.serialize_entry("table_row", &RowPayload { cells: &self.cells })?;
        map.end()
    }
}
