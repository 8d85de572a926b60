//! Block and document types.

use super::Table;
use serde::{Deserialize, Serialize};

/// A typed unit of document content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A heading with level 1..=6
    Heading {
        /// Heading level (1..=6)
        level: u8,
        /// Heading text
        text: String,
    },

    /// A bulleted list item
    BulletItem {
        /// Item text
        text: String,
    },

    /// A numbered list item.
    ///
    /// The Markdown parser never produces this variant; it exists for
    /// documents assembled by hand and for wire-payload building.
    NumberedItem {
        /// Item text
        text: String,
    },

    /// A table
    Table(Table),

    /// A plain paragraph
    Paragraph {
        /// Paragraph text, carried verbatim from the source line
        text: String,
    },
}

impl Block {
    /// Create a heading block.
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            text: text.into(),
        }
    }

    /// Create a bulleted list item.
    pub fn bullet(text: impl Into<String>) -> Self {
        Block::BulletItem { text: text.into() }
    }

    /// Create a numbered list item.
    pub fn numbered(text: impl Into<String>) -> Self {
        Block::NumberedItem { text: text.into() }
    }

    /// Create a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    /// Check if this block is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { text, .. }
            | Block::BulletItem { text }
            | Block::NumberedItem { text }
            | Block::Paragraph { text } => text.clone(),
            Block::Table(table) => table.plain_text(),
        }
    }
}

/// An ordered sequence of blocks.
///
/// A document is constructed fresh per conversion call and is not
/// mutated afterwards; block order reproduces source line order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Blocks in source order
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Create a document from blocks.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Add a block to the document.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Get the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
