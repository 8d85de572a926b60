//! Document-to-wire payload building.

use serde::Serialize;

use super::{RichText, WireBlock, WireRow};
use crate::error::{Error, Result};
use crate::model::{Block, Document, TableRow};

/// Cell whitespace handling when building table payloads.
///
/// The two entry points historically disagreed: the bulk Markdown append
/// path trims cell whitespace, the direct table-creation path keeps it
/// verbatim. Both behaviors are kept, selected explicitly here instead
/// of silently unified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellPolicy {
    /// Trim surrounding whitespace from each cell (bulk append default)
    #[default]
    Trim,
    /// Keep cell text verbatim (direct table-creation default)
    Preserve,
}

/// Options for building wire payloads.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Table cell whitespace policy
    pub cell_policy: CellPolicy,
}

impl BuildOptions {
    /// Create new build options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cell whitespace policy.
    pub fn with_cell_policy(mut self, policy: CellPolicy) -> Self {
        self.cell_policy = policy;
        self
    }

    /// Shorthand for the verbatim-cell configuration.
    pub fn preserve_cells() -> Self {
        Self::new().with_cell_policy(CellPolicy::Preserve)
    }
}

/// Request body for the remote "append block children" call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppendRequest {
    /// Wire blocks to append, in order
    pub children: Vec<WireBlock>,

    /// Block id after which to insert; appended to the end when absent.
    /// Omitted from serialization when `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl AppendRequest {
    /// Create a request that appends to the end of the container.
    pub fn new(children: Vec<WireBlock>) -> Self {
        Self {
            children,
            after: None,
        }
    }

    /// Anchor the insertion after the given block id.
    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }
}

/// Convert a document into ordered wire blocks, one per document block.
pub fn to_wire_blocks(doc: &Document, options: &BuildOptions) -> Result<Vec<WireBlock>> {
    doc.blocks
        .iter()
        .map(|block| to_wire_block(block, options))
        .collect()
}

/// Build a full append request from a document and an optional anchor.
pub fn append_request(
    doc: &Document,
    after: Option<&str>,
    options: &BuildOptions,
) -> Result<AppendRequest> {
    let mut request = AppendRequest::new(to_wire_blocks(doc, options)?);
    if let Some(after) = after {
        request = request.with_after(after);
    }
    Ok(request)
}

/// Build a single table wire block from explicit rows.
///
/// This is the direct table-creation path: width comes from the first
/// row (0 when there are none), and cells default to verbatim text via
/// the caller's options.
pub fn table_block(
    rows: &[TableRow],
    has_column_header: bool,
    has_row_header: bool,
    options: &BuildOptions,
) -> WireBlock {
    let width = rows.first().map(|row| row.cells.len()).unwrap_or(0);
    WireBlock::Table {
        width,
        has_column_header,
        has_row_header,
        children: wire_rows(rows, options.cell_policy),
    }
}

fn to_wire_block(block: &Block, options: &BuildOptions) -> Result<WireBlock> {
    match block {
        Block::Heading { level, text } => {
            if !(1..=6).contains(level) {
                return Err(Error::Conversion(format!(
                    "heading level {} is outside 1..=6",
                    level
                )));
            }
            Ok(WireBlock::Heading {
                level: *level,
                rich_text: vec![RichText::plain(text)],
            })
        }
        Block::BulletItem { text } => Ok(WireBlock::BulletItem {
            rich_text: vec![RichText::plain(text)],
        }),
        Block::NumberedItem { text } => Ok(WireBlock::NumberedItem {
            rich_text: vec![RichText::plain(text)],
        }),
        Block::Paragraph { text } => Ok(WireBlock::Paragraph {
            rich_text: vec![RichText::plain(text)],
        }),
        Block::Table(table) => Ok(WireBlock::Table {
            width: table.width,
            has_column_header: table.has_column_header,
            has_row_header: table.has_row_header,
            children: wire_rows(&table.rows, options.cell_policy),
        }),
    }
}

fn wire_rows(rows: &[TableRow], policy: CellPolicy) -> Vec<WireRow> {
    rows.iter()
        .map(|row| WireRow {
            cells: row
                .cells
                .iter()
                .map(|cell| vec![wire_cell(cell, policy)])
                .collect(),
        })
        .collect()
}

fn wire_cell(cell: &str, policy: CellPolicy) -> RichText {
    match policy {
        CellPolicy::Trim => RichText::plain(cell.trim()),
        CellPolicy::Preserve => RichText::plain(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;

    #[test]
    fn test_text_blocks_pass_through_losslessly() {
        let doc = Document::from_blocks(vec![
            Block::heading(1, "A"),
            Block::bullet("b"),
            Block::paragraph("  raw line  "),
        ]);
        let blocks = to_wire_blocks(&doc, &BuildOptions::new()).unwrap();

        let WireBlock::Heading { level, rich_text } = &blocks[0] else {
            panic!("expected heading");
        };
        assert_eq!(*level, 1);
        assert_eq!(rich_text[0].content(), "A");

        let WireBlock::Paragraph { rich_text } = &blocks[2] else {
            panic!("expected paragraph");
        };
        assert_eq!(rich_text[0].content(), "  raw line  ");
    }

    #[test]
    fn test_heading_level_out_of_range() {
        let doc = Document::from_blocks(vec![Block::heading(0, "bad")]);
        let err = to_wire_blocks(&doc, &BuildOptions::new()).unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));

        let doc = Document::from_blocks(vec![Block::heading(7, "bad")]);
        assert!(to_wire_blocks(&doc, &BuildOptions::new()).is_err());
    }

    #[test]
    fn test_cell_policy_trim_vs_preserve() {
        let rows = vec![TableRow::from_strings([" a ", "b"])];

        let trimmed = table_block(&rows, true, false, &BuildOptions::new());
        let WireBlock::Table { children, .. } = &trimmed else {
            panic!("expected table");
        };
        assert_eq!(children[0].cells[0][0].content(), "a");

        let verbatim = table_block(&rows, true, false, &BuildOptions::preserve_cells());
        let WireBlock::Table { children, .. } = &verbatim else {
            panic!("expected table");
        };
        assert_eq!(children[0].cells[0][0].content(), " a ");
    }

    #[test]
    fn test_table_block_width_from_first_row() {
        let rows = vec![
            TableRow::from_strings(["a", "b", "c"]),
            TableRow::from_strings(["1"]),
        ];
        let block = table_block(&rows, true, true, &BuildOptions::new());
        let WireBlock::Table {
            width,
            has_row_header,
            ..
        } = &block
        else {
            panic!("expected table");
        };
        assert_eq!(*width, 3);
        assert!(*has_row_header);
    }

    #[test]
    fn test_empty_rows_give_zero_width() {
        let block = table_block(&[], true, false, &BuildOptions::new());
        let WireBlock::Table {
            width, children, ..
        } = &block
        else {
            panic!("expected table");
        };
        assert_eq!(*width, 0);
        assert!(children.is_empty());
    }

    #[test]
    fn test_document_table_keeps_declared_width() {
        let table = Table::from_rows(vec![
            TableRow::from_strings(["x", "y"]),
            TableRow::from_strings(["1", "2", "3"]),
        ]);
        let doc = Document::from_blocks(vec![Block::Table(table)]);
        let blocks = to_wire_blocks(&doc, &BuildOptions::new()).unwrap();

        let WireBlock::Table { width, .. } = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(*width, 2);
    }

    #[test]
    fn test_after_omitted_when_absent() {
        let doc = Document::from_blocks(vec![Block::paragraph("x")]);
        let request = append_request(&doc, None, &BuildOptions::new()).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("after").is_none());
        assert_eq!(json["children"].as_array().unwrap().len(), 1);

        let anchored = append_request(&doc, Some("block-7"), &BuildOptions::new()).unwrap();
        let json = serde_json::to_value(&anchored).unwrap();
        assert_eq!(json["after"], "block-7");
    }
}
