//! Line-oriented parser for the Markdown subset used by note blocks.
//!
//! The parser recognizes headings (`#`), bullets (`- ` / `* `), tables
//! (any line containing `|`) and paragraphs. It is deliberately lax:
//! there are no error cases, and malformed tables (rows of differing
//! lengths) are accepted as-is with the first row's length recorded as
//! the declared width.
//!
//! The parser never emits [`Block::NumberedItem`]; numbered semantics
//! only appear on the read-back side when extracting remotely stored
//! blocks.

use crate::model::{Block, Document, Table, TableRow};

/// Maximum heading level. Lines with more leading `#` characters than
/// this are clamped rather than rejected.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Parse a Markdown-subset string into an ordered block document.
///
/// Every non-blank input line maps to exactly one block, except table
/// lines, which aggregate into a single table per contiguous run. Empty
/// input yields an empty document. Pure function of its input; no I/O.
///
/// # Example
///
/// ```
/// use notemark::parse_markdown;
///
/// let doc = parse_markdown("# Title\n- item\nplain text");
/// assert_eq!(doc.block_count(), 3);
/// ```
pub fn parse_markdown(input: &str) -> Document {
    let mut blocks = Vec::new();
    let mut table_buffer: Vec<TableRow> = Vec::new();

    for line in input.lines() {
        // Table rows take priority over every other classification.
        if line.contains('|') {
            table_buffer.push(split_table_row(line));
            continue;
        }

        // Blank lines produce nothing and leave an open table run open:
        // only the next non-blank, non-table line closes it.
        if line.trim().is_empty() {
            continue;
        }

        if !table_buffer.is_empty() {
            blocks.push(flush_table(&mut table_buffer));
        }

        blocks.push(classify_line(line));
    }

    // Trailing table at end of input.
    if !table_buffer.is_empty() {
        blocks.push(flush_table(&mut table_buffer));
    }

    Document::from_blocks(blocks)
}

/// Tokenize a table line: split on `|`, trim each piece, drop empties.
///
/// `| a | b |` and `a|b` both tokenize to `["a", "b"]`.
fn split_table_row(line: &str) -> TableRow {
    let cells = line
        .split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect();
    TableRow::new(cells)
}

fn flush_table(buffer: &mut Vec<TableRow>) -> Block {
    Block::Table(Table::from_rows(std::mem::take(buffer)))
}

fn classify_line(line: &str) -> Block {
    if line.starts_with('#') {
        let hashes = line.bytes().take_while(|&b| b == b'#').count();
        // A run of `#` with no following text is a heading with empty
        // text, not a dropped line.
        let level = hashes.min(MAX_HEADING_LEVEL as usize) as u8;
        let text = line[hashes..].trim().to_string();
        return Block::Heading { level, text };
    }

    if let Some(rest) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
    {
        return Block::BulletItem {
            text: rest.trim().to_string(),
        };
    }

    // Fallback: the raw line, untrimmed.
    Block::Paragraph {
        text: line.to_string(),
    }
}
