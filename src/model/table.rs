//! Table types.

use serde::{Deserialize, Serialize};

/// A table block.
///
/// `width` is recorded from the first row when the table is built from
/// parsed rows; later rows are NOT validated against it. Rows of
/// differing lengths pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Declared column count (length of the first row)
    pub width: usize,

    /// Whether the first row is a header row
    pub has_column_header: bool,

    /// Whether the first column is a header column
    pub has_row_header: bool,

    /// Rows in the table, in source order
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create an empty table with explicit header flags.
    pub fn new(width: usize, has_column_header: bool, has_row_header: bool) -> Self {
        Self {
            width,
            has_column_header,
            has_row_header,
            rows: Vec::new(),
        }
    }

    /// Build a table from parsed rows.
    ///
    /// Width is the first row's cell count (0 for no rows); the first row
    /// is treated as a column header, matching the Markdown table
    /// convention of a header row first.
    pub fn from_rows(rows: Vec<TableRow>) -> Self {
        let width = rows.first().map(|r| r.cells.len()).unwrap_or(0);
        Self {
            width,
            has_column_header: true,
            has_row_header: false,
            rows,
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row: an ordered sequence of cell strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in column order
    pub cells: Vec<String>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Create a row from string-like values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(Into::into).collect())
    }

    /// Get the number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells.join("\t")
    }
}
