//! # notemark
//!
//! Markdown ↔ note-service block conversion for Rust.
//!
//! This library parses a constrained Markdown subset into a typed block
//! document, builds the nested wire payloads a Notion-style "append
//! block children" call expects, and performs the inverse extraction:
//! flattening remotely stored block trees (sub-pages included) back
//! into plain text.
//!
//! ## Quick Start
//!
//! ```
//! use notemark::{parse_markdown, to_wire_blocks, BuildOptions};
//!
//! fn main() -> notemark::Result<()> {
//!     let doc = parse_markdown("# Notes\n- first\n| a | b |\n| 1 | 2 |");
//!     let blocks = to_wire_blocks(&doc, &BuildOptions::new())?;
//!     println!("{}", serde_json::to_string_pretty(&blocks).unwrap());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Markdown subset parsing**: headings, bullets, tables, paragraphs
//! - **Wire payload building**: append requests with optional insertion
//!   anchors and explicit cell-whitespace policies
//! - **Page text extraction**: paginated, recursive read-back through an
//!   injected block-listing collaborator
//! - **API marshalling**: the pass-through page/search/user operations,
//!   with a blocking HTTP transport behind the `client` feature

pub mod api;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod wire;

// Re-export commonly used types
pub use api::{page_title, Api, Method, PageMeta, PagePatch, SearchQuery, SubpageOptions, Transport};
pub use error::{Error, Result};
pub use extract::{page_text, BlockSource, ChildrenPage, RemoteBlock, DEFAULT_PAGE_SIZE};
pub use model::{Block, Document, Table, TableRow};
pub use parser::{parse_markdown, MAX_HEADING_LEVEL};
pub use wire::{
    append_request, table_block, to_wire_blocks, AppendRequest, BuildOptions, CellPolicy,
    RichText, TextSpan, WireBlock, WireRow,
};

#[cfg(feature = "client")]
pub use api::HttpTransport;

/// Parse Markdown and build the wire blocks for an append call in one
/// step.
///
/// # Example
///
/// ```
/// use notemark::{markdown_to_wire, BuildOptions};
///
/// let blocks = markdown_to_wire("# Title", &BuildOptions::new()).unwrap();
/// assert_eq!(blocks[0].wire_type(), "heading_1");
/// ```
pub fn markdown_to_wire(markdown: &str, options: &BuildOptions) -> Result<Vec<WireBlock>> {
    wire::to_wire_blocks(&parser::parse_markdown(markdown), options)
}

/// Parse Markdown and build the full append request, with an optional
/// insertion anchor.
pub fn markdown_to_request(
    markdown: &str,
    after: Option<&str>,
    options: &BuildOptions,
) -> Result<AppendRequest> {
    wire::append_request(&parser::parse_markdown(markdown), after, options)
}

/// Builder for converting Markdown into an append-ready payload.
///
/// # Example
///
/// ```
/// use notemark::Notemark;
///
/// let request = Notemark::new()
///     .preserve_cells()
///     .convert("| a | b |")
///     .into_request(Some("anchor-block"))?;
/// assert_eq!(request.after.as_deref(), Some("anchor-block"));
/// # Ok::<(), notemark::Error>(())
/// ```
pub struct Notemark {
    options: BuildOptions,
}

impl Notemark {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            options: BuildOptions::default(),
        }
    }

    /// Keep table cell whitespace verbatim instead of trimming it.
    pub fn preserve_cells(mut self) -> Self {
        self.options = self.options.with_cell_policy(CellPolicy::Preserve);
        self
    }

    /// Set the cell whitespace policy explicitly.
    pub fn with_cell_policy(mut self, policy: CellPolicy) -> Self {
        self.options = self.options.with_cell_policy(policy);
        self
    }

    /// Parse Markdown and return a result wrapper.
    pub fn convert(self, markdown: &str) -> NotemarkResult {
        NotemarkResult {
            document: parser::parse_markdown(markdown),
            options: self.options,
        }
    }
}

impl Default for Notemark {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a Markdown conversion.
pub struct NotemarkResult {
    /// The parsed document
    pub document: Document,
    options: BuildOptions,
}

impl NotemarkResult {
    /// Get the parsed document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Build the wire blocks.
    pub fn blocks(&self) -> Result<Vec<WireBlock>> {
        wire::to_wire_blocks(&self.document, &self.options)
    }

    /// Build the append request, with an optional insertion anchor.
    pub fn into_request(self, after: Option<&str>) -> Result<AppendRequest> {
        wire::append_request(&self.document, after, &self.options)
    }
}
