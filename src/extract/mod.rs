//! Flattened text extraction from remotely stored block trees.
//!
//! The extractor walks the child blocks of a container through an
//! injected [`BlockSource`] collaborator, renders each record to text,
//! and recurses into sub-pages inline, at the point of visit. Any fault
//! anywhere in the walk aborts the whole invocation with a single
//! [`Error::Extraction`]; no partial text is returned.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Default number of records requested per page fetch.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// One page of child block records plus the continuation cursor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChildrenPage {
    /// Raw block records, in container order
    #[serde(default)]
    pub results: Vec<Value>,

    /// Cursor for the next fetch, when `has_more` is set
    #[serde(default)]
    pub next_cursor: Option<String>,

    /// Whether another page of records follows
    #[serde(default)]
    pub has_more: bool,
}

impl ChildrenPage {
    /// Create a final page holding the given records.
    pub fn last(results: Vec<Value>) -> Self {
        Self {
            results,
            next_cursor: None,
            has_more: false,
        }
    }

    /// Create a non-final page continuing at `cursor`.
    pub fn continued(results: Vec<Value>, cursor: impl Into<String>) -> Self {
        Self {
            results,
            next_cursor: Some(cursor.into()),
            has_more: true,
        }
    }
}

/// Collaborator that lists the child blocks of a container.
///
/// One call returns one page of records; the extractor keeps fetching
/// with the returned cursor until the container is exhausted. The fetch
/// may block or suspend internally; retries, if any, belong to the
/// implementation's caller, never to the extractor.
pub trait BlockSource {
    /// Fetch one page of child records for `container_id`.
    fn list_children(
        &self,
        container_id: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage>;
}

/// A remote block record decoded to what text extraction needs.
///
/// Remote payloads arrive keyed by their `type` tag; decoding reduces
/// them to this closed variant set so rendering never inspects raw JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteBlock {
    /// `heading_{level}`; level is carried through unclamped
    Heading {
        /// Level parsed from the type tag
        level: u8,
        /// Concatenated plain text
        text: String,
    },

    /// `bulleted_list_item`
    BulletItem {
        /// Concatenated plain text
        text: String,
    },

    /// `numbered_list_item`
    NumberedItem {
        /// Concatenated plain text
        text: String,
    },

    /// `child_page`: a nested page to resolve recursively
    SubPage {
        /// Page id of the sub-page
        id: String,
        /// Sub-page title
        title: String,
    },

    /// Any other kind carrying rich-text tokens
    Text {
        /// Concatenated plain text (may be empty if the tokens are)
        text: String,
    },

    /// A kind with no textual content (dividers and the like)
    Empty,
}

impl RemoteBlock {
    /// Decode a raw record.
    ///
    /// A record without a string `type` field is malformed, as is a
    /// `heading_*` tag whose suffix is not a number.
    pub fn decode(record: &Value) -> Result<RemoteBlock> {
        let kind = record
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MalformedRecord("missing `type` field".to_string()))?;
        let null = Value::Null;
        let payload = record.get(kind).unwrap_or(&null);

        if let Some(suffix) = kind.strip_prefix("heading_") {
            let level = suffix.parse::<u8>().map_err(|_| {
                Error::MalformedRecord(format!("unrecognized heading kind `{}`", kind))
            })?;
            return Ok(RemoteBlock::Heading {
                level,
                text: plain_text(payload),
            });
        }

        match kind {
            "bulleted_list_item" => Ok(RemoteBlock::BulletItem {
                text: plain_text(payload),
            }),
            "numbered_list_item" => Ok(RemoteBlock::NumberedItem {
                text: plain_text(payload),
            }),
            "child_page" => {
                let id = record
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        Error::MalformedRecord("child_page record missing `id`".to_string())
                    })?
                    .to_string();
                let title = payload
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or("<no title>")
                    .to_string();
                Ok(RemoteBlock::SubPage { id, title })
            }
            _ => {
                if tokens(payload).is_empty() {
                    Ok(RemoteBlock::Empty)
                } else {
                    Ok(RemoteBlock::Text {
                        text: plain_text(payload),
                    })
                }
            }
        }
    }
}

/// Extract all visible text from a container, recursing into sub-pages.
///
/// Blocks render in input order, separated by blank lines. Each
/// invocation re-fetches the container from the start; nothing is
/// cached between calls.
pub fn page_text<S: BlockSource>(source: &S, container_id: &str) -> Result<String> {
    page_text_with_size(source, container_id, DEFAULT_PAGE_SIZE)
}

/// [`page_text`] with an explicit per-fetch page size.
pub fn page_text_with_size<S: BlockSource>(
    source: &S,
    container_id: &str,
    page_size: u32,
) -> Result<String> {
    collect_parts(source, container_id, page_size)
        .map_err(|err| Error::Extraction(Box::new(err)))
}

fn collect_parts<S: BlockSource>(
    source: &S,
    container_id: &str,
    page_size: u32,
) -> Result<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = source.list_children(container_id, page_size, cursor.as_deref())?;
        log::debug!(
            "fetched {} child records for container {}",
            page.results.len(),
            container_id
        );

        for record in &page.results {
            match RemoteBlock::decode(record)? {
                RemoteBlock::Heading { level, text } => {
                    parts.push(format!("{} {}", "#".repeat(level as usize), text));
                }
                RemoteBlock::BulletItem { text } => parts.push(format!("- {}", text)),
                // The numbered prefix is a literal, not a counter.
                RemoteBlock::NumberedItem { text } => parts.push(format!("1. {}", text)),
                RemoteBlock::Text { text } => parts.push(text),
                RemoteBlock::SubPage { id, title } => {
                    // Sub-pages resolve inline, depth-first, before any
                    // later sibling is rendered.
                    let sub = collect_parts(source, &id, page_size)?;
                    parts.push(format!("\n--- Sub-page: {} ({}) ---\n{}", title, id, sub));
                }
                RemoteBlock::Empty => {}
            }
        }

        if !page.has_more {
            break;
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(parts.join("\n\n"))
}

/// Rich-text token lists live under `rich_text`, with `text` as the
/// legacy fallback key; an empty list falls through to the next key.
fn tokens(payload: &Value) -> &[Value] {
    for key in ["rich_text", "text"] {
        if let Some(arr) = payload.get(key).and_then(Value::as_array) {
            if !arr.is_empty() {
                return arr;
            }
        }
    }
    &[]
}

fn plain_text(payload: &Value) -> String {
    tokens(payload)
        .iter()
        .filter_map(|token| token.get("plain_text").and_then(Value::as_str))
        .collect()
}
