//! Round-trip tests: Markdown → wire blocks → remote records → text.

use serde_json::{json, Value};

use notemark::error::Result;
use notemark::{
    markdown_to_wire, page_text, parse_markdown, to_wire_blocks, BlockSource, BuildOptions,
    ChildrenPage,
};

/// Turn a serialized wire block into the record shape the listing call
/// returns: the service echoes each span's content as its plain text.
fn echo_record(block: &Value, index: usize) -> Value {
    let kind = block["type"].as_str().unwrap().to_string();
    let mut payload = block[kind.as_str()].clone();
    if let Some(tokens) = payload
        .get_mut("rich_text")
        .and_then(Value::as_array_mut)
    {
        for token in tokens.iter_mut() {
            let content = token["text"]["content"].as_str().unwrap().to_string();
            token["plain_text"] = Value::String(content);
        }
    }

    let mut record = json!({ "id": format!("b{}", index), "type": kind.clone() });
    record[kind.as_str()] = payload;
    record
}

/// A single-page source holding prebuilt records.
struct EchoSource {
    records: Vec<Value>,
}

impl BlockSource for EchoSource {
    fn list_children(
        &self,
        _container_id: &str,
        _page_size: u32,
        _cursor: Option<&str>,
    ) -> Result<ChildrenPage> {
        Ok(ChildrenPage::last(self.records.clone()))
    }
}

fn roundtrip(markdown: &str) -> String {
    let blocks = markdown_to_wire(markdown, &BuildOptions::new()).unwrap();
    let records = blocks
        .iter()
        .map(|block| serde_json::to_value(block).unwrap())
        .enumerate()
        .map(|(index, value)| echo_record(&value, index))
        .collect();
    page_text(&EchoSource { records }, "page").unwrap()
}

#[test]
fn test_text_blocks_survive_roundtrip() {
    let markdown = "# A\n- b\nparagraph text";
    assert_eq!(roundtrip(markdown), "# A\n\n- b\n\nparagraph text");
}

#[test]
fn test_heading_levels_survive_roundtrip() {
    assert_eq!(roundtrip("### Deep Title"), "### Deep Title");
}

#[test]
fn test_bullet_marker_normalizes_to_dash() {
    // `*` bullets come back as `-`; the text itself is unchanged.
    assert_eq!(roundtrip("* starred"), "- starred");
}

#[test]
fn test_paragraph_whitespace_is_lossless() {
    assert_eq!(roundtrip("  spaced out  "), "  spaced out  ");
}

#[test]
fn test_empty_heading_survives() {
    assert_eq!(roundtrip("#"), "# ");
}

#[test]
fn test_wire_blocks_match_parsed_document() {
    // One wire block per document block, same order.
    let markdown = "# H\n- a\n- b\n| x | y |\ntail";
    let doc = parse_markdown(markdown);
    let blocks = to_wire_blocks(&doc, &BuildOptions::new()).unwrap();
    assert_eq!(blocks.len(), doc.block_count());

    let kinds: Vec<String> = blocks.iter().map(|b| b.wire_type()).collect();
    assert_eq!(
        kinds,
        vec![
            "heading_1",
            "bulleted_list_item",
            "bulleted_list_item",
            "table",
            "paragraph"
        ]
    );
}
