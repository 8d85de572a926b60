//! Pass-through marshalling for the notes-service HTTP API.
//!
//! Every operation here is a single-field mapping from named parameters
//! onto a request body (or query), with optional fields omitted when
//! absent. The actual network call goes through the injected
//! [`Transport`] envelope; this layer performs no retries and owns no
//! state beyond the transport itself.

#[cfg(feature = "client")]
mod http;

#[cfg(feature = "client")]
pub use http::{HttpTransport, API_VERSION, DEFAULT_BASE_URL};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::extract::{self, BlockSource, ChildrenPage};
use crate::model::TableRow;
use crate::parser::parse_markdown;
use crate::wire::{append_request, table_block, AppendRequest, BuildOptions, WireBlock};

/// HTTP method of a remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET; a body, when present, travels as query parameters
    Get,
    /// POST with a JSON body
    Post,
    /// PATCH with a JSON body
    Patch,
}

impl Method {
    /// The method name on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
        }
    }
}

/// Uniform remote-call envelope: `{method, path, body} -> JSON`.
///
/// Implementations own authentication and transport-level concerns;
/// cancellation is abandoning the call.
pub trait Transport {
    /// Issue one remote call and return the decoded JSON response.
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value>;
}

/// Optional attributes for sub-page creation.
#[derive(Debug, Clone, Default)]
pub struct SubpageOptions {
    /// Page icon object (emoji or external)
    pub icon: Option<Value>,

    /// Page cover object
    pub cover: Option<Value>,

    /// Initial content blocks
    pub children: Option<Vec<WireBlock>>,
}

impl SubpageOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page icon.
    pub fn with_icon(mut self, icon: Value) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set the page cover.
    pub fn with_cover(mut self, cover: Value) -> Self {
        self.cover = Some(cover);
        self
    }

    /// Set the initial content blocks.
    pub fn with_children(mut self, children: Vec<WireBlock>) -> Self {
        self.children = Some(children);
        self
    }
}

/// Partial page update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PagePatch {
    /// Move the page to or out of the trash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_trash: Option<bool>,

    /// Archive or unarchive the page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,

    /// Property values to update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Value>,

    /// Page icon object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Value>,

    /// Page cover object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<Value>,
}

impl PagePatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the archived state.
    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = Some(archived);
        self
    }

    /// Set the trash state.
    pub fn in_trash(mut self, in_trash: bool) -> Self {
        self.in_trash = Some(in_trash);
        self
    }

    /// Set property values.
    pub fn properties(mut self, properties: Value) -> Self {
        self.properties = Some(properties);
        self
    }

    /// Set the page icon.
    pub fn icon(mut self, icon: Value) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Set the page cover.
    pub fn cover(mut self, cover: Value) -> Self {
        self.cover = Some(cover);
        self
    }
}

/// Search parameters; optional fields are omitted from the request body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchQuery {
    /// Text to search for
    pub query: String,

    /// Sort object (`direction` + `timestamp`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<Value>,

    /// Filter object (`property` + `value`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    /// Pagination cursor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,

    /// Items per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl SearchQuery {
    /// Create a query with the given search text.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    /// Set the sort object.
    pub fn with_sort(mut self, sort: Value) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the filter object.
    pub fn with_filter(mut self, filter: Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the pagination cursor.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.start_cursor = Some(cursor.into());
        self
    }

    /// Set the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Typed page metadata, a convenience subset of the full page object.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    /// Page id
    pub id: String,

    /// Title text, when the page carries a title property
    #[serde(skip)]
    pub title: Option<String>,

    /// Whether the page is archived
    #[serde(default)]
    pub archived: bool,

    /// Creation timestamp
    pub created_time: DateTime<Utc>,

    /// Last edit timestamp
    pub last_edited_time: DateTime<Utc>,

    /// Canonical URL
    #[serde(default)]
    pub url: Option<String>,
}

/// Extract the title text from a raw page object, if it has one.
///
/// Pages carry their title as the property whose value holds a `title`
/// token array; the property's name varies by container.
pub fn page_title(page: &Value) -> Option<String> {
    let properties = page.get("properties")?.as_object()?;
    for property in properties.values() {
        if let Some(parts) = property.get("title").and_then(Value::as_array) {
            return Some(
                parts
                    .iter()
                    .filter_map(|token| token.get("plain_text").and_then(Value::as_str))
                    .collect(),
            );
        }
    }
    None
}

/// Marshalling client over an injected transport.
pub struct Api<T: Transport> {
    transport: T,
}

impl<T: Transport> Api<T> {
    /// Create a client over the given transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Parse a Markdown string and append the resulting blocks to a page
    /// (or block). `PATCH blocks/{page_id}/children`.
    ///
    /// Table cells are trimmed on this path; use [`Api::create_table`]
    /// for verbatim cells.
    pub fn append_markdown(
        &self,
        page_id: &str,
        markdown: &str,
        after: Option<&str>,
    ) -> Result<Value> {
        let doc = parse_markdown(markdown);
        let request = append_request(&doc, after, &BuildOptions::new())?;
        self.append_children(page_id, &request)
    }

    /// Append a single table built from explicit rows, cells verbatim.
    /// `PATCH blocks/{page_id}/children`.
    pub fn create_table(
        &self,
        page_id: &str,
        rows: &[TableRow],
        has_column_header: bool,
        has_row_header: bool,
        after: Option<&str>,
    ) -> Result<Value> {
        let block = table_block(
            rows,
            has_column_header,
            has_row_header,
            &BuildOptions::preserve_cells(),
        );
        let mut request = AppendRequest::new(vec![block]);
        if let Some(after) = after {
            request = request.with_after(after);
        }
        self.append_children(page_id, &request)
    }

    /// Send a prebuilt append request. `PATCH blocks/{page_id}/children`.
    pub fn append_children(&self, page_id: &str, request: &AppendRequest) -> Result<Value> {
        let body = serde_json::to_value(request)?;
        self.transport.request(
            Method::Patch,
            &format!("blocks/{}/children", page_id),
            Some(&body),
        )
    }

    /// Recursively extract all visible text from a page, sub-pages
    /// included.
    pub fn page_text(&self, page_id: &str) -> Result<String> {
        extract::page_text(self, page_id)
    }

    /// Update the title of a page. `PATCH pages/{page_id}`.
    pub fn update_page_title(&self, page_id: &str, new_title: &str) -> Result<Value> {
        let body = json!({
            "properties": {
                "title": [
                    { "type": "text", "text": { "content": new_title } }
                ]
            }
        });
        self.transport
            .request(Method::Patch, &format!("pages/{}", page_id), Some(&body))
    }

    /// Create a new sub-page under the given page. `POST pages`.
    pub fn create_subpage(
        &self,
        page_id: &str,
        title: &str,
        options: &SubpageOptions,
    ) -> Result<Value> {
        let mut body = Map::new();
        body.insert(
            "parent".to_string(),
            json!({ "type": "page_id", "page_id": page_id }),
        );
        body.insert(
            "properties".to_string(),
            json!({
                "title": [
                    { "type": "text", "text": { "content": title } }
                ]
            }),
        );
        if let Some(icon) = &options.icon {
            body.insert("icon".to_string(), icon.clone());
        }
        if let Some(cover) = &options.cover {
            body.insert("cover".to_string(), cover.clone());
        }
        if let Some(children) = &options.children {
            body.insert("children".to_string(), serde_json::to_value(children)?);
        }
        self.transport
            .request(Method::Post, "pages", Some(&Value::Object(body)))
    }

    /// Retrieve a page's properties (no block content).
    /// `GET pages/{page_id}`.
    pub fn retrieve_page(
        &self,
        page_id: &str,
        filter_properties: Option<&[&str]>,
    ) -> Result<Value> {
        let body = filter_properties.map(|ids| json!({ "filter_properties": ids }));
        self.transport
            .request(Method::Get, &format!("pages/{}", page_id), body.as_ref())
    }

    /// Update a page's properties, icon, cover, or archive state.
    /// `PATCH pages/{page_id}`.
    pub fn update_page(&self, page_id: &str, patch: &PagePatch) -> Result<Value> {
        let body = serde_json::to_value(patch)?;
        self.transport
            .request(Method::Patch, &format!("pages/{}", page_id), Some(&body))
    }

    /// Retrieve a single page property's items, paginated.
    /// `GET pages/{page_id}/properties/{property_id}`.
    pub fn retrieve_page_property(
        &self,
        page_id: &str,
        property_id: &str,
        start_cursor: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<Value> {
        let body = pagination_body(start_cursor, page_size);
        self.transport.request(
            Method::Get,
            &format!("pages/{}/properties/{}", page_id, property_id),
            body.as_ref(),
        )
    }

    /// Search all pages and databases shared with the integration,
    /// returning the matching objects. `POST search`.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<Value>> {
        let body = serde_json::to_value(query)?;
        let response = self.transport.request(Method::Post, "search", Some(&body))?;
        Ok(response
            .get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// List all users in the workspace. `GET users`.
    pub fn list_users(
        &self,
        start_cursor: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<Value> {
        let body = pagination_body(start_cursor, page_size);
        self.transport.request(Method::Get, "users", body.as_ref())
    }

    /// Retrieve a user by id. `GET users/{user_id}`.
    pub fn retrieve_user(&self, user_id: &str) -> Result<Value> {
        self.transport
            .request(Method::Get, &format!("users/{}", user_id), None)
    }

    /// Retrieve the integration's bot user. `GET users/me`.
    pub fn me(&self) -> Result<Value> {
        self.transport.request(Method::Get, "users/me", None)
    }

    /// Typed convenience over [`Api::retrieve_page`].
    pub fn page_meta(&self, page_id: &str) -> Result<PageMeta> {
        let page = self.retrieve_page(page_id, None)?;
        let mut meta: PageMeta = serde_json::from_value(page.clone())?;
        meta.title = page_title(&page);
        Ok(meta)
    }
}

impl<T: Transport> BlockSource for Api<T> {
    fn list_children(
        &self,
        container_id: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<ChildrenPage> {
        let mut body = Map::new();
        body.insert("page_size".to_string(), json!(page_size));
        if let Some(cursor) = cursor {
            body.insert("start_cursor".to_string(), json!(cursor));
        }
        let response = self.transport.request(
            Method::Get,
            &format!("blocks/{}/children", container_id),
            Some(&Value::Object(body)),
        )?;
        Ok(serde_json::from_value(response)?)
    }
}

fn pagination_body(start_cursor: Option<&str>, page_size: Option<u32>) -> Option<Value> {
    let mut body = Map::new();
    if let Some(cursor) = start_cursor {
        body.insert("start_cursor".to_string(), json!(cursor));
    }
    if let Some(size) = page_size {
        body.insert("page_size".to_string(), json!(size));
    }
    if body.is_empty() {
        None
    } else {
        Some(Value::Object(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records every request and replays canned responses.
    struct MockTransport {
        calls: RefCell<Vec<(Method, String, Option<Value>)>>,
        response: Value,
    }

    impl MockTransport {
        fn new(response: Value) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                response,
            }
        }
    }

    impl Transport for MockTransport {
        fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
            self.calls
                .borrow_mut()
                .push((method, path.to_string(), body.cloned()));
            Ok(self.response.clone())
        }
    }

    #[test]
    fn test_append_markdown_marshalling() {
        let transport = MockTransport::new(json!({ "object": "list" }));
        let api = Api::new(transport);
        api.append_markdown("page-1", "# Hi\ntext", Some("anchor"))
            .unwrap();

        let calls = api.transport().calls.borrow();
        let (method, path, body) = &calls[0];
        assert_eq!(*method, Method::Patch);
        assert_eq!(path, "blocks/page-1/children");

        let body = body.as_ref().unwrap();
        assert_eq!(body["after"], "anchor");
        assert_eq!(body["children"].as_array().unwrap().len(), 2);
        assert_eq!(body["children"][0]["type"], "heading_1");
    }

    #[test]
    fn test_create_table_preserves_cells() {
        let transport = MockTransport::new(json!({}));
        let api = Api::new(transport);
        api.create_table(
            "page-1",
            &[TableRow::from_strings([" a ", "b"])],
            true,
            false,
            None,
        )
        .unwrap();

        let calls = api.transport().calls.borrow();
        let body = calls[0].2.as_ref().unwrap();
        assert!(body.get("after").is_none());
        let table = &body["children"][0]["table"];
        assert_eq!(table["table_width"], 2);
        assert_eq!(
            table["children"][0]["table_row"]["cells"][0][0]["text"]["content"],
            " a "
        );
    }

    #[test]
    fn test_update_page_omits_unset_fields() {
        let transport = MockTransport::new(json!({}));
        let api = Api::new(transport);
        api.update_page("page-1", &PagePatch::new().archived(true))
            .unwrap();

        let calls = api.transport().calls.borrow();
        let body = calls[0].2.as_ref().unwrap();
        assert_eq!(body["archived"], true);
        assert!(body.get("in_trash").is_none());
        assert!(body.get("properties").is_none());
    }

    #[test]
    fn test_search_returns_results_array() {
        let transport = MockTransport::new(json!({
            "results": [{ "id": "p1" }, { "id": "p2" }]
        }));
        let api = Api::new(transport);
        let results = api.search(&SearchQuery::new("notes")).unwrap();
        assert_eq!(results.len(), 2);

        let calls = api.transport().calls.borrow();
        let body = calls[0].2.as_ref().unwrap();
        assert_eq!(body["query"], "notes");
        assert!(body.get("sort").is_none());
        assert!(body.get("page_size").is_none());
    }

    #[test]
    fn test_search_without_results_field() {
        let transport = MockTransport::new(json!({ "object": "error" }));
        let api = Api::new(transport);
        assert!(api.search(&SearchQuery::new("x")).unwrap().is_empty());
    }

    #[test]
    fn test_create_subpage_optional_fields() {
        let transport = MockTransport::new(json!({}));
        let api = Api::new(transport);
        api.create_subpage("parent-1", "Child", &SubpageOptions::new())
            .unwrap();

        let calls = api.transport().calls.borrow();
        let (method, path, body) = &calls[0];
        assert_eq!(*method, Method::Post);
        assert_eq!(path, "pages");

        let body = body.as_ref().unwrap();
        assert_eq!(body["parent"]["page_id"], "parent-1");
        assert_eq!(
            body["properties"]["title"][0]["text"]["content"],
            "Child"
        );
        assert!(body.get("icon").is_none());
        assert!(body.get("children").is_none());
    }

    #[test]
    fn test_list_children_marshalling() {
        let transport = MockTransport::new(json!({
            "results": [],
            "next_cursor": null,
            "has_more": false
        }));
        let api = Api::new(transport);
        let page = api.list_children("c1", 100, Some("cur")).unwrap();
        assert!(!page.has_more);

        let calls = api.transport().calls.borrow();
        let body = calls[0].2.as_ref().unwrap();
        assert_eq!(body["page_size"], 100);
        assert_eq!(body["start_cursor"], "cur");
    }

    #[test]
    fn test_page_title_extraction() {
        let page = json!({
            "properties": {
                "Name": {
                    "title": [
                        { "plain_text": "My " },
                        { "plain_text": "Page" }
                    ]
                }
            }
        });
        assert_eq!(page_title(&page), Some("My Page".to_string()));
        assert_eq!(page_title(&json!({})), None);
    }

    #[test]
    fn test_page_meta() {
        let transport = MockTransport::new(json!({
            "id": "p1",
            "archived": false,
            "created_time": "2024-01-01T00:00:00.000Z",
            "last_edited_time": "2024-06-01T12:00:00.000Z",
            "url": "https://example.org/p1",
            "properties": {
                "title": { "title": [{ "plain_text": "Home" }] }
            }
        }));
        let api = Api::new(transport);
        let meta = api.page_meta("p1").unwrap();
        assert_eq!(meta.id, "p1");
        assert_eq!(meta.title.as_deref(), Some("Home"));
        assert!(!meta.archived);
        assert_eq!(meta.url.as_deref(), Some("https://example.org/p1"));
    }
}
