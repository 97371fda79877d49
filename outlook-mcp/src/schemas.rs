//! MCP tool parameter schemas
//!
//! Defines the input parameter structures for all MCP tools.
//! All structs derive `Debug`, `Deserialize`, and `JsonSchema` as required by rmcp.
//! `into_request` validates a parameter set into the core request type, so
//! malformed input is rejected before a mail session is opened.

use outlook_mcp_core::error::CoreResult;
use outlook_mcp_core::types::{FilterRequest, ListRequest, OutputMode, ReadRequest, SearchRequest};
use outlook_mcp_core::utils::datetime::{parse_optional_date, DateRange};
use schemars::JsonSchema;
use serde::Deserialize;

fn date_range(since: Option<&str>, until: Option<&str>) -> CoreResult<DateRange> {
    DateRange::new(
        parse_optional_date("since", since)?,
        parse_optional_date("until", until)?,
    )
}

/// Parameters for `outlook_list` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListParams {
    /// Path to list: empty for accounts, `account` for folders, `account/Folder/Sub` for items.
    #[schemars(
        description = "Path to list: empty for accounts, 'account' for its folders, 'account/Folder/Sub' for items"
    )]
    pub path: Option<String>,

    /// Include system folders and public stores, and lift the item cap.
    #[schemars(description = "Include system folders and public stores, and lift the item cap")]
    pub all: Option<bool>,

    /// Maximum number of items to return (default: 50).
    #[schemars(description = "Maximum number of items to return (default: 50)")]
    pub count: Option<usize>,
}

impl ListParams {
    pub fn into_request(self) -> CoreResult<ListRequest> {
        ListRequest::new(
            self.path.as_deref().unwrap_or_default(),
            self.all.unwrap_or(false),
            self.count,
        )
    }
}

/// Parameters for `outlook_filter` tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct FilterParams {
    /// Scope: empty for all accounts, an account, or a folder path.
    #[schemars(description = "Scope: empty for all accounts, an account name, or a folder path")]
    pub path: Option<String>,

    /// Earliest date, inclusive (YYYY-MM-DD).
    #[schemars(description = "Earliest date, inclusive (YYYY-MM-DD)")]
    pub since: Option<String>,

    /// Latest date, inclusive (YYYY-MM-DD).
    #[schemars(description = "Latest date, inclusive (YYYY-MM-DD)")]
    pub until: Option<String>,

    /// Only items from the last N days.
    #[schemars(description = "Only items from the last N days")]
    pub days: Option<u32>,

    /// Sender name or address substring.
    #[schemars(description = "Sender name or address substring")]
    pub from_sender: Option<String>,

    /// Item type: email, event, contact or task.
    #[serde(rename = "type")]
    #[schemars(description = "Item type: email, event, contact or task")]
    pub item_type: Option<String>,

    /// Only unread items.
    #[schemars(description = "Only unread items")]
    pub unread: Option<bool>,

    /// Maximum number of results (default: 100).
    #[schemars(description = "Maximum number of results (default: 100)")]
    pub max_items: Option<usize>,
}

impl FilterParams {
    pub fn into_request(self) -> CoreResult<FilterRequest> {
        let range = date_range(self.since.as_deref(), self.until.as_deref())?;
        FilterRequest::new(self.path.as_deref().unwrap_or_default(), range)?
            .with_days_back(self.days)
            .with_sender(self.from_sender.as_deref())
            .with_item_type(self.item_type.as_deref())?
            .with_unread_only(self.unread.unwrap_or(false))
            .with_max_items(self.max_items)
    }
}

/// Search output detail.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchOutputMode {
    /// Metadata only
    List,
    /// Metadata plus relevance ranking and body snippets
    Content,
}

impl From<SearchOutputMode> for OutputMode {
    fn from(mode: SearchOutputMode) -> Self {
        match mode {
            SearchOutputMode::List => Self::List,
            SearchOutputMode::Content => Self::Content,
        }
    }
}

/// Parameters for `outlook_search` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Search pattern: spaces mean OR, `&` means AND.
    #[schemars(
        description = "Search pattern: spaces mean OR, '&' means AND. 'ZRH EWR&United' = (ZRH OR EWR) AND United"
    )]
    pub pattern: String,

    /// Folder to search, e.g. `account/Inbox`.
    #[schemars(description = "Folder to search, e.g. 'account/Inbox'")]
    pub path: String,

    /// `list` (default) or `content` for ranked results with snippets.
    #[schemars(description = "'list' (default) or 'content' for ranked results with body snippets")]
    pub output_mode: Option<SearchOutputMode>,

    /// Earliest received date, inclusive (YYYY-MM-DD).
    #[schemars(description = "Earliest received date, inclusive (YYYY-MM-DD)")]
    pub since: Option<String>,

    /// Latest received date, inclusive (YYYY-MM-DD).
    #[schemars(description = "Latest received date, inclusive (YYYY-MM-DD)")]
    pub until: Option<String>,

    /// Number of results to skip (page size: 25).
    #[schemars(description = "Number of results to skip (page size: 25)")]
    pub offset: Option<usize>,
}

impl SearchParams {
    pub fn into_request(self) -> CoreResult<SearchRequest> {
        let range = date_range(self.since.as_deref(), self.until.as_deref())?;
        SearchRequest::new(
            &self.pattern,
            &self.path,
            self.output_mode.map(OutputMode::from).unwrap_or_default(),
            range,
            self.offset,
        )
    }
}

/// Parameters for `outlook_read` tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadParams {
    /// Entry ID as returned by list, filter or search.
    #[schemars(description = "Entry ID as returned by outlook_list, outlook_filter or outlook_search")]
    pub entry_id: String,

    /// Return JSON instead of formatted text.
    #[schemars(description = "Return JSON instead of formatted text")]
    pub json: Option<bool>,

    /// Save attachments to the attachment directory.
    #[schemars(description = "Save attachments to the attachment directory")]
    pub save_attachments: Option<bool>,

    /// Write the HTML body to this file (emails only).
    #[schemars(description = "Write the HTML body to this file (emails only)")]
    pub save_html: Option<String>,

    /// Write the item as text to this file.
    #[schemars(description = "Write the item as text to this file")]
    pub save_text: Option<String>,
}

impl ReadParams {
    pub fn into_request(self) -> CoreResult<ReadRequest> {
        Ok(ReadRequest::new(&self.entry_id)?
            .with_json(self.json.unwrap_or(false))
            .with_save_attachments(self.save_attachments.unwrap_or(false))
            .with_save_html(self.save_html.as_deref())
            .with_save_text(self.save_text.as_deref()))
    }
}
