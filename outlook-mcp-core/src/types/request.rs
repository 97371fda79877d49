//! Validated per-operation requests.
//!
//! Constructors reject malformed input so that nothing reaches a mail store
//! unless it can be executed as stated.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::path::MailPath;
use crate::query::SearchQuery;
use crate::utils::datetime::DateRange;
use crate::utils::entry_id::EntryId;

use super::item::ItemKind;

/// Default `count` for list.
pub const DEFAULT_LIST_COUNT: usize = 50;
/// Default `max_items` for filter.
pub const DEFAULT_MAX_ITEMS: usize = 100;
/// Fixed page size for search.
pub const SEARCH_PAGE_SIZE: usize = 25;

/// Search output detail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Metadata only
    #[default]
    List,
    /// Also score body hits and attach snippets
    Content,
}

/// List accounts, folders or folder items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub path: MailPath,
    /// Include system folders, public stores and lift the count cap
    pub show_all: bool,
    pub count: usize,
}

impl ListRequest {
    pub fn new(path: &str, show_all: bool, count: Option<usize>) -> CoreResult<Self> {
        let count = count.unwrap_or(DEFAULT_LIST_COUNT);
        if count == 0 {
            return Err(CoreError::InvalidInput("count must be at least 1".to_string()));
        }
        Ok(Self {
            path: MailPath::parse(path)?,
            show_all,
            count,
        })
    }
}

/// Structured item filter. All conditions are combined with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    pub path: MailPath,
    pub range: DateRange,
    pub days_back: Option<u32>,
    pub sender: Option<String>,
    pub item_type: Option<ItemKind>,
    pub unread_only: bool,
    pub max_items: usize,
}

impl FilterRequest {
    pub fn new(path: &str, range: DateRange) -> CoreResult<Self> {
        Ok(Self {
            path: MailPath::parse(path)?,
            range,
            days_back: None,
            sender: None,
            item_type: None,
            unread_only: false,
            max_items: DEFAULT_MAX_ITEMS,
        })
    }

    #[must_use]
    pub fn with_days_back(mut self, days: Option<u32>) -> Self {
        self.days_back = days;
        self
    }

    /// Sender substring; blank values are dropped.
    #[must_use]
    pub fn with_sender(mut self, sender: Option<&str>) -> Self {
        self.sender = sender
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_item_type(mut self, item_type: Option<&str>) -> CoreResult<Self> {
        self.item_type = item_type.map(ItemKind::parse_filter).transpose()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_unread_only(mut self, unread_only: bool) -> Self {
        self.unread_only = unread_only;
        self
    }

    pub fn with_max_items(mut self, max_items: Option<usize>) -> CoreResult<Self> {
        let max_items = max_items.unwrap_or(DEFAULT_MAX_ITEMS);
        if max_items == 0 {
            return Err(CoreError::InvalidInput(
                "max_items must be at least 1".to_string(),
            ));
        }
        self.max_items = max_items;
        Ok(self)
    }

    /// Whether any date condition applies.
    #[must_use]
    pub fn has_date_condition(&self) -> bool {
        self.range.is_bounded() || self.days_back.is_some()
    }
}

/// Full-text search within one folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: SearchQuery,
    pub path: MailPath,
    pub mode: OutputMode,
    pub range: DateRange,
    pub offset: usize,
}

impl SearchRequest {
    /// Compiles the pattern first, so an empty pattern is reported as such
    /// even when the path is also wrong.
    pub fn new(
        pattern: &str,
        path: &str,
        mode: OutputMode,
        range: DateRange,
        offset: Option<usize>,
    ) -> CoreResult<Self> {
        let query = SearchQuery::compile(pattern)?;
        let path = MailPath::parse(path)?;
        if !matches!(path, MailPath::Folder { .. }) {
            return Err(CoreError::InvalidInput(format!(
                "path '{path}' must specify a folder, e.g. 'account/Inbox'"
            )));
        }
        Ok(Self {
            query,
            path,
            mode,
            range,
            offset: offset.unwrap_or(0),
        })
    }
}

/// Read one item, optionally exporting parts of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRequest {
    pub entry_id: EntryId,
    pub json: bool,
    pub save_attachments: bool,
    pub save_html: Option<PathBuf>,
    pub save_text: Option<PathBuf>,
}

impl ReadRequest {
    pub fn new(entry_id: &str) -> CoreResult<Self> {
        Ok(Self {
            entry_id: EntryId::parse(entry_id)?,
            json: false,
            save_attachments: false,
            save_html: None,
            save_text: None,
        })
    }

    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    #[must_use]
    pub fn with_save_attachments(mut self, save: bool) -> Self {
        self.save_attachments = save;
        self
    }

    #[must_use]
    pub fn with_save_html(mut self, file: Option<&str>) -> Self {
        self.save_html = export_path(file);
        self
    }

    #[must_use]
    pub fn with_save_text(mut self, file: Option<&str>) -> Self {
        self.save_text = export_path(file);
        self
    }

    /// Whether any export side effect was requested.
    #[must_use]
    pub fn has_exports(&self) -> bool {
        self.save_attachments || self.save_html.is_some() || self.save_text.is_some()
    }
}

fn export_path(file: Option<&str>) -> Option<PathBuf> {
    file.map(str::trim).filter(|f| !f.is_empty()).map(PathBuf::from)
}
