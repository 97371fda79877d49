//! Command-line rendering for the automation scripts.
//!
//! Optional arguments are emitted only when they differ from the script's
//! own default.

use outlook_mcp_core::types::{
    FilterRequest, ListRequest, OutputMode, ReadRequest, SearchRequest, DEFAULT_LIST_COUNT,
    DEFAULT_MAX_ITEMS,
};
use outlook_mcp_core::utils::datetime::{format_date, DateRange};
use outlook_mcp_core::DaslSyntax;

/// One mail operation, each backed by its own script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Filter,
    Search,
    Read,
}

impl Operation {
    #[must_use]
    pub const fn script(self) -> &'static str {
        match self {
            Self::List => "outlook_list.py",
            Self::Filter => "outlook_filter.py",
            Self::Search => "outlook_search.py",
            Self::Read => "outlook_read.py",
        }
    }

    /// Phrase used in failure messages: "failed to {phrase}".
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::List => "list folder",
            Self::Filter => "filter items",
            Self::Search => "search items",
            Self::Read => "read item",
        }
    }
}

fn push_flag(args: &mut Vec<String>, flag: &str, on: bool) {
    if on {
        args.push(flag.to_string());
    }
}

fn push_value(args: &mut Vec<String>, flag: &str, value: Option<String>) {
    if let Some(value) = value {
        args.push(flag.to_string());
        args.push(value);
    }
}

fn push_range(args: &mut Vec<String>, range: &DateRange) {
    push_value(args, "--since", range.since.map(format_date));
    push_value(args, "--until", range.until.map(format_date));
}

/// `[path] [--all] [--count N]`
#[must_use]
pub fn list_args(request: &ListRequest) -> Vec<String> {
    let mut args = Vec::new();
    if !request.path.is_root() {
        args.push(request.path.to_string());
    }
    push_flag(&mut args, "--all", request.show_all);
    push_value(
        &mut args,
        "--count",
        (request.count != DEFAULT_LIST_COUNT).then(|| request.count.to_string()),
    );
    args
}

/// `[path] [--since D] [--until D] [--days N] [--from S] [--type T] [--unread] [--max-items N]`
#[must_use]
pub fn filter_args(request: &FilterRequest) -> Vec<String> {
    let mut args = Vec::new();
    if !request.path.is_root() {
        args.push(request.path.to_string());
    }
    push_range(&mut args, &request.range);
    push_value(&mut args, "--days", request.days_back.map(|d| d.to_string()));
    push_value(&mut args, "--from", request.sender.clone());
    push_value(
        &mut args,
        "--type",
        request.item_type.map(|t| t.as_str().to_string()),
    );
    push_flag(&mut args, "--unread", request.unread_only);
    push_value(
        &mut args,
        "--max-items",
        (request.max_items != DEFAULT_MAX_ITEMS).then(|| request.max_items.to_string()),
    );
    args
}

/// `pattern path [--dasl EXPR] [--output-mode content] [--since D] [--until D] [--offset N]`
///
/// The compiled filter is passed only when `dasl` is set; stock scripts
/// compile the pattern themselves and reject unknown flags.
#[must_use]
pub fn search_args(request: &SearchRequest, dasl: Option<DaslSyntax>) -> Vec<String> {
    let mut args = vec![request.query.pattern().to_string(), request.path.to_string()];
    push_value(&mut args, "--dasl", dasl.map(|syntax| request.query.to_dasl(syntax)));
    if request.mode == OutputMode::Content {
        args.push("--output-mode".to_string());
        args.push("content".to_string());
    }
    push_range(&mut args, &request.range);
    push_value(
        &mut args,
        "--offset",
        (request.offset != 0).then(|| request.offset.to_string()),
    );
    args
}

/// `entry_id [--json] [--save-attachments] [--save-html F] [--save-text F]`
#[must_use]
pub fn read_args(request: &ReadRequest) -> Vec<String> {
    let mut args = vec![request.entry_id.as_str().to_string()];
    push_flag(&mut args, "--json", request.json);
    push_flag(&mut args, "--save-attachments", request.save_attachments);
    push_value(
        &mut args,
        "--save-html",
        request.save_html.as_ref().map(|p| p.display().to_string()),
    );
    push_value(
        &mut args,
        "--save-text",
        request.save_text.as_ref().map(|p| p.display().to_string()),
    );
    args
}
