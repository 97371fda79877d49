//! Output schemas printed by the mail stores.
//!
//! The automation scripts emit the same shapes; these types are the
//! in-process rendition used by the fixture store. Empty optional fields are
//! skipped to keep tool output short.

use serde::Serialize;

use super::item::{BusyStatus, FolderKind, Importance};

// ===== list =====

/// `list` output, tagged by what the path resolved to.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Listing {
    /// Empty path
    Accounts {
        count: usize,
        results: Vec<AccountEntry>,
    },
    /// Account root
    Folders {
        account: String,
        count: usize,
        results: Vec<FolderEntry>,
    },
    /// Folder contents
    Items {
        folder: String,
        folder_type: FolderKind,
        total: usize,
        count: usize,
        has_more: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        remaining: Option<usize>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        subfolders: Vec<String>,
        results: Vec<ItemEntry>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountEntry {
    pub name: String,
    pub folders: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderEntry {
    pub name: String,
    pub count: usize,
    #[serde(rename = "type")]
    pub folder_type: FolderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<String>,
}

/// One row of a folder listing; which fields are set depends on the folder kind.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unread: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub entry_id: String,
}

// ===== filter =====

#[derive(Debug, Clone, Serialize)]
pub struct FilterResponse {
    pub total: usize,
    pub results: Vec<FilterHit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FilterHit {
    pub path: String,
    pub subject: String,
    pub from: String,
    pub date: Option<String>,
    pub entry_id: String,
}

// ===== search =====

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub pagination: Pagination,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
}

impl Pagination {
    /// Window `[offset, offset + limit)` over `total` results.
    #[must_use]
    pub fn window(total: usize, offset: usize, limit: usize) -> Self {
        Self {
            total,
            offset,
            limit,
            has_more: offset.saturating_add(limit) < total,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub entry_id: String,
    pub subject: String,
    pub sender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_attachments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_read: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matches: Vec<MatchSnippet>,
}

/// Context around one occurrence of a search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSnippet {
    pub term: String,
    pub context: String,
}

// ===== read =====

/// `read` output in JSON mode.
#[derive(Debug, Clone, Serialize)]
pub struct ReadOutput {
    #[serde(flatten)]
    pub item: ItemDetail,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exports: Vec<ExportRecord>,
}

/// Full item content, tagged by item type.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemDetail {
    Email(EmailDetail),
    Calendar(EventDetail),
    Contact(ContactDetail),
    Task(TaskDetail),
    Note(NoteDetail),
    Unknown(UnknownDetail),
}

impl ItemDetail {
    /// Attachments, for item kinds that carry them.
    pub fn attachments_mut(&mut self) -> Option<&mut Vec<AttachmentInfo>> {
        match self {
            Self::Email(d) => Some(&mut d.attachments),
            Self::Calendar(d) => Some(&mut d.attachments),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailDetail {
    pub subject: String,
    pub sender: String,
    pub sender_email: String,
    pub to: String,
    pub cc: String,
    pub bcc: String,
    pub received: Option<String>,
    pub sent: Option<String>,
    pub body: String,
    pub html_body: String,
    pub unread: bool,
    pub importance: Importance,
    pub attachments: Vec<AttachmentInfo>,
    pub categories: String,
    pub conversation_topic: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    pub subject: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: String,
    pub organizer: String,
    pub required_attendees: String,
    pub optional_attendees: String,
    pub body: String,
    pub categories: String,
    pub is_recurring: bool,
    pub all_day_event: bool,
    pub busy_status: BusyStatus,
    pub reminder_minutes: Option<u32>,
    pub importance: Importance,
    pub attachments: Vec<AttachmentInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactDetail {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub job_title: String,
    pub email1: String,
    pub email2: String,
    pub business_phone: String,
    pub home_phone: String,
    pub mobile_phone: String,
    pub business_address: String,
    pub categories: String,
    pub notes: String,
    pub birthday: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskDetail {
    pub subject: String,
    pub body: String,
    pub status: &'static str,
    pub percent_complete: u8,
    pub start_date: Option<String>,
    pub due_date: Option<String>,
    pub date_completed: Option<String>,
    pub importance: Importance,
    pub categories: String,
    pub owner: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteDetail {
    pub subject: String,
    pub body: String,
    pub categories: String,
    pub created: Option<String>,
    pub modified: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnknownDetail {
    pub subject: String,
    pub body: String,
    pub categories: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttachmentInfo {
    pub filename: String,
    pub size: u64,
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_error: Option<String>,
}

/// Body export written by `read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Html,
    Text,
}

/// Outcome of one export; failures are reported, not raised.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRecord {
    pub kind: ExportKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
