//! JSON fixture model for the in-memory store.
//!
//! Timestamps use chrono's ISO form (`2024-06-01T09:30:00`), local time.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::path::{AccountNode, FolderNode};
use crate::types::{BusyStatus, FolderKind, Importance, ItemKind, TaskStatus};

/// Snapshot of a mail profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub accounts: Vec<FixtureAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureAccount {
    pub name: String,
    #[serde(default)]
    pub folders: Vec<FixtureFolder>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureFolder {
    pub name: String,
    #[serde(default)]
    pub kind: FolderKind,
    /// Folder exists but the profile may not read it
    #[serde(default)]
    pub restricted: bool,
    #[serde(default)]
    pub items: Vec<FixtureItem>,
    #[serde(default)]
    pub folders: Vec<FixtureFolder>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FixtureAttachment {
    pub filename: String,
    #[serde(default)]
    pub content: String,
}

/// One item; fields irrelevant to its kind stay at their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FixtureItem {
    /// Native hex entry id
    pub entry_id: String,
    pub kind: ItemKind,
    pub subject: String,
    pub body: String,
    pub html_body: String,
    pub categories: String,
    pub importance: Importance,
    pub attachments: Vec<FixtureAttachment>,

    // mail
    pub sender: String,
    pub sender_email: String,
    pub to: String,
    pub cc: String,
    pub bcc: String,
    pub received: Option<NaiveDateTime>,
    pub sent: Option<NaiveDateTime>,
    pub unread: bool,
    pub conversation_topic: String,

    // calendar
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub location: String,
    pub organizer: String,
    pub required_attendees: String,
    pub optional_attendees: String,
    pub all_day: bool,
    pub recurring: bool,
    pub busy_status: BusyStatus,
    pub reminder_minutes: Option<u32>,

    // contact
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
    pub birthday: Option<NaiveDate>,

    // task
    pub status: TaskStatus,
    pub percent_complete: u8,
    pub start_date: Option<NaiveDateTime>,
    pub due: Option<NaiveDateTime>,
    pub completed: Option<NaiveDateTime>,
    pub owner: String,

    // note
    pub created: Option<NaiveDateTime>,
    pub modified: Option<NaiveDateTime>,
}

impl FixtureItem {
    /// Date used for ranges and ordering: event start, otherwise received.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDateTime> {
        match self.kind {
            ItemKind::Event => self.start,
            _ => self.received,
        }
    }

    /// Sender, or organizer for events.
    #[must_use]
    pub fn sender_name(&self) -> &str {
        if self.sender.is_empty() {
            &self.organizer
        } else {
            &self.sender
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.subject.clone()
        } else {
            name.to_string()
        }
    }

    /// Plain-text body, falling back to the HTML body without tags.
    #[must_use]
    pub fn text_body(&self) -> String {
        if self.body.is_empty() && !self.html_body.is_empty() {
            crate::utils::text::strip_html(&self.html_body)
        } else {
            self.body.clone()
        }
    }
}

impl AccountNode for FixtureAccount {
    type Folder = FixtureFolder;

    fn display_name(&self) -> &str {
        &self.name
    }

    fn folders(&self) -> &[FixtureFolder] {
        &self.folders
    }
}

impl FolderNode for FixtureFolder {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn subfolders(&self) -> &[Self] {
        &self.folders
    }

    fn is_accessible(&self) -> bool {
        !self.restricted
    }
}

impl FixtureFolder {
    /// Newest item date, used for activity ordering.
    #[must_use]
    pub fn latest_activity(&self) -> Option<NaiveDateTime> {
        self.items.iter().filter_map(FixtureItem::date).max()
    }

    /// Depth-first search for an item by hex id, case-insensitive.
    #[must_use]
    pub fn find_item(&self, hex_id: &str) -> Option<&FixtureItem> {
        self.items
            .iter()
            .find(|i| i.entry_id.eq_ignore_ascii_case(hex_id))
            .or_else(|| self.folders.iter().find_map(|f| f.find_item(hex_id)))
    }
}
