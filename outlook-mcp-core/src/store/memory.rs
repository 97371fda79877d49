//! In-memory mail store backed by a [`Fixture`] snapshot.
//!
//! Evaluates every operation in-process with the same output shapes the
//! automation scripts print. Used by tests and by the `fixture` backend.

use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};

use crate::error::{CoreError, CoreResult};
use crate::path::{resolve, MailPath, Resolved};
use crate::query::ranking;
use crate::traits::{MailSession, MailStore};
use crate::types::{
    AccountEntry, ExportKind, ExportRecord, FilterHit, FilterRequest, FilterResponse, FolderEntry,
    FolderKind, ItemDetail, ItemEntry, ItemKind, ListRequest, Listing, OutputMode, Pagination,
    ReadOutput, ReadRequest, SearchHit, SearchRequest, SearchResponse, SEARCH_PAGE_SIZE,
};
use crate::utils::datetime::{format_compact, format_full, format_short};
use crate::utils::entry_id::encode_entry_id;
use crate::utils::text::{non_empty, truncate};

use super::fixture::{Fixture, FixtureAccount, FixtureFolder, FixtureItem};
use super::render::{detail_from, render_text};

/// Folders Outlook creates for its own bookkeeping.
const SYSTEM_FOLDERS: [&str; 11] = [
    "Sync Issues",
    "Conflicts",
    "Local Failures",
    "Server Failures",
    "PersonMetadata",
    "ExternalContacts",
    "MeContact",
    "PeopleCentricConversation Buddies",
    "Recipient Cache",
    "GAL Contacts",
    "Organizational Contacts",
];

/// Folders whose latest item stands for account activity.
const ACTIVITY_FOLDERS: [&str; 2] = ["Inbox", "Sent Items"];

fn is_system_folder(name: &str) -> bool {
    SYSTEM_FOLDERS.contains(&name) || name.starts_with('{')
}

fn is_public_store(name: &str) -> bool {
    name.contains("Public Folders") || name.contains("Online Archive")
}

/// Fixture-backed [`MailStore`].
pub struct InMemoryMailStore {
    fixture: Arc<Fixture>,
    now: Option<NaiveDateTime>,
    attachment_dir: PathBuf,
    active: Arc<AtomicUsize>,
}

impl InMemoryMailStore {
    #[must_use]
    pub fn new(fixture: Fixture) -> Self {
        Self {
            fixture: Arc::new(fixture),
            now: None,
            attachment_dir: std::env::temp_dir().join("outlook_attachments"),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Parses a JSON fixture.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Loads a JSON fixture file.
    pub async fn from_file(path: &Path) -> CoreResult<Self> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            CoreError::StorageError(format!("cannot read fixture {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    /// Pins the clock used for relative dates and recency.
    #[must_use]
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    #[must_use]
    pub fn with_attachment_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.attachment_dir = dir.into();
        self
    }

    /// Live session counter.
    #[must_use]
    pub fn active_sessions(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.active)
    }
}

#[async_trait]
impl MailStore for InMemoryMailStore {
    async fn open_session(&self) -> CoreResult<Box<dyn MailSession>> {
        self.active.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemorySession {
            fixture: Arc::clone(&self.fixture),
            now: self.now.unwrap_or_else(|| Local::now().naive_local()),
            attachment_dir: self.attachment_dir.clone(),
            active: Arc::clone(&self.active),
        }))
    }
}

struct InMemorySession {
    fixture: Arc<Fixture>,
    now: NaiveDateTime,
    attachment_dir: PathBuf,
    active: Arc<AtomicUsize>,
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

impl InMemorySession {
    fn compact(&self, at: Option<NaiveDateTime>) -> Option<String> {
        at.map(|d| format_compact(d, self.now))
    }

    // ===== list =====

    fn list_accounts(&self, show_all: bool) -> Listing {
        let results: Vec<AccountEntry> = self
            .fixture
            .accounts
            .iter()
            .filter(|a| show_all || !is_public_store(&a.name))
            .map(|account| {
                let visible: Vec<&FixtureFolder> = account
                    .folders
                    .iter()
                    .filter(|f| show_all || !is_system_folder(&f.name))
                    .collect();
                let mail = visible.iter().filter(|f| f.kind == FolderKind::Mail);
                let emails = mail.clone().count();
                let latest = mail
                    .filter(|f| ACTIVITY_FOLDERS.contains(&f.name.as_str()))
                    .filter_map(|f| f.latest_activity())
                    .max();
                AccountEntry {
                    name: account.name.clone(),
                    folders: visible.len(),
                    emails: (emails > 0).then_some(emails),
                    activity: self.compact(latest),
                    entry_type: "account",
                }
            })
            .collect();
        Listing::Accounts {
            count: results.len(),
            results,
        }
    }

    fn list_folders(&self, account: &FixtureAccount, show_all: bool) -> Listing {
        let mut folders: Vec<(&FixtureFolder, Option<NaiveDateTime>)> = account
            .folders
            .iter()
            .filter(|f| show_all || (!is_system_folder(&f.name) && !f.items.is_empty()))
            .map(|f| (f, f.latest_activity()))
            .collect();
        folders.sort_by_key(|(f, latest)| {
            (f.items.is_empty(), Reverse(*latest), f.name.to_lowercase())
        });

        let results: Vec<FolderEntry> = folders
            .into_iter()
            .map(|(f, latest)| FolderEntry {
                name: f.name.clone(),
                count: f.items.len(),
                folder_type: f.kind,
                activity: self.compact(latest),
            })
            .collect();
        Listing::Folders {
            account: account.name.clone(),
            count: results.len(),
            results,
        }
    }

    fn list_items(&self, folder: &FixtureFolder, request: &ListRequest) -> Listing {
        let mut items: Vec<&FixtureItem> = folder.items.iter().collect();
        match folder.kind {
            FolderKind::Calendar => items.sort_by_key(|i| Reverse(i.start)),
            FolderKind::Contact => items.sort_by_key(|i| i.last_name.to_lowercase()),
            // undated tasks last
            FolderKind::Task => items.sort_by_key(|i| (i.due.is_none(), i.due)),
            FolderKind::Mail | FolderKind::Post => items.sort_by_key(|i| Reverse(i.received)),
            _ => {}
        }

        let total = items.len();
        let shown = if request.show_all {
            total
        } else {
            total.min(request.count)
        };
        let results = items
            .into_iter()
            .take(shown)
            .map(|item| self.item_entry(folder.kind, item))
            .collect();

        Listing::Items {
            folder: folder.name.clone(),
            folder_type: folder.kind,
            total,
            count: shown,
            has_more: shown < total,
            remaining: (shown < total).then(|| total - shown),
            subfolders: folder.folders.iter().map(|f| f.name.clone()).collect(),
            results,
        }
    }

    fn item_entry(&self, kind: FolderKind, item: &FixtureItem) -> ItemEntry {
        let entry_id = encode_entry_id(&item.entry_id);
        match kind {
            FolderKind::Mail | FolderKind::Post => ItemEntry {
                subject: Some(truncate(&item.subject, 100)),
                from: Some(truncate(&item.sender, 50)),
                date: self.compact(item.received),
                unread: item.unread.then_some(true),
                entry_id,
                ..ItemEntry::default()
            },
            FolderKind::Calendar => ItemEntry {
                subject: Some(truncate(&item.subject, 100)),
                start: self.compact(item.start),
                location: non_empty(&truncate(&item.location, 50)),
                entry_id,
                ..ItemEntry::default()
            },
            FolderKind::Contact => ItemEntry {
                name: Some(truncate(&item.full_name(), 50)),
                email: non_empty(&truncate(&item.email1, 50)),
                company: non_empty(&truncate(&item.company, 50)),
                entry_id,
                ..ItemEntry::default()
            },
            FolderKind::Task => ItemEntry {
                subject: Some(truncate(&item.subject, 100)),
                due: self.compact(item.due),
                status: Some(item.status.label().to_string()),
                complete: (item.percent_complete > 0).then_some(item.percent_complete),
                entry_id,
                ..ItemEntry::default()
            },
            FolderKind::Journal | FolderKind::Note | FolderKind::Unknown => ItemEntry {
                description: Some(truncate(&item.subject, 100)),
                entry_id,
                ..ItemEntry::default()
            },
        }
    }

    // ===== filter =====

    /// Folders scanned by filter, each with its display path.
    fn filter_scope<'a>(&'a self, path: &MailPath) -> CoreResult<Vec<(String, &'a FixtureFolder)>> {
        let top_level = |account: &'a FixtureAccount| {
            account
                .folders
                .iter()
                .filter(|f| f.kind.is_filterable() && !is_system_folder(&f.name) && !f.restricted)
                .map(move |f| (format!("{}/{}", account.name, f.name), f))
        };

        match resolve(&self.fixture.accounts, path)? {
            Resolved::Accounts(accounts) => Ok(accounts
                .iter()
                .filter(|a| !a.name.to_lowercase().contains("public"))
                .flat_map(top_level)
                .collect()),
            Resolved::Account(account) => Ok(top_level(account).collect()),
            Resolved::Folder { folder, .. } => Ok(vec![(path.to_string(), folder)]),
        }
    }

    fn filter_items(&self, request: &FilterRequest) -> CoreResult<FilterResponse> {
        let range = match request.days_back {
            Some(days) => request.range.with_days_back(days, self.now.date()),
            None => request.range,
        };
        let dated = request.has_date_condition();
        let sender = request.sender.as_ref().map(|s| s.to_lowercase());

        let mut hits: Vec<(&str, &FixtureItem)> = Vec::new();
        let scope = self.filter_scope(&request.path)?;
        for (path, folder) in &scope {
            for item in &folder.items {
                if dated && !item.date().is_some_and(|d| range.contains(d)) {
                    continue;
                }
                if request.item_type.is_some_and(|t| t != item.kind) {
                    continue;
                }
                if sender.as_ref().is_some_and(|s| !matches_sender(item, s)) {
                    continue;
                }
                if request.unread_only && !item.unread {
                    continue;
                }
                hits.push((path.as_str(), item));
            }
        }

        // newest first across all folders, then cap
        hits.sort_by_key(|(_, item)| Reverse(item.date()));
        hits.truncate(request.max_items);

        let results: Vec<FilterHit> = hits
            .into_iter()
            .map(|(path, item)| FilterHit {
                path: path.to_string(),
                subject: truncate(&item.subject, 40),
                from: truncate(item.sender_name(), 25),
                date: item.date().map(|d| format_short(d, self.now)),
                entry_id: encode_entry_id(&item.entry_id),
            })
            .collect();
        Ok(FilterResponse {
            total: results.len(),
            results,
        })
    }

    // ===== search =====

    fn search_items(&self, request: &SearchRequest) -> CoreResult<SearchResponse> {
        let Resolved::Folder { folder, .. } = resolve(&self.fixture.accounts, &request.path)?
        else {
            return Err(CoreError::InvalidInput(format!(
                "path '{}' must specify a folder",
                request.path
            )));
        };

        let content = request.mode == OutputMode::Content;
        let terms = request.query.terms();

        let mut scored: Vec<(f64, SearchHit)> = folder
            .items
            .iter()
            .filter_map(|item| {
                let body = item.text_body();
                if !request.query.matches(&body) {
                    return None;
                }
                let in_range = item.date().is_some_and(|d| request.range.contains(d));
                if request.range.is_bounded() && !in_range {
                    return None;
                }

                let relevance = ranking::relevance(
                    &terms,
                    &item.subject,
                    item.sender_name(),
                    content.then_some(body.as_str()),
                );
                let score =
                    ranking::combined_score(relevance, ranking::recency(item.date(), self.now));

                let hit = SearchHit {
                    entry_id: encode_entry_id(&item.entry_id),
                    subject: item.subject.clone(),
                    sender: item.sender_name().to_string(),
                    received: self.compact(item.date()),
                    has_attachments: (!item.attachments.is_empty()).then_some(true),
                    is_read: (item.kind == ItemKind::Email).then_some(!item.unread),
                    matches: if content {
                        ranking::snippets(&body, &terms)
                    } else {
                        Vec::new()
                    },
                };
                Some((score, hit))
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        let total = scored.len();
        let results = scored
            .into_iter()
            .skip(request.offset)
            .take(SEARCH_PAGE_SIZE)
            .map(|(_, hit)| hit)
            .collect();
        Ok(SearchResponse {
            pagination: Pagination::window(total, request.offset, SEARCH_PAGE_SIZE),
            results,
        })
    }

    // ===== read =====

    fn find_item(&self, hex_id: &str) -> Option<&FixtureItem> {
        self.fixture
            .accounts
            .iter()
            .flat_map(|a| a.folders.iter())
            .find_map(|f| f.find_item(hex_id))
    }

    async fn save_attachments(&self, item: &FixtureItem, detail: &mut ItemDetail) {
        let Some(infos) = detail.attachments_mut() else {
            return;
        };
        if infos.is_empty() {
            return;
        }
        if let Err(e) = tokio::fs::create_dir_all(&self.attachment_dir).await {
            for info in infos.iter_mut() {
                info.save_error = Some(e.to_string());
            }
            return;
        }

        for (info, attachment) in infos.iter_mut().zip(&item.attachments) {
            if attachment.filename.is_empty() {
                continue;
            }
            let target = unique_path(&self.attachment_dir, &attachment.filename).await;
            match tokio::fs::write(&target, attachment.content.as_bytes()).await {
                Ok(()) => info.saved_path = Some(target.display().to_string()),
                Err(e) => {
                    log::warn!("failed to save attachment {}: {e}", attachment.filename);
                    info.save_error = Some(e.to_string());
                }
            }
        }
    }

    async fn export(kind: ExportKind, path: &Path, contents: String) -> ExportRecord {
        let error = tokio::fs::write(path, contents).await.err().map(|e| e.to_string());
        ExportRecord {
            kind,
            path: path.display().to_string(),
            error,
        }
    }

    async fn read_output(&self, request: &ReadRequest) -> CoreResult<ReadOutput> {
        let item = self
            .find_item(&request.entry_id.to_hex())
            .ok_or_else(|| CoreError::ItemNotFound(request.entry_id.display_prefix()))?;

        let mut detail = detail_from(item);
        if request.save_attachments {
            self.save_attachments(item, &mut detail).await;
        }

        let mut exports = Vec::new();
        if let Some(path) = &request.save_html {
            if item.kind == ItemKind::Email && !item.html_body.is_empty() {
                exports.push(Self::export(ExportKind::Html, path, item.html_body.clone()).await);
            }
        }
        if let Some(path) = &request.save_text {
            let contents = if item.kind == ItemKind::Email {
                format!(
                    "Subject: {}\nFrom: {} <{}>\nDate: {}\n{}\n{}",
                    item.subject,
                    item.sender,
                    item.sender_email,
                    item.received.map(format_full).unwrap_or_default(),
                    "-".repeat(80),
                    item.body
                )
            } else {
                to_json(&detail)?
            };
            exports.push(Self::export(ExportKind::Text, path, contents).await);
        }

        Ok(ReadOutput {
            item: detail,
            exports,
        })
    }
}

/// `dir/name`, or `dir/stem_N.ext` for the first free N.
async fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
        return candidate;
    }
    let (stem, ext) = match name.rfind('.') {
        Some(i) if i > 0 => (&name[..i], &name[i..]),
        _ => (name, ""),
    };
    let mut counter = 1;
    loop {
        let candidate = dir.join(format!("{stem}_{counter}{ext}"));
        if !tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            return candidate;
        }
        counter += 1;
    }
}

fn export_lines(exports: &[ExportRecord]) -> String {
    exports
        .iter()
        .map(|e| {
            let label = match e.kind {
                ExportKind::Html => "HTML",
                ExportKind::Text => "Text",
            };
            match &e.error {
                None => format!("\n{label} version saved to: {}", e.path),
                Some(err) => format!("\nError saving {label}: {err}"),
            }
        })
        .collect()
}

#[async_trait]
impl MailSession for InMemorySession {
    async fn list_path(&self, request: &ListRequest) -> CoreResult<String> {
        let listing = match resolve(&self.fixture.accounts, &request.path)? {
            Resolved::Accounts(_) => self.list_accounts(request.show_all),
            Resolved::Account(account) => self.list_folders(account, request.show_all),
            Resolved::Folder { folder, .. } => self.list_items(folder, request),
        };
        to_json(&listing)
    }

    async fn filter_path(&self, request: &FilterRequest) -> CoreResult<String> {
        let response = self.filter_items(request)?;
        if response.results.is_empty() {
            return Ok(String::new());
        }
        to_json(&response)
    }

    async fn search_path(&self, request: &SearchRequest) -> CoreResult<String> {
        let response = self.search_items(request)?;
        if response.pagination.total == 0 {
            return Ok(String::new());
        }
        to_json(&response)
    }

    async fn read_item(&self, request: &ReadRequest) -> CoreResult<String> {
        let output = self.read_output(request).await?;
        if request.json {
            to_json(&output)
        } else {
            Ok(format!("{}{}", render_text(&output.item), export_lines(&output.exports)))
        }
    }
}

/// Sender (or organizer) name or address contains `needle`, already lowercased.
fn matches_sender(item: &FixtureItem, needle: &str) -> bool {
    item.sender_name().to_lowercase().contains(needle)
        || item.sender_email.to_lowercase().contains(needle)
}
