use super::*;

use async_trait::async_trait;
use outlook_mcp_core::store::InMemoryMailStore;
use outlook_mcp_core::traits::{MailSession, MailStore};
use outlook_mcp_core::types::{FilterRequest, ListRequest, ReadRequest, SearchRequest};
use outlook_mcp_core::ServiceContext;
use serde_json::json;
use tokio::sync::Mutex;

pub const ACCOUNT: &str = "user@example.com";

/// Canned reply of a [`RecordingMailStore`].
#[derive(Clone)]
pub enum Reply {
    Output(String),
    Fail(fn() -> CoreError),
}

/// Store that records every call and answers with a fixed reply.
pub struct RecordingMailStore {
    calls: Arc<Mutex<Vec<String>>>,
    reply: Reply,
}

impl RecordingMailStore {
    pub fn replying(output: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            reply: Reply::Output(output.to_string()),
        }
    }

    pub fn failing(error: fn() -> CoreError) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            reply: Reply::Fail(error),
        }
    }

    /// Shared call log, one `"<operation> <detail>"` line per call.
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl MailStore for RecordingMailStore {
    async fn open_session(&self) -> CoreResult<Box<dyn MailSession>> {
        Ok(Box::new(RecordingSession {
            calls: Arc::clone(&self.calls),
            reply: self.reply.clone(),
        }))
    }
}

struct RecordingSession {
    calls: Arc<Mutex<Vec<String>>>,
    reply: Reply,
}

impl RecordingSession {
    async fn answer(&self, call: String) -> CoreResult<String> {
        self.calls.lock().await.push(call);
        match &self.reply {
            Reply::Output(output) => Ok(output.clone()),
            Reply::Fail(error) => Err(error()),
        }
    }
}

#[async_trait]
impl MailSession for RecordingSession {
    async fn list_path(&self, request: &ListRequest) -> CoreResult<String> {
        self.answer(format!("list {}", request.path)).await
    }

    async fn filter_path(&self, request: &FilterRequest) -> CoreResult<String> {
        self.answer(format!("filter {}", request.path)).await
    }

    async fn search_path(&self, request: &SearchRequest) -> CoreResult<String> {
        self.answer(format!("search {} {}", request.query.pattern(), request.path))
            .await
    }

    async fn read_item(&self, request: &ReadRequest) -> CoreResult<String> {
        self.answer(format!("read {}", request.entry_id.as_str()))
            .await
    }
}

/// 140-char native id for item `n`.
pub fn hex_id(n: u32) -> String {
    format!("{n:0140X}")
}

fn mail(n: u32, subject: &str, sender: &str, body: &str, received: &str) -> serde_json::Value {
    json!({
        "entry_id": hex_id(n),
        "kind": "email",
        "subject": subject,
        "sender": sender,
        "sender_email": format!("sender{n}@example.com"),
        "to": ACCOUNT,
        "body": body,
        "received": received,
    })
}

/// One mail account plus a public store.
///
/// The Inbox holds two flight mails (only one mentions United) and thirty
/// newsletters.
pub fn sample_fixture_json() -> String {
    let mut inbox = vec![
        mail(
            1,
            "Flight LX 17 confirmation",
            "Swiss International",
            "Swiss flight LX 17 departs ZRH at 13:05.",
            "2024-05-31T09:00:00",
        ),
        mail(
            2,
            "United UA 53 booked",
            "United Airlines",
            "United flight UA 53 from ZRH to EWR, seat 12A.",
            "2024-05-30T08:00:00",
        ),
    ];
    for i in 0..30 {
        inbox.push(mail(
            100 + i,
            &format!("Weekly newsletter #{i}"),
            "News Digest",
            "This week's newsletter: product news.",
            &format!("2024-04-{:02}T07:00:00", i + 1),
        ));
    }

    json!({
        "accounts": [
            {
                "name": ACCOUNT,
                "folders": [
                    { "name": "Inbox", "kind": "Mail", "items": inbox },
                    { "name": "Drafts", "kind": "Mail" }
                ]
            },
            {
                "name": "Public Folders - user@example.com",
                "folders": [{ "name": "All Public Folders", "kind": "Post" }]
            }
        ]
    })
    .to_string()
}

pub fn sample_store() -> InMemoryMailStore {
    InMemoryMailStore::from_json(&sample_fixture_json()).unwrap()
}

pub fn build_server(store: Arc<dyn MailStore>) -> OutlookMcp {
    let ctx = Arc::new(ServiceContext::new(store));
    OutlookMcp::new(Arc::new(MailService::new(ctx)))
}
