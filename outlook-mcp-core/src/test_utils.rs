//! 测试辅助模块
//!
//! 提供示例夹具和便捷的测试工厂方法。

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::services::{MailService, ServiceContext};
use crate::store::{Fixture, FixtureAccount, FixtureAttachment, FixtureFolder, FixtureItem, InMemoryMailStore};
use crate::types::{FolderKind, ItemKind, TaskStatus};

pub const ACCOUNT: &str = "user@example.com";

/// Fixed clock: 2024-06-01 12:00.
pub fn sample_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}

/// 140-char native id for item `n`.
pub fn hex_id(n: u32) -> String {
    format!("{n:0140X}")
}

pub fn mail(n: u32, subject: &str, body: &str) -> FixtureItem {
    FixtureItem {
        entry_id: hex_id(n),
        kind: ItemKind::Email,
        subject: subject.to_string(),
        body: body.to_string(),
        sender: format!("Sender {n}"),
        sender_email: format!("sender{n}@example.com"),
        to: ACCOUNT.to_string(),
        ..FixtureItem::default()
    }
}

pub fn item_on(mut item: FixtureItem, at: NaiveDateTime) -> FixtureItem {
    if item.kind == ItemKind::Event {
        item.start = Some(at);
        item.end = Some(at + Duration::hours(1));
    } else {
        item.received = Some(at);
    }
    item
}

fn from(mut item: FixtureItem, sender: &str) -> FixtureItem {
    item.sender = sender.to_string();
    item
}

pub fn folder(name: &str, kind: FolderKind, items: Vec<FixtureItem>) -> FixtureFolder {
    FixtureFolder {
        name: name.to_string(),
        kind,
        restricted: false,
        items,
        folders: Vec::new(),
    }
}

/// Two mail accounts and a public store.
///
/// The main Inbox holds two flight mails (only one mentions United), one read
/// Swiss mail, one undated mail and thirty newsletters.
pub fn sample_fixture() -> Fixture {
    let now = sample_now();

    let mut swiss = from(
        mail(1, "Flight LX 17 confirmation", "Swiss flight LX 17 departs ZRH at 13:05."),
        "Swiss International",
    );
    swiss.unread = true;

    let mut united = from(
        mail(2, "United UA 53 booked", "United flight UA 53 from ZRH to EWR, seat 12A."),
        "United Airlines",
    );
    united.html_body = "<p>United flight UA 53 from <b>ZRH</b> to EWR</p>".to_string();
    united.attachments = vec![FixtureAttachment {
        filename: "ticket.pdf".to_string(),
        content: "%PDF-1.4".to_string(),
    }];

    let baggage = from(mail(3, "Baggage policy", "Carry-on rules changed."), "Swiss International");

    let mut inbox_items = vec![
        item_on(swiss, now - Duration::hours(3)),
        item_on(united, now - Duration::days(2)),
        item_on(baggage, now - Duration::days(5)),
        mail(5, "No date", "Imported without a timestamp."),
    ];
    for i in 0..30 {
        let n = 100 + i;
        inbox_items.push(item_on(
            from(mail(n, &format!("Weekly newsletter #{i}"), "This week's newsletter: product news."), "News Digest"),
            now - Duration::days(i64::from(i) + 10),
        ));
    }

    let mut inbox = folder("Inbox", FolderKind::Mail, inbox_items);
    inbox.folders.push(folder(
        "Travel",
        FolderKind::Mail,
        vec![item_on(mail(4, "Hotel Zurich", "Hotel near ZRH airport."), now - Duration::days(20))],
    ));

    let offsite = FixtureItem {
        entry_id: hex_id(6),
        kind: ItemKind::Event,
        subject: "Team offsite".to_string(),
        organizer: "Ops Team".to_string(),
        location: "Zurich".to_string(),
        ..FixtureItem::default()
    };
    let contact = FixtureItem {
        entry_id: hex_id(7),
        kind: ItemKind::Contact,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email1: "ada@example.com".to_string(),
        ..FixtureItem::default()
    };
    let task = FixtureItem {
        entry_id: hex_id(8),
        kind: ItemKind::Task,
        subject: "Expense report".to_string(),
        status: TaskStatus::InProgress,
        percent_complete: 40,
        ..FixtureItem::default()
    };

    let mut private = folder(
        "Private",
        FolderKind::Mail,
        vec![item_on(mail(10, "Secret", "Locked away."), now - Duration::days(100))],
    );
    private.restricted = true;

    let main = FixtureAccount {
        name: ACCOUNT.to_string(),
        folders: vec![
            inbox,
            folder("Calendar", FolderKind::Calendar, vec![item_on(offsite, now + Duration::days(10))]),
            folder("Contacts", FolderKind::Contact, vec![contact]),
            folder("Tasks", FolderKind::Task, vec![task]),
            folder("Drafts", FolderKind::Mail, Vec::new()),
            folder(
                "Sync Issues",
                FolderKind::Mail,
                vec![item_on(mail(11, "Sync log", "Conflict."), now)],
            ),
            private,
        ],
    };
    let archive = FixtureAccount {
        name: "Archive".to_string(),
        folders: vec![folder(
            "Inbox",
            FolderKind::Mail,
            vec![item_on(from(mail(9, "Old trip", "Trip to EWR."), "Travel Desk"), now - Duration::days(400))],
        )],
    };
    let public = FixtureAccount {
        name: "Public Folders - user@example.com".to_string(),
        folders: vec![folder("All Public Folders", FolderKind::Post, Vec::new())],
    };

    Fixture {
        accounts: vec![main, archive, public],
    }
}

pub fn sample_store() -> InMemoryMailStore {
    InMemoryMailStore::new(sample_fixture()).with_now(sample_now())
}

pub fn service_with(store: InMemoryMailStore) -> MailService {
    MailService::new(Arc::new(ServiceContext::new(Arc::new(store))))
}
