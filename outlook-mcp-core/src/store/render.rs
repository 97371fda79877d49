//! Item detail construction and the human-readable `read` layout.

use crate::types::{
    AttachmentInfo, ContactDetail, EmailDetail, EventDetail, Importance, ItemDetail, ItemKind,
    NoteDetail, TaskDetail, UnknownDetail,
};
use crate::utils::datetime::{format_full, DATE_FORMAT};

use super::fixture::FixtureItem;

const HEAVY_RULE: &str =
    "================================================================================";
const LIGHT_RULE: &str =
    "--------------------------------------------------------------------------------";
const SHORT_RULE: &str = "----------------------------------------";

fn attachments(item: &FixtureItem) -> Vec<AttachmentInfo> {
    item.attachments
        .iter()
        .enumerate()
        .map(|(i, a)| AttachmentInfo {
            filename: a.filename.clone(),
            size: a.content.len() as u64,
            index: i + 1,
            saved_path: None,
            save_error: None,
        })
        .collect()
}

/// Builds the full detail record for an item.
#[must_use]
pub fn detail_from(item: &FixtureItem) -> ItemDetail {
    let full = |d: Option<chrono::NaiveDateTime>| d.map(format_full);
    match item.kind {
        ItemKind::Email => ItemDetail::Email(EmailDetail {
            subject: item.subject.clone(),
            sender: item.sender.clone(),
            sender_email: item.sender_email.clone(),
            to: item.to.clone(),
            cc: item.cc.clone(),
            bcc: item.bcc.clone(),
            received: full(item.received),
            sent: full(item.sent),
            body: item.body.clone(),
            html_body: item.html_body.clone(),
            unread: item.unread,
            importance: item.importance,
            attachments: attachments(item),
            categories: item.categories.clone(),
            conversation_topic: item.conversation_topic.clone(),
        }),
        ItemKind::Event => ItemDetail::Calendar(EventDetail {
            subject: item.subject.clone(),
            start: full(item.start),
            end: full(item.end),
            location: item.location.clone(),
            organizer: item.organizer.clone(),
            required_attendees: item.required_attendees.clone(),
            optional_attendees: item.optional_attendees.clone(),
            body: item.body.clone(),
            categories: item.categories.clone(),
            is_recurring: item.recurring,
            all_day_event: item.all_day,
            busy_status: item.busy_status,
            reminder_minutes: item.reminder_minutes,
            importance: item.importance,
            attachments: attachments(item),
        }),
        ItemKind::Contact => ItemDetail::Contact(ContactDetail {
            full_name: item.full_name(),
            first_name: item.first_name.clone(),
            last_name: item.last_name.clone(),
            company: item.company.clone(),
            job_title: item.job_title.clone(),
            email1: item.email1.clone(),
            email2: item.email2.clone(),
            business_phone: item.business_phone.clone(),
            home_phone: item.home_phone.clone(),
            mobile_phone: item.mobile_phone.clone(),
            business_address: item.business_address.clone(),
            categories: item.categories.clone(),
            notes: item.body.clone(),
            birthday: item.birthday.map(|d| d.format(DATE_FORMAT).to_string()),
        }),
        ItemKind::Task => ItemDetail::Task(TaskDetail {
            subject: item.subject.clone(),
            body: item.body.clone(),
            status: item.status.label(),
            percent_complete: item.percent_complete,
            start_date: full(item.start_date),
            due_date: full(item.due),
            date_completed: full(item.completed),
            importance: item.importance,
            categories: item.categories.clone(),
            owner: item.owner.clone(),
        }),
        ItemKind::Note => ItemDetail::Note(NoteDetail {
            subject: item.subject.clone(),
            body: item.body.clone(),
            categories: item.categories.clone(),
            created: full(item.created),
            modified: full(item.modified),
        }),
        ItemKind::Unknown => ItemDetail::Unknown(UnknownDetail {
            subject: item.subject.clone(),
            body: item.body.clone(),
            categories: item.categories.clone(),
        }),
    }
}

fn opt(value: Option<&String>) -> &str {
    value.map_or("", String::as_str)
}

fn push_if(lines: &mut Vec<String>, label: &str, value: &str) {
    if !value.is_empty() {
        lines.push(format!("{label}: {value}"));
    }
}

fn push_attachments(lines: &mut Vec<String>, attachments: &[AttachmentInfo]) {
    if attachments.is_empty() {
        return;
    }
    lines.push(format!("\nAttachments ({}):", attachments.len()));
    for att in attachments {
        #[allow(clippy::cast_precision_loss)]
        let size_kb = att.size as f64 / 1024.0;
        lines.push(format!("  - {} ({size_kb:.1} KB)", att.filename));
        if let Some(path) = &att.saved_path {
            lines.push(format!("    Saved to: {path}"));
        }
        if let Some(err) = &att.save_error {
            lines.push(format!("    Save failed: {err}"));
        }
    }
}

fn push_body(lines: &mut Vec<String>, title: &str, rule: &str, body: &str) {
    lines.push(format!("\n{title}:"));
    lines.push(rule.to_string());
    lines.push(body.to_string());
}

/// Text layout of an item, one block per item type.
#[must_use]
pub fn render_text(detail: &ItemDetail) -> String {
    let mut lines = vec![HEAVY_RULE.to_string()];
    match detail {
        ItemDetail::Email(d) => {
            lines.push("Type: Email".to_string());
            lines.push(format!("Subject: {}", d.subject));
            lines.push(format!("From: {} <{}>", d.sender, d.sender_email));
            lines.push(format!("To: {}", d.to));
            push_if(&mut lines, "CC", &d.cc);
            lines.push(format!("Date: {}", opt(d.received.as_ref())));
            push_if(&mut lines, "Categories", &d.categories);
            if d.unread {
                lines.push("Status: UNREAD".to_string());
            }
            if d.importance != Importance::Normal {
                lines.push(format!("Importance: {}", d.importance.label()));
            }
            push_attachments(&mut lines, &d.attachments);
            lines.push(HEAVY_RULE.to_string());
            push_body(&mut lines, "Message Content", LIGHT_RULE, &d.body);
        }
        ItemDetail::Calendar(d) => {
            lines.push("Type: Calendar Event".to_string());
            lines.push(format!("Subject: {}", d.subject));
            lines.push(format!("Start: {}", opt(d.start.as_ref())));
            lines.push(format!("End: {}", opt(d.end.as_ref())));
            push_if(&mut lines, "Location", &d.location);
            push_if(&mut lines, "Organizer", &d.organizer);
            push_if(&mut lines, "Required Attendees", &d.required_attendees);
            push_if(&mut lines, "Optional Attendees", &d.optional_attendees);
            lines.push(format!("Show as: {}", d.busy_status.label()));
            if d.all_day_event {
                lines.push("All Day Event: Yes".to_string());
            }
            if d.is_recurring {
                lines.push("Recurring: Yes".to_string());
            }
            if let Some(minutes) = d.reminder_minutes {
                lines.push(format!("Reminder: {minutes} minutes before"));
            }
            push_if(&mut lines, "Categories", &d.categories);
            push_attachments(&mut lines, &d.attachments);
            lines.push(HEAVY_RULE.to_string());
            push_body(&mut lines, "Description", LIGHT_RULE, &d.body);
        }
        ItemDetail::Contact(d) => {
            lines.push("Type: Contact".to_string());
            lines.push(format!("Name: {}", d.full_name));
            push_if(&mut lines, "Company", &d.company);
            push_if(&mut lines, "Title", &d.job_title);
            lines.push("\nContact Information:".to_string());
            push_if(&mut lines, "  Email 1", &d.email1);
            push_if(&mut lines, "  Email 2", &d.email2);
            push_if(&mut lines, "  Business", &d.business_phone);
            push_if(&mut lines, "  Mobile", &d.mobile_phone);
            push_if(&mut lines, "  Home", &d.home_phone);
            if !d.business_address.is_empty() {
                lines.push(format!("\nBusiness Address: {}", d.business_address));
            }
            if let Some(birthday) = &d.birthday {
                lines.push(format!("\nBirthday: {birthday}"));
            }
            if !d.notes.is_empty() {
                push_body(&mut lines, "Notes", SHORT_RULE, &d.notes);
            }
        }
        ItemDetail::Task(d) => {
            lines.push("Type: Task".to_string());
            lines.push(format!("Subject: {}", d.subject));
            lines.push(format!(
                "Status: {} ({}% complete)",
                d.status, d.percent_complete
            ));
            push_if(&mut lines, "Start Date", opt(d.start_date.as_ref()));
            push_if(&mut lines, "Due Date", opt(d.due_date.as_ref()));
            push_if(&mut lines, "Completed", opt(d.date_completed.as_ref()));
            if d.importance != Importance::Normal {
                lines.push(format!("Importance: {}", d.importance.label()));
            }
            push_if(&mut lines, "Owner", &d.owner);
            push_if(&mut lines, "Categories", &d.categories);
            push_body(&mut lines, "Description", SHORT_RULE, &d.body);
        }
        ItemDetail::Note(d) => {
            lines.push("Type: Note".to_string());
            push_if(&mut lines, "Subject", &d.subject);
            lines.push(format!("Created: {}", opt(d.created.as_ref())));
            lines.push(format!("Modified: {}", opt(d.modified.as_ref())));
            push_if(&mut lines, "Categories", &d.categories);
            push_body(&mut lines, "Content", SHORT_RULE, &d.body);
        }
        ItemDetail::Unknown(d) => {
            lines.push("Type: Unknown".to_string());
            push_if(&mut lines, "Subject", &d.subject);
            if !d.body.is_empty() {
                push_body(&mut lines, "Content", SHORT_RULE, &d.body);
            }
        }
    }
    lines.push(HEAVY_RULE.to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixture::FixtureAttachment;
    use crate::types::TaskStatus;

    #[test]
    fn email_block_lists_headers_and_attachments() {
        let item = FixtureItem {
            subject: "Flight LX 17".to_string(),
            sender: "Swiss".to_string(),
            sender_email: "noreply@swiss.com".to_string(),
            to: "me@example.com".to_string(),
            body: "Departure ZRH".to_string(),
            unread: true,
            importance: Importance::High,
            attachments: vec![FixtureAttachment {
                filename: "ticket.pdf".to_string(),
                content: "x".repeat(2048),
            }],
            ..FixtureItem::default()
        };
        let text = render_text(&detail_from(&item));
        assert!(text.starts_with(HEAVY_RULE));
        assert!(text.contains("From: Swiss <noreply@swiss.com>"));
        assert!(text.contains("Status: UNREAD"));
        assert!(text.contains("Importance: High"));
        assert!(text.contains("  - ticket.pdf (2.0 KB)"));
        assert!(text.contains("Message Content:\n"));
        assert!(!text.contains("CC:"));
    }

    #[test]
    fn task_block_shows_progress() {
        let item = FixtureItem {
            kind: ItemKind::Task,
            subject: "Expense report".to_string(),
            status: TaskStatus::InProgress,
            percent_complete: 40,
            ..FixtureItem::default()
        };
        let text = render_text(&detail_from(&item));
        assert!(text.contains("Type: Task"));
        assert!(text.contains("Status: In progress (40% complete)"));
    }

    #[test]
    fn contact_detail_derives_full_name() {
        let item = FixtureItem {
            kind: ItemKind::Contact,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            ..FixtureItem::default()
        };
        let ItemDetail::Contact(detail) = detail_from(&item) else {
            panic!("expected contact");
        };
        assert_eq!(detail.full_name, "Ada Lovelace");
    }
}
