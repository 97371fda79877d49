//! Mail backend abstraction trait definition

mod mail_store;

pub use mail_store::{MailSession, MailStore};
