//! Mail store abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{FilterRequest, ListRequest, ReadRequest, SearchRequest};

/// Mail Store Trait
///
/// Entry point to a mail backend. Every tool call opens its own session and
/// drops it when the call returns.
#[async_trait]
pub trait MailStore: Send + Sync {
    /// Open a session for one call
    async fn open_session(&self) -> CoreResult<Box<dyn MailSession>>;
}

/// Mail Session Trait
///
/// Each operation returns the backend's text or JSON output verbatim.
#[async_trait]
pub trait MailSession: Send + Sync {
    /// List accounts, folders of an account, or items of a folder
    async fn list_path(&self, request: &ListRequest) -> CoreResult<String>;

    /// Filter items by structured conditions
    async fn filter_path(&self, request: &FilterRequest) -> CoreResult<String>;

    /// Full-text search within a folder
    async fn search_path(&self, request: &SearchRequest) -> CoreResult<String>;

    /// Read one item by entry id
    async fn read_item(&self, request: &ReadRequest) -> CoreResult<String>;
}
