//! Outlook MCP Core Library
//!
//! Provides the platform-independent part of the Outlook adapter:
//! - typed, validated requests for list / filter / search / read
//! - the search pattern compiler and its DASL rendering
//! - folder path resolution
//! - the `MailStore` / `MailSession` capability traits and `MailService`
//!
//! Native access lives behind `MailStore`; the binary crate provides the
//! script bridge, this crate ships an in-memory fixture store.

pub mod error;
pub mod path;
pub mod query;
pub mod services;
pub mod store;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult, ErrorKind};
pub use path::MailPath;
pub use query::{DaslSyntax, SearchQuery};
pub use services::{MailService, ServiceContext};
pub use store::InMemoryMailStore;
pub use traits::{MailSession, MailStore};
