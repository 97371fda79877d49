//! Search query model: pattern compiler, DASL rendering and ranking.

mod compiler;
mod dasl;
pub mod ranking;

pub use compiler::SearchQuery;
pub use dasl::{DaslSyntax, TEXT_DESCRIPTION};
