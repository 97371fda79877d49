//! Utility module

pub mod datetime;
pub mod entry_id;
pub mod text;
