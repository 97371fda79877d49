//! Platform adapters for the MCP server
//!
//! Provides the `MailStore` implementation that bridges the MCP layer with
//! Outlook itself.
//!
//! # Script Bridge
//!
//! Outlook is only reachable through COM automation, so each session call runs
//! one of the `outlook_*.py` scripts:
//! - **`command`**: renders a validated request into script arguments,
//!   omitting values equal to the script defaults.
//! - **`ScriptMailStore`**: spawns the script, bounds the wait and maps the
//!   exit code onto `CoreError`.
//!
//! The scripts print the same JSON and text shapes as the in-memory fixture
//! store, so the tools behave identically with either backend.

mod command;
mod script_bridge;

pub use script_bridge::{ScriptBridge, ScriptMailStore};
