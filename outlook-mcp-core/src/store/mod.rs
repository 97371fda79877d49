//! In-process mail store implementations

mod fixture;
mod memory;
mod render;

pub use fixture::{Fixture, FixtureAccount, FixtureAttachment, FixtureFolder, FixtureItem};
pub use memory::InMemoryMailStore;
pub use render::{detail_from, render_text};
