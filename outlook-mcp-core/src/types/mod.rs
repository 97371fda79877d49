//! Type definition module

mod item;
mod request;
mod response;

pub use item::{BusyStatus, FolderKind, Importance, ItemKind, TaskStatus};
pub use request::{
    FilterRequest, ListRequest, OutputMode, ReadRequest, SearchRequest, DEFAULT_LIST_COUNT,
    DEFAULT_MAX_ITEMS, SEARCH_PAGE_SIZE,
};
pub use response::{
    AccountEntry, AttachmentInfo, ContactDetail, EmailDetail, EventDetail, ExportKind,
    ExportRecord, FilterHit, FilterResponse, FolderEntry, ItemDetail, ItemEntry, Listing,
    MatchSnippet, NoteDetail, Pagination, ReadOutput, SearchHit, SearchResponse, TaskDetail,
    UnknownDetail,
};
