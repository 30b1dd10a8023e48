pub mod diary_entry;
pub mod diary_store;
pub mod remote;

pub use diary_entry::DiaryEntry;
pub use diary_store::{DiaryStats, DiaryStore};
pub use remote::RemoteSource;
