//! Subscription/program tracker: a reactive record store persisted to a
//! single durable key, plus the list and form views that consume it.

mod dmenu;
mod error;
pub mod model;
pub mod observable;
pub mod prompt;
pub mod storage;
pub mod store;
pub mod view;

pub use dmenu::DmenuPrompt;
pub use error::{ImportError, RecordError, StoreError};
pub use model::{Column, EditTarget, Paid, Period, Program};
pub use prompt::{AssumeYes, Prompt, TerminalPrompt};
pub use storage::{FileStorage, MemoryStorage, Storage, DEFAULT_DATA_DIR};
pub use store::{export_file_name, parse_snapshot, Deletion, Store, STORAGE_KEY};
