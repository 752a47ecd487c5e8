//! Editing session, persistence, and exports

pub mod editor;
pub mod export;
pub mod notify;
pub mod storage;

pub use editor::{ANIMATIONS_KEY, EditorSession};
pub use export::{ConfigExport, ModelRecord, SavedModel, Snapshot, SnapshotFormat};
pub use notify::{Notification, NotificationLevel};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
