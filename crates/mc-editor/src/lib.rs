pub mod dnd;
pub mod editor;
pub mod export;
pub mod history;
pub mod mutation;
pub mod ops;
pub mod shortcuts;
pub mod store;

pub use dnd::{BlockBand, DROP_MIME, DropPayload, accepts_drop, drop_index};
pub use editor::{Editor, EditorConfig, Viewport};
pub use export::{ExportError, ExportSink, ExportTarget, Notice, NoticeLevel, html_filename};
pub use history::History;
pub use mutation::Mutation;
pub use ops::{Edit, SelectionEffect};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use store::{AUTOSAVE_KEY, KeyValueStore, MemoryStore, NullStore, StorageError};
