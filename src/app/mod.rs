//! Application layer.
//!
//! # Structure
//!
//! - `document` / `session` - Core data structures (Document, SessionStore)
//! - `coordinator` - Orchestration between store, editor surface and preview
//! - `storage` / `export` / `open_hook` - External collaborators
//! - `messages` / `settings` / `error` - Channel messages, config, errors

pub mod coordinator;
pub mod document;
pub mod error;
pub mod export;
pub mod messages;
pub mod open_hook;
pub mod preview;
pub mod session;
pub mod settings;
pub mod storage;

// Re-exports for convenient external access
pub use coordinator::{Renderer, SyncCoordinator, TextSurface};
pub use document::{Document, DocumentId};
pub use error::{AppError, Result};
pub use export::ExportFormat;
pub use messages::Message;
pub use session::SessionStore;
pub use settings::AppSettings;
pub use storage::{NativeStorage, Storage};
