//! Keeps an editor process's view of workspace root folders in sync with
//! the process that owns them.
//!
//! The authoritative folder list lives in a controlling host process; this
//! crate maintains the local model, resolves paths to the folder that
//! contains them, proposes folder edits optimistically, and reconciles
//! authoritative updates into minimal added/removed deltas for dependents
//! to react to. The host itself is abstracted behind the `hostlink` crate.

mod controller;
mod message_queue;
mod path_util;
pub mod workspace;

pub use controller::{FilePattern, FolderToAdd, WorkspaceController};
pub use message_queue::MessageQueue;
pub use workspace::{
    FolderChangeEvent, FolderData, FolderDelta, WorkspaceData, WorkspaceFolder, WorkspaceModel,
};
