//! The local model of a workspace: its folder records, the authoritative
//! payload they are built from, and the change events published when the
//! controlling process revises the folder list.

mod diff;
mod model;
mod path_index;

#[cfg(test)]
mod tests;

pub use diff::{compare_uri, compare_uri_and_name, diff_folder_sets, FolderDelta};
pub use model::WorkspaceModel;
pub use path_index::PathIndex;

use serde::{Deserialize, Serialize};
use url::Url;

/// One root folder of the workspace. The URI is the ownership key; `index`
/// is the folder's position in the authoritative ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceFolder {
    pub uri: Url,
    pub name: String,
    pub index: usize,
}

/// Workspace state as pushed by the controlling process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub folders: Vec<FolderData>,
}

/// One folder entry of a [`WorkspaceData`] payload. The display name is
/// optional and defaults to the URI's basename; the position in the
/// `folders` list is authoritative regardless of `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderData {
    pub uri: Url,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub index: usize,
}

/// The added/removed folder delta published on the controller's message
/// queue after an authoritative update changed the folder set.
///
/// Constructed once and never mutated; consumers only ever see borrowed
/// slices or their own clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderChangeEvent {
    added: Vec<WorkspaceFolder>,
    removed: Vec<WorkspaceFolder>,
}

impl FolderChangeEvent {
    pub(crate) fn new(added: Vec<WorkspaceFolder>, removed: Vec<WorkspaceFolder>) -> Self {
        Self { added, removed }
    }

    pub fn added(&self) -> &[WorkspaceFolder] {
        &self.added
    }

    pub fn removed(&self) -> &[WorkspaceFolder] {
        &self.removed
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
