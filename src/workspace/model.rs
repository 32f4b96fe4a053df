use std::collections::HashSet;

use url::Url;

use crate::path_util::{self, fold_key, IGNORE_CASE};

use super::{PathIndex, WorkspaceData, WorkspaceFolder};

/// Snapshot of the workspace held locally: identity, display name, the
/// ordered folder list, and the containment index derived from it.
///
/// A model is built whole from an authoritative payload and replaced whole
/// when the next payload arrives; the index is never patched across a
/// replacement. The one in-place mutation, [`try_set_folders`], exists for
/// the optimistic edit path and intentionally leaves the index alone.
///
/// [`try_set_folders`]: WorkspaceModel::try_set_folders
#[derive(Debug)]
pub struct WorkspaceModel {
    id: String,
    name: String,
    folders: Vec<WorkspaceFolder>,
    index: PathIndex<WorkspaceFolder>,
}

impl WorkspaceModel {
    /// Builds a model from an authoritative payload. Folder entries get a
    /// display name derived from their URI when none was supplied, duplicate
    /// identifiers keep their first occurrence, and indices are renumbered
    /// to match list position.
    pub fn from_data(data: &WorkspaceData) -> Self {
        let mut folders: Vec<WorkspaceFolder> = Vec::with_capacity(data.folders.len());
        let mut seen = HashSet::new();

        for folder in &data.folders {
            if !seen.insert(fold_key(folder.uri.as_str(), IGNORE_CASE)) {
                log::warn!("ignoring duplicate workspace folder {}", folder.uri);
                continue;
            }
            folders.push(WorkspaceFolder {
                uri: folder.uri.clone(),
                name: folder
                    .name
                    .clone()
                    .unwrap_or_else(|| path_util::basename(folder.uri.as_str())),
                index: folders.len(),
            });
        }

        let mut index = PathIndex::new(IGNORE_CASE);
        for folder in &folders {
            index.insert(folder.uri.as_str(), folder.clone());
        }

        Self {
            id: data.id.clone(),
            name: data.name.clone(),
            folders,
            index,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The folder list, in authoritative order. Callers get their own copy;
    /// mutating it does not touch the model.
    pub fn folders(&self) -> Vec<WorkspaceFolder> {
        self.folders.clone()
    }

    pub(crate) fn folder_list(&self) -> &[WorkspaceFolder] {
        &self.folders
    }

    /// The folder that contains `uri`.
    ///
    /// With `resolve_parent` set and `uri` naming a folder root exactly, the
    /// query runs against the root's parent directory instead, answering
    /// "which folder encloses this folder" rather than returning the folder
    /// itself.
    pub fn folder_for(&self, uri: &Url, resolve_parent: bool) -> Option<&WorkspaceFolder> {
        let key = uri.as_str();
        if resolve_parent && self.index.get_exact(key).is_some() {
            let parent = path_util::parent_key(key)?;
            self.index.find_containing(&parent)
        } else {
            self.index.find_containing(key)
        }
    }

    /// Replaces the folder list in place, leaving identity and display name
    /// untouched. The containment index is deliberately NOT rebuilt: this is
    /// the optimistic edit path, and consumers that need a consistent index
    /// get a whole new model on the next authoritative update.
    pub(crate) fn try_set_folders(&mut self, folders: Vec<WorkspaceFolder>) {
        self.folders = folders;
    }
}
