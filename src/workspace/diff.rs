use std::cmp::Ordering;

use crate::path_util::{fold_key, IGNORE_CASE};

use super::WorkspaceFolder;

/// Minimal difference between two folder lists under some total order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderDelta {
    pub added: Vec<WorkspaceFolder>,
    pub removed: Vec<WorkspaceFolder>,
}

impl FolderDelta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Orders folders by identifier alone, case-folded per platform. Under this
/// order a renamed folder is still the same folder, so diffs driven by it
/// never report a rename as remove+add. This is the comparator behind the
/// public change notification.
pub fn compare_uri(a: &WorkspaceFolder, b: &WorkspaceFolder) -> Ordering {
    folded_uri(a).cmp(&folded_uri(b))
}

/// Orders folders by identifier, then display name. Under this order a
/// rename does count as a change, which is what the mutation path needs to
/// decide whether a proposed edit would do anything at all.
pub fn compare_uri_and_name(a: &WorkspaceFolder, b: &WorkspaceFolder) -> Ordering {
    compare_uri(a, b).then_with(|| a.name.cmp(&b.name))
}

fn folded_uri(folder: &WorkspaceFolder) -> String {
    fold_key(folder.uri.as_str(), IGNORE_CASE)
}

/// Computes the folders present only in `old` (removed) and only in `new`
/// (added) under `compare`. Both inputs are sorted with the same comparator
/// and walked in a single merge pass; elements that compare equal appear in
/// neither output.
pub fn diff_folder_sets(
    old: &[WorkspaceFolder],
    new: &[WorkspaceFolder],
    compare: impl Fn(&WorkspaceFolder, &WorkspaceFolder) -> Ordering,
) -> FolderDelta {
    let mut old_sorted: Vec<&WorkspaceFolder> = old.iter().collect();
    let mut new_sorted: Vec<&WorkspaceFolder> = new.iter().collect();
    old_sorted.sort_by(|a, b| compare(a, b));
    new_sorted.sort_by(|a, b| compare(a, b));

    let mut added = Vec::new();
    let mut removed = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < old_sorted.len() && j < new_sorted.len() {
        match compare(old_sorted[i], new_sorted[j]) {
            Ordering::Less => {
                removed.push(old_sorted[i].clone());
                i += 1;
            }
            Ordering::Greater => {
                added.push(new_sorted[j].clone());
                j += 1;
            }
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    removed.extend(old_sorted[i..].iter().map(|folder| (*folder).clone()));
    added.extend(new_sorted[j..].iter().map(|folder| (*folder).clone()));

    FolderDelta { added, removed }
}
