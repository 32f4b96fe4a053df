use pretty_assertions::assert_eq;
use url::Url;

use crate::workspace::{compare_uri, compare_uri_and_name, diff_folder_sets, WorkspaceFolder};

fn folder(uri: &str, name: &str, index: usize) -> WorkspaceFolder {
    WorkspaceFolder {
        uri: Url::parse(uri).unwrap(),
        name: name.to_string(),
        index,
    }
}

#[test]
fn identical_lists_diff_to_nothing() {
    let folders = vec![folder("file:///a", "a", 0), folder("file:///b", "b", 1)];

    let delta = diff_folder_sets(&folders, &folders, compare_uri);

    assert!(delta.is_empty());
}

#[test]
fn reordered_lists_diff_to_nothing() {
    let old = vec![folder("file:///a", "a", 0), folder("file:///b", "b", 1)];
    let new = vec![folder("file:///b", "b", 0), folder("file:///a", "a", 1)];

    let delta = diff_folder_sets(&old, &new, compare_uri);

    assert!(delta.is_empty());
}

#[test]
fn added_and_removed_are_classified() {
    let old = vec![folder("file:///a", "a", 0), folder("file:///b", "b", 1)];
    let new = vec![folder("file:///b", "b", 0), folder("file:///c", "c", 1)];

    let delta = diff_folder_sets(&old, &new, compare_uri);

    assert_eq!(delta.added, vec![folder("file:///c", "c", 1)]);
    assert_eq!(delta.removed, vec![folder("file:///a", "a", 0)]);
}

#[test]
fn rename_is_invisible_to_the_identifier_comparator() {
    let old = vec![folder("file:///a", "a", 0)];
    let new = vec![folder("file:///a", "alpha", 0)];

    let delta = diff_folder_sets(&old, &new, compare_uri);

    assert!(delta.is_empty());
}

#[test]
fn rename_is_a_change_to_the_identifier_and_name_comparator() {
    let old = vec![folder("file:///a", "a", 0)];
    let new = vec![folder("file:///a", "alpha", 0)];

    let delta = diff_folder_sets(&old, &new, compare_uri_and_name);

    assert_eq!(delta.added, vec![folder("file:///a", "alpha", 0)]);
    assert_eq!(delta.removed, vec![folder("file:///a", "a", 0)]);
}

#[test]
fn applying_the_delta_reconstructs_the_new_set() {
    let old = vec![
        folder("file:///a", "a", 0),
        folder("file:///b", "b", 1),
        folder("file:///c", "c", 2),
    ];
    let new = vec![
        folder("file:///b", "b", 0),
        folder("file:///d", "d", 1),
        folder("file:///e", "e", 2),
    ];

    let delta = diff_folder_sets(&old, &new, compare_uri);

    let mut reconstructed: Vec<WorkspaceFolder> = old
        .iter()
        .filter(|folder| !delta.removed.contains(folder))
        .cloned()
        .collect();
    reconstructed.extend(delta.added.iter().cloned());
    reconstructed.sort_by(compare_uri);

    let mut expected = new.clone();
    expected.sort_by(compare_uri);
    assert_eq!(reconstructed, expected);
}

#[test]
fn empty_against_populated_reports_everything() {
    let folders = vec![folder("file:///a", "a", 0), folder("file:///b", "b", 1)];

    let removed = diff_folder_sets(&folders, &[], compare_uri);
    assert!(removed.added.is_empty());
    assert_eq!(removed.removed.len(), 2);

    let added = diff_folder_sets(&[], &folders, compare_uri);
    assert!(added.removed.is_empty());
    assert_eq!(added.added.len(), 2);
}
