use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use hostlink::{FolderSpec, HostError, WorkspaceHost};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    message_queue::MessageQueue,
    path_util::{self, fold_key, IGNORE_CASE},
    workspace::{
        compare_uri, compare_uri_and_name, diff_folder_sets, FolderChangeEvent, WorkspaceData,
        WorkspaceFolder, WorkspaceModel,
    },
};

/// Process-wide search request counter. Identifiers are handed out strictly
/// increasing and never reused, including for requests that were cancelled
/// or have long since completed.
static NEXT_SEARCH_REQUEST: AtomicU64 = AtomicU64::new(1);

/// Include pattern for a file search: a bare glob applied to every root, or
/// a glob anchored to one folder.
#[derive(Debug, Clone)]
pub enum FilePattern {
    Glob(String),
    Relative { base: Url, glob: String },
}

/// A folder a caller wants spliced into the workspace. The display name is
/// optional and defaults to the URI's basename.
#[derive(Debug, Clone)]
pub struct FolderToAdd {
    pub uri: Url,
    pub name: Option<String>,
}

/// Maintains this process's view of the workspace folder list and the
/// protocol around it.
///
/// The folder list is owned by the controlling process, reached through a
/// [`WorkspaceHost`]. Reads are answered from the local model. The one
/// mutating operation, [`update_workspace_folders`], validates locally,
/// proposes the edit to the host without waiting for it, and reflects the
/// edit optimistically; whatever the host decides arrives later through
/// [`accept_workspace_data`], which rebuilds the model and publishes the
/// resulting added/removed delta on the controller's message queue.
///
/// [`update_workspace_folders`]: WorkspaceController::update_workspace_folders
/// [`accept_workspace_data`]: WorkspaceController::accept_workspace_data
pub struct WorkspaceController {
    host: Arc<dyn WorkspaceHost>,
    model: Mutex<Option<WorkspaceModel>>,
    message_queue: Arc<MessageQueue<FolderChangeEvent>>,
}

impl WorkspaceController {
    /// Creates a controller from the workspace state known at startup, or
    /// with no workspace open when `initial` is absent.
    pub fn new(host: Arc<dyn WorkspaceHost>, initial: Option<WorkspaceData>) -> Self {
        let model = initial.as_ref().map(WorkspaceModel::from_data);
        match &model {
            Some(model) => log::trace!(
                "workspace controller starting with {} folder(s)",
                model.folder_list().len()
            ),
            None => log::trace!("workspace controller starting with no workspace open"),
        }

        Self {
            host,
            model: Mutex::new(model),
            message_queue: Arc::new(MessageQueue::new()),
        }
    }

    /// The queue folder change events are published on. Subscribe with a
    /// cursor to follow updates; events arrive in the order the
    /// authoritative pushes that produced them were accepted.
    pub fn message_queue(&self) -> &MessageQueue<FolderChangeEvent> {
        &self.message_queue
    }

    /// The current folder list, or `None` when no workspace is open.
    pub fn folders(&self) -> Option<Vec<WorkspaceFolder>> {
        let model = self.model.lock().unwrap();
        model.as_ref().map(WorkspaceModel::folders)
    }

    /// The workspace's display name, or `None` when no workspace is open.
    pub fn workspace_name(&self) -> Option<String> {
        let model = self.model.lock().unwrap();
        model.as_ref().map(|model| model.name().to_string())
    }

    /// The workspace's identity, or `None` when no workspace is open.
    pub fn workspace_id(&self) -> Option<String> {
        let model = self.model.lock().unwrap();
        model.as_ref().map(|model| model.id().to_string())
    }

    /// The folder containing `key` (a URI or absolute path), if any. See
    /// [`WorkspaceModel::folder_for`] for the `resolve_parent` contract.
    pub fn folder(&self, key: &str, resolve_parent: bool) -> Option<WorkspaceFolder> {
        let uri = path_util::parse_key(key)?;
        let model = self.model.lock().unwrap();
        model.as_ref()?.folder_for(&uri, resolve_parent).cloned()
    }

    /// Filesystem path of the folder at position zero. `None` when no
    /// workspace is open, the folder list is empty, or the first folder is
    /// not file-backed. Always the first folder: callers that care about
    /// the rest of a multi-folder workspace must use [`folders`].
    ///
    /// [`folders`]: WorkspaceController::folders
    pub fn primary_root_path(&self) -> Option<PathBuf> {
        let model = self.model.lock().unwrap();
        let first = model.as_ref()?.folder_list().first()?.clone();
        drop(model);
        first.uri.to_file_path().ok()
    }

    /// Rewrites `input` relative to the root of the folder that contains
    /// it. The folder's display name is prepended when
    /// `include_workspace_name` asks for it, or is left unspecified while
    /// more than one folder is open. Input that is empty or not contained
    /// in any folder comes back unchanged.
    pub fn relative_path(&self, input: &str, include_workspace_name: Option<bool>) -> String {
        if input.is_empty() {
            return input.to_string();
        }
        let Some(uri) = path_util::parse_key(input) else {
            return input.to_string();
        };

        let model = self.model.lock().unwrap();
        let Some(model) = model.as_ref() else {
            return input.to_string();
        };
        let Some(folder) = model.folder_for(&uri, true) else {
            return input.to_string();
        };
        let Some(remainder) = path_util::strip_ancestor(folder.uri.as_str(), uri.as_str(), IGNORE_CASE)
        else {
            return input.to_string();
        };

        let include_name =
            include_workspace_name.unwrap_or_else(|| model.folder_list().len() > 1);
        if include_name {
            format!("{}/{}", folder.name, remainder)
        } else {
            remainder
        }
    }

    /// Proposes replacing `delete_count` folders at `start_index` with
    /// `folders_to_add`, and reflects the edit locally without waiting for
    /// the host.
    ///
    /// Returns `false` without side effects when the edit is invalid (range
    /// out of bounds, duplicate folder, no workspace open) or would change
    /// nothing. Returns `true` once the proposal has been accepted locally;
    /// this says nothing about whether the host will apply it. The host's
    /// verdict arrives as a later [`accept_workspace_data`] push, which
    /// simply supersedes the optimistic state. A failed proposal send is
    /// logged, not reported to the caller.
    ///
    /// Additions are deduplicated by identifier (first occurrence wins) and
    /// get display names derived from their URIs when none is supplied.
    ///
    /// Must be called from within a tokio runtime; the proposal is
    /// dispatched as a detached task.
    ///
    /// [`accept_workspace_data`]: WorkspaceController::accept_workspace_data
    pub fn update_workspace_folders(
        &self,
        initiator: &str,
        start_index: usize,
        delete_count: usize,
        folders_to_add: &[FolderToAdd],
    ) -> bool {
        let mut seen = HashSet::new();
        let distinct: Vec<&FolderToAdd> = folders_to_add
            .iter()
            .filter(|add| seen.insert(fold_key(add.uri.as_str(), IGNORE_CASE)))
            .collect();

        if delete_count == 0 && distinct.is_empty() {
            return false;
        }

        let mut model = self.model.lock().unwrap();
        let Some(model) = model.as_mut() else {
            log::debug!("rejecting folder edit from {initiator}: no workspace open");
            return false;
        };

        let current = model.folders();
        let splice_end = match start_index.checked_add(delete_count) {
            Some(end) if end <= current.len() => end,
            _ => {
                log::debug!(
                    "rejecting folder edit from {initiator}: splice {start_index}+{delete_count} exceeds {} folder(s)",
                    current.len()
                );
                return false;
            }
        };

        let additions: Vec<WorkspaceFolder> = distinct
            .iter()
            .map(|add| WorkspaceFolder {
                uri: add.uri.clone(),
                name: add
                    .name
                    .clone()
                    .unwrap_or_else(|| path_util::basename(add.uri.as_str())),
                index: 0,
            })
            .collect();

        let mut prospective = current.clone();
        prospective.splice(start_index..splice_end, additions);
        for (position, folder) in prospective.iter_mut().enumerate() {
            folder.index = position;
        }

        // The same folder can not appear in the workspace twice.
        let mut keys = HashSet::new();
        for folder in &prospective {
            if !keys.insert(fold_key(folder.uri.as_str(), IGNORE_CASE)) {
                log::debug!(
                    "rejecting folder edit from {initiator}: {} is already a workspace folder",
                    folder.uri
                );
                return false;
            }
        }

        // Identifier+name comparison, so a pure rename still counts as a
        // change while a splice that reproduces the current list does not.
        if diff_folder_sets(&current, &prospective, compare_uri_and_name).is_empty() {
            return false;
        }

        let host = Arc::clone(&self.host);
        let initiator = initiator.to_string();
        let payload: Vec<FolderSpec> = distinct
            .iter()
            .map(|add| FolderSpec {
                uri: add.uri.clone(),
                name: add.name.clone(),
            })
            .collect();
        tokio::spawn(async move {
            if let Err(err) = host
                .propose_folder_edit(&initiator, start_index, delete_count, payload)
                .await
            {
                log::error!("failed to propose workspace folder edit: {err}");
            }
        });

        model.try_set_folders(prospective);
        true
    }

    /// Accepts a workspace-data push from the controlling process. Always
    /// wins over local optimistic state. Rebuilds the model (or drops it
    /// when `data` is absent) and, when the folder set actually changed,
    /// publishes the added/removed delta on the message queue.
    ///
    /// The delta is computed on identifiers alone: reordering or renaming
    /// folders does not produce an event.
    pub fn accept_workspace_data(&self, data: Option<WorkspaceData>) {
        let new_model = data.as_ref().map(WorkspaceModel::from_data);

        let mut model = self.model.lock().unwrap();
        let old_folders = model
            .as_ref()
            .map(WorkspaceModel::folders)
            .unwrap_or_default();
        let new_folders = new_model
            .as_ref()
            .map(WorkspaceModel::folders)
            .unwrap_or_default();
        *model = new_model;

        let delta = diff_folder_sets(&old_folders, &new_folders, compare_uri);
        if delta.is_empty() {
            return;
        }

        log::trace!(
            "workspace folders changed: {} added, {} removed",
            delta.added.len(),
            delta.removed.len()
        );
        // Published while still holding the model lock so events always
        // appear in the order their pushes were accepted.
        self.message_queue
            .push_messages(&[FolderChangeEvent::new(delta.added, delta.removed)]);
    }

    /// Runs a file search on the host and maps the results back to URIs.
    ///
    /// Cancelling through `token` sends a cancel request for this search's
    /// identifier but remains cooperative: the call still resolves with
    /// whatever the host eventually returns. Descriptors that do not parse
    /// as URIs are dropped with a warning.
    pub async fn find_files(
        &self,
        include: Option<FilePattern>,
        exclude_glob: Option<String>,
        max_results: Option<usize>,
        token: Option<CancellationToken>,
    ) -> Result<Vec<Url>, HostError> {
        let request_id = NEXT_SEARCH_REQUEST.fetch_add(1, Ordering::Relaxed);
        let (include_glob, include_base) = match include {
            Some(FilePattern::Glob(glob)) => (Some(glob), None),
            Some(FilePattern::Relative { base, glob }) => (Some(glob), Some(base)),
            None => (None, None),
        };

        log::trace!("starting file search {request_id}");
        let search = self
            .host
            .start_search(include_glob, include_base, exclude_glob, max_results, request_id);

        let raw = match token {
            Some(token) => {
                tokio::pin!(search);
                // Biased so a token that is already cancelled is noticed
                // before a host that answers instantly.
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        log::trace!("cancelling file search {request_id}");
                        self.host.cancel_search(request_id);
                        search.await
                    }
                    result = &mut search => result,
                }
            }
            None => search.await,
        }?;

        Ok(raw
            .into_iter()
            .filter_map(|descriptor| match Url::parse(&descriptor) {
                Ok(uri) => Some(uri),
                Err(_) => {
                    log::warn!("dropping search result with malformed identifier: {descriptor}");
                    None
                }
            })
            .collect())
    }

    /// Saves all dirty documents on the host. Returns whether every save
    /// succeeded.
    pub async fn save_all(&self, include_untitled: bool) -> Result<bool, HostError> {
        self.host.save_all(include_untitled).await
    }
}
