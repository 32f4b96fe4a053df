/*!
Capability layer between a workspace client and the process that owns the
authoritative folder list.

hostlink defines the operations a controlling host must provide to its
clients (folder-edit proposals, file search, save-all) as a single async
trait with swappable implementations:

* A transport-backed implementation supplied by the embedding application
* [`NoopHost`], which rejects every operation
* [`InMemoryHost`], a scripted host useful for testing
*/

mod in_memory_host;
mod noop_host;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub use in_memory_host::{InMemoryHost, ProposedEdit, SearchRecord};
pub use noop_host::NoopHost;

/// A folder to be spliced into the authoritative folder list by a proposed
/// edit. The display name is optional; the host derives one from the URI
/// when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSpec {
    pub uri: Url,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Errors produced by a workspace host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("the workspace host is not connected")]
    Disconnected,

    #[error("the workspace host does not support this operation")]
    Unsupported,

    #[error("search failed: {0}")]
    Search(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Operations provided by the process that owns the workspace.
///
/// All methods take `&self`; implementations manage their own interior
/// synchronization so one host can be shared across tasks.
#[async_trait]
pub trait WorkspaceHost: Send + Sync + 'static {
    /// Propose splicing `folders_to_add` into the authoritative folder list
    /// at `start_index`, replacing `delete_count` existing entries.
    ///
    /// The host applies the edit (or not) and publishes the outcome through
    /// its usual workspace-data push; there is no per-call acknowledgement
    /// beyond the returned result.
    async fn propose_folder_edit(
        &self,
        initiator: &str,
        start_index: usize,
        delete_count: usize,
        folders_to_add: Vec<FolderSpec>,
    ) -> Result<(), HostError>;

    /// Run a file search and return raw resource descriptors (URI strings).
    ///
    /// `include_base` anchors the include glob to one folder; without it the
    /// glob applies to every root the host is tracking. `request_id`
    /// identifies the search for a later [`cancel_search`] call.
    ///
    /// [`cancel_search`]: WorkspaceHost::cancel_search
    async fn start_search(
        &self,
        include_glob: Option<String>,
        include_base: Option<Url>,
        exclude_glob: Option<String>,
        max_results: Option<usize>,
        request_id: u64,
    ) -> Result<Vec<String>, HostError>;

    /// Ask the host to stop the search identified by `request_id`.
    ///
    /// Cancellation is advisory: the matching [`start_search`] call still
    /// resolves with whatever the host decides to return.
    ///
    /// [`start_search`]: WorkspaceHost::start_search
    fn cancel_search(&self, request_id: u64);

    /// Save all dirty documents owned by the host. Returns whether every
    /// save succeeded.
    async fn save_all(&self, include_untitled: bool) -> Result<bool, HostError>;
}
