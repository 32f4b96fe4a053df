use async_trait::async_trait;
use url::Url;

use crate::{FolderSpec, HostError, WorkspaceHost};

/// `WorkspaceHost` that rejects every operation.
///
/// Stands in when no controlling process is attached, so callers see a
/// consistent `Unsupported` error instead of hanging on a missing transport.
#[derive(Debug, Default)]
pub struct NoopHost;

#[async_trait]
impl WorkspaceHost for NoopHost {
    async fn propose_folder_edit(
        &self,
        _initiator: &str,
        _start_index: usize,
        _delete_count: usize,
        _folders_to_add: Vec<FolderSpec>,
    ) -> Result<(), HostError> {
        Err(HostError::Unsupported)
    }

    async fn start_search(
        &self,
        _include_glob: Option<String>,
        _include_base: Option<Url>,
        _exclude_glob: Option<String>,
        _max_results: Option<usize>,
        _request_id: u64,
    ) -> Result<Vec<String>, HostError> {
        Err(HostError::Unsupported)
    }

    fn cancel_search(&self, _request_id: u64) {}

    async fn save_all(&self, _include_untitled: bool) -> Result<bool, HostError> {
        Err(HostError::Unsupported)
    }
}
