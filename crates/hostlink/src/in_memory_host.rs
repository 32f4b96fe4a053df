use std::sync::Mutex;

use async_trait::async_trait;
use globset::{Glob, GlobMatcher};
use url::Url;

use crate::{FolderSpec, HostError, WorkspaceHost};

/// A recorded `propose_folder_edit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedEdit {
    pub initiator: String,
    pub start_index: usize,
    pub delete_count: usize,
    pub folders_to_add: Vec<FolderSpec>,
}

/// A recorded `start_search` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRecord {
    pub request_id: u64,
    pub include_glob: Option<String>,
    pub include_base: Option<Url>,
    pub exclude_glob: Option<String>,
    pub max_results: Option<usize>,
}

#[derive(Debug, Default)]
struct HostState {
    resources: Vec<String>,
    proposals: Vec<ProposedEdit>,
    searches: Vec<SearchRecord>,
    cancelled: Vec<u64>,
    save_requests: Vec<bool>,
    save_result: bool,
    fail_proposals: bool,
    fail_searches: bool,
}

/// Scripted `WorkspaceHost` for tests.
///
/// Records every call it receives and serves searches from a flat list of
/// registered resource URIs, matching the include/exclude globs against the
/// path portion of each URI.
#[derive(Debug)]
pub struct InMemoryHost {
    state: Mutex<HostState>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HostState {
                save_result: true,
                ..Default::default()
            }),
        }
    }

    /// Registers a resource URI for `start_search` to find.
    pub fn add_resource(&self, uri: impl Into<String>) {
        self.state.lock().unwrap().resources.push(uri.into());
    }

    /// Makes every subsequent `propose_folder_edit` fail. The call is still
    /// recorded, so tests can assert that it was attempted.
    pub fn fail_proposals(&self, fail: bool) {
        self.state.lock().unwrap().fail_proposals = fail;
    }

    /// Makes every subsequent `start_search` fail.
    pub fn fail_searches(&self, fail: bool) {
        self.state.lock().unwrap().fail_searches = fail;
    }

    /// Sets the value returned by `save_all`.
    pub fn set_save_result(&self, result: bool) {
        self.state.lock().unwrap().save_result = result;
    }

    pub fn proposals(&self) -> Vec<ProposedEdit> {
        self.state.lock().unwrap().proposals.clone()
    }

    pub fn search_requests(&self) -> Vec<SearchRecord> {
        self.state.lock().unwrap().searches.clone()
    }

    pub fn cancelled_searches(&self) -> Vec<u64> {
        self.state.lock().unwrap().cancelled.clone()
    }

    pub fn save_requests(&self) -> Vec<bool> {
        self.state.lock().unwrap().save_requests.clone()
    }
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

fn compile_glob(pattern: &Option<String>) -> Result<Option<GlobMatcher>, HostError> {
    match pattern {
        Some(glob) => Glob::new(glob)
            .map(|glob| Some(glob.compile_matcher()))
            .map_err(|err| HostError::Search(err.to_string())),
        None => Ok(None),
    }
}

/// The string the globs are matched against: the URI path relative to
/// `include_base` when one is given, the bare URI path otherwise.
fn match_candidate(uri: &str, include_base: &Option<Url>) -> Option<String> {
    match include_base {
        Some(base) => {
            let base = base.as_str().trim_end_matches('/');
            let rest = uri.strip_prefix(base)?;
            Some(rest.strip_prefix('/')?.to_string())
        }
        None => {
            let parsed = Url::parse(uri).ok()?;
            Some(parsed.path().trim_start_matches('/').to_string())
        }
    }
}

#[async_trait]
impl WorkspaceHost for InMemoryHost {
    async fn propose_folder_edit(
        &self,
        initiator: &str,
        start_index: usize,
        delete_count: usize,
        folders_to_add: Vec<FolderSpec>,
    ) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        state.proposals.push(ProposedEdit {
            initiator: initiator.to_string(),
            start_index,
            delete_count,
            folders_to_add,
        });

        if state.fail_proposals {
            return Err(HostError::Disconnected);
        }
        Ok(())
    }

    async fn start_search(
        &self,
        include_glob: Option<String>,
        include_base: Option<Url>,
        exclude_glob: Option<String>,
        max_results: Option<usize>,
        request_id: u64,
    ) -> Result<Vec<String>, HostError> {
        let mut state = self.state.lock().unwrap();
        state.searches.push(SearchRecord {
            request_id,
            include_glob: include_glob.clone(),
            include_base: include_base.clone(),
            exclude_glob: exclude_glob.clone(),
            max_results,
        });

        if state.fail_searches {
            return Err(HostError::Search("scripted failure".to_string()));
        }

        let include = compile_glob(&include_glob)?;
        let exclude = compile_glob(&exclude_glob)?;

        let mut results = Vec::new();
        for uri in &state.resources {
            let Some(candidate) = match_candidate(uri, &include_base) else {
                continue;
            };
            if let Some(matcher) = &include {
                if !matcher.is_match(&candidate) {
                    continue;
                }
            }
            if let Some(matcher) = &exclude {
                if matcher.is_match(&candidate) {
                    continue;
                }
            }

            results.push(uri.clone());
            if max_results.is_some_and(|max| results.len() >= max) {
                break;
            }
        }

        log::trace!("search {} matched {} resources", request_id, results.len());
        Ok(results)
    }

    fn cancel_search(&self, request_id: u64) {
        self.state.lock().unwrap().cancelled.push(request_id);
    }

    async fn save_all(&self, include_untitled: bool) -> Result<bool, HostError> {
        let mut state = self.state.lock().unwrap();
        state.save_requests.push(include_untitled);
        Ok(state.save_result)
    }
}
