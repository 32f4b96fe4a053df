//! Tests for the search and save operations forwarded to the host.

use std::sync::Arc;

use hostlink::{HostError, InMemoryHost};
use libfolio::{FilePattern, WorkspaceController};
use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;
use url::Url;

fn uri(input: &str) -> Url {
    Url::parse(input).unwrap()
}

fn searchable_controller() -> (Arc<InMemoryHost>, WorkspaceController) {
    let _ = env_logger::builder().is_test(true).try_init();
    let host = Arc::new(InMemoryHost::new());
    host.add_resource("file:///proj/src/main.rs");
    host.add_resource("file:///proj/src/lib.rs");
    host.add_resource("file:///proj/target/debug/out.rs");
    host.add_resource("file:///proj/readme.md");
    let controller = WorkspaceController::new(host.clone(), None);
    (host, controller)
}

#[tokio::test]
async fn search_forwards_patterns_and_maps_results_to_uris() {
    let (host, controller) = searchable_controller();

    let results = controller
        .find_files(
            Some(FilePattern::Glob("**/*.rs".to_string())),
            Some("**/target/**".to_string()),
            None,
            None,
        )
        .await
        .unwrap();

    assert_eq!(
        results,
        vec![uri("file:///proj/src/main.rs"), uri("file:///proj/src/lib.rs")]
    );

    let requests = host.search_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].include_glob.as_deref(), Some("**/*.rs"));
    assert_eq!(requests[0].exclude_glob.as_deref(), Some("**/target/**"));
}

#[tokio::test]
async fn search_anchored_to_a_base_folder() {
    let host = Arc::new(InMemoryHost::new());
    host.add_resource("file:///proj/src/lib.rs");
    host.add_resource("file:///other/src/lib.rs");
    let controller = WorkspaceController::new(host.clone(), None);

    let results = controller
        .find_files(
            Some(FilePattern::Relative {
                base: uri("file:///proj"),
                glob: "src/**".to_string(),
            }),
            None,
            None,
            None,
        )
        .await
        .unwrap();

    assert_eq!(results, vec![uri("file:///proj/src/lib.rs")]);
    assert_eq!(
        host.search_requests()[0].include_base,
        Some(uri("file:///proj"))
    );
}

#[tokio::test]
async fn max_results_is_forwarded_and_honored() {
    let (_, controller) = searchable_controller();

    let results = controller
        .find_files(
            Some(FilePattern::Glob("**/*.rs".to_string())),
            None,
            Some(1),
            None,
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
}

#[tokio::test]
async fn request_ids_are_strictly_increasing_across_cancellations() {
    let (host, controller) = searchable_controller();

    let cancelled = CancellationToken::new();
    cancelled.cancel();

    controller.find_files(None, None, None, None).await.unwrap();
    controller
        .find_files(None, None, None, Some(cancelled))
        .await
        .unwrap();
    controller.find_files(None, None, None, None).await.unwrap();

    let ids: Vec<u64> = host
        .search_requests()
        .iter()
        .map(|request| request.request_id)
        .collect();
    assert_eq!(ids.len(), 3);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn cancellation_is_cooperative() {
    let (host, controller) = searchable_controller();

    let token = CancellationToken::new();
    token.cancel();

    // Cancelling sends a cancel request for the search's identifier, but
    // the call still resolves with whatever the host returned.
    let results = controller
        .find_files(
            Some(FilePattern::Glob("**/*.md".to_string())),
            None,
            None,
            Some(token),
        )
        .await
        .unwrap();

    assert_eq!(results, vec![uri("file:///proj/readme.md")]);

    let request_id = host.search_requests()[0].request_id;
    assert_eq!(host.cancelled_searches(), vec![request_id]);
}

#[tokio::test]
async fn search_failures_propagate_to_the_caller() {
    let (host, controller) = searchable_controller();
    host.fail_searches(true);

    let result = controller.find_files(None, None, None, None).await;

    assert!(matches!(result, Err(HostError::Search(_))));
}

#[tokio::test]
async fn save_all_is_a_pure_forward() {
    let host = Arc::new(InMemoryHost::new());
    let controller = WorkspaceController::new(host.clone(), None);

    assert!(controller.save_all(true).await.unwrap());

    host.set_save_result(false);
    assert!(!controller.save_all(false).await.unwrap());

    assert_eq!(host.save_requests(), vec![true, false]);
}
