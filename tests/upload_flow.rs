mod common;

use common::{FakeStorage, payload, record};
use receipt_ocr::session::WorkspaceStore;
use receipt_ocr::storage::StorageClient;
use receipt_ocr::upload::{
    PROCESSING_CONTEXT, Refusal, UploadCoordinator, UploadOutcome, UploadPhase, UploadState,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

fn coordinator(fake: &Arc<FakeStorage>) -> UploadCoordinator {
    UploadCoordinator::new(Arc::clone(fake) as Arc<dyn StorageClient>)
}

#[tokio::test]
async fn test_successful_upload_returns_record() {
    let rec = record("lunch.jpg", "image/jpeg", Some("TOTAL 12.40"), Some(0.91));
    let fake = Arc::new(FakeStorage::new().succeed(rec.clone()));
    let coordinator = coordinator(&fake);

    let outcome = coordinator.submit([payload("lunch.jpg")]).await;

    match outcome {
        UploadOutcome::Completed(got) => assert_eq!(got, rec),
        other => panic!("expected completion, got {other:?}"),
    }
    assert_eq!(coordinator.state(), UploadState::default());
}

#[tokio::test]
async fn test_uploads_with_invoice_context_and_source_tag() {
    let fake = Arc::new(FakeStorage::new().succeed(record("a.png", "image/png", None, None)));
    let coordinator = coordinator(&fake);

    coordinator.submit([payload("a.png")]).await;

    let seen = fake.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].context, PROCESSING_CONTEXT);
    assert_eq!(seen[0].context, "invoice");
    assert_eq!(
        seen[0].tags.get("source").map(String::as_str),
        Some("receipt-ocr-app")
    );
    assert_eq!(seen[0].content_type, "image/png");
}

#[tokio::test]
async fn test_network_timeout_sets_error() {
    let fake = Arc::new(FakeStorage::new().with_progress(&[40]).fail("Network timeout"));
    let coordinator = coordinator(&fake);

    let outcome = coordinator.submit([payload("receipt.png")]).await;

    assert!(matches!(outcome, UploadOutcome::Failed(ref m) if m == "Network timeout"));
    let state = coordinator.state();
    assert!(!state.is_uploading);
    assert_eq!(state.progress, 0);
    assert_eq!(state.error.as_deref(), Some("Network timeout"));
    assert_eq!(state.phase(), UploadPhase::Failed);
}

#[tokio::test]
async fn test_error_without_message_uses_generic_text() {
    let fake = Arc::new(FakeStorage::new().fail("   "));
    let coordinator = coordinator(&fake);

    coordinator.submit([payload("receipt.png")]).await;

    assert_eq!(coordinator.state().error.as_deref(), Some("Upload failed"));
}

#[tokio::test]
async fn test_two_file_drop_uses_first() {
    let fake = Arc::new(FakeStorage::new().succeed(record("first.png", "image/png", None, None)));
    let coordinator = coordinator(&fake);

    coordinator
        .submit([payload("first.png"), payload("second.pdf")])
        .await;

    let seen = fake.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].file_name, "first.png");
}

#[tokio::test]
async fn test_empty_selection_is_ignored() {
    let fake = Arc::new(FakeStorage::new());
    let coordinator = coordinator(&fake);

    let outcome = coordinator.submit(Vec::new()).await;

    assert!(matches!(outcome, UploadOutcome::Refused(Refusal::NoFile)));
    assert!(fake.seen().is_empty());
    assert_eq!(coordinator.state(), UploadState::default());
}

#[tokio::test]
async fn test_progress_is_observable_while_uploading() {
    let gate = Arc::new(Notify::new());
    let fake = Arc::new(
        FakeStorage::new()
            .with_progress(&[10, 55, 55, 80])
            .gated(Arc::clone(&gate))
            .succeed(record("r.png", "image/png", None, None)),
    );
    let coordinator = coordinator(&fake);
    let mut rx = coordinator.subscribe();

    let task = tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.submit([payload("r.png")]).await }
    });

    let state = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.is_uploading && s.progress == 80),
    )
    .await
    .expect("progress never reached 80")
    .expect("sender dropped")
    .clone();
    assert_eq!(state.phase(), UploadPhase::Uploading);
    assert_eq!(state.error, None);

    gate.notify_one();
    let outcome = task.await.unwrap();
    assert!(matches!(outcome, UploadOutcome::Completed(_)));
    assert_eq!(coordinator.state().progress, 0);
    assert!(!coordinator.state().is_uploading);
}

#[tokio::test]
async fn test_second_submit_while_uploading_is_refused() {
    let gate = Arc::new(Notify::new());
    let fake = Arc::new(
        FakeStorage::new()
            .with_progress(&[25])
            .gated(Arc::clone(&gate))
            .succeed(record("one.png", "image/png", None, None)),
    );
    let coordinator = coordinator(&fake);
    let mut rx = coordinator.subscribe();

    let first = tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.submit([payload("one.png")]).await }
    });
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.progress == 25))
        .await
        .unwrap()
        .unwrap();

    let second = coordinator.submit([payload("two.png")]).await;
    assert!(matches!(second, UploadOutcome::Refused(Refusal::Busy)));
    // Refusal leaves the running upload's state alone
    assert!(coordinator.state().is_uploading);
    assert_eq!(coordinator.state().progress, 25);

    gate.notify_one();
    assert!(matches!(first.await.unwrap(), UploadOutcome::Completed(_)));
    assert_eq!(fake.seen().len(), 1);
}

#[tokio::test]
async fn test_retry_after_failure_clears_error() {
    let fake = Arc::new(
        FakeStorage::new()
            .fail("Service unavailable")
            .succeed(record("r.png", "image/png", Some("ok"), None)),
    );
    let coordinator = coordinator(&fake);

    coordinator.submit([payload("r.png")]).await;
    assert_eq!(
        coordinator.state().error.as_deref(),
        Some("Service unavailable")
    );

    let outcome = coordinator.submit([payload("r.png")]).await;
    assert!(matches!(outcome, UploadOutcome::Completed(_)));
    assert_eq!(coordinator.state(), UploadState::default());
}

#[tokio::test]
async fn test_workspace_round_trip() {
    let rec = record("r.png", "image/png", Some("TOTAL 1.00"), Some(0.5));
    let fake = Arc::new(FakeStorage::new().succeed(rec.clone()));
    let store = WorkspaceStore::new(Arc::clone(&fake) as Arc<dyn StorageClient>);
    let workspace = store.create();

    assert!(workspace.view().is_uploader());

    let outcome = workspace.upload([payload("r.png")]).await;
    assert!(matches!(outcome, UploadOutcome::Completed(_)));
    assert_eq!(workspace.current_file(), Some(rec.clone()));

    assert_eq!(workspace.reset(), Some(rec));
    assert!(workspace.view().is_uploader());
    assert_eq!(workspace.current_file(), None);
}

#[tokio::test]
async fn test_failed_upload_keeps_displayed_file() {
    let shown = record("old.png", "image/png", Some("old"), None);
    let fake = Arc::new(FakeStorage::new().fail("Network timeout"));
    let store = WorkspaceStore::new(Arc::clone(&fake) as Arc<dyn StorageClient>);
    let workspace = store.create();
    workspace.show(shown.clone());

    let outcome = workspace.upload([payload("new.png")]).await;

    assert!(matches!(outcome, UploadOutcome::Failed(_)));
    assert_eq!(workspace.current_file(), Some(shown));
}

#[tokio::test]
async fn test_record_is_handed_over_before_idle() {
    let fake = Arc::new(FakeStorage::new().succeed(record("r.png", "image/png", None, None)));
    let coordinator = coordinator(&fake);

    let mut uploading_at_handover = None;
    let outcome = coordinator
        .submit_with([payload("r.png")], |record| {
            assert_eq!(record.original_name, "r.png");
            uploading_at_handover = Some(coordinator.state().is_uploading);
        })
        .await;

    assert!(matches!(outcome, UploadOutcome::Completed(_)));
    assert_eq!(uploading_at_handover, Some(true));
    assert_eq!(coordinator.state(), UploadState::default());
}

#[tokio::test]
async fn test_dropped_upload_returns_to_idle() {
    let gate = Arc::new(Notify::new());
    let fake = Arc::new(
        FakeStorage::new()
            .with_progress(&[30])
            .gated(Arc::clone(&gate))
            .succeed(record("b.png", "image/png", None, None)),
    );
    let coordinator = coordinator(&fake);

    let dropped =
        tokio::time::timeout(Duration::from_millis(20), coordinator.submit([payload("a.png")]))
            .await;
    assert!(dropped.is_err(), "upload should still be waiting on the gate");
    assert_eq!(coordinator.state(), UploadState::default());

    gate.notify_one();
    let outcome = coordinator.submit([payload("b.png")]).await;
    assert!(matches!(outcome, UploadOutcome::Completed(ref r) if r.original_name == "b.png"));
    assert_eq!(fake.seen().len(), 2);
}

#[tokio::test]
async fn test_sweeper_waits_for_upload_to_settle() {
    let gate = Arc::new(Notify::new());
    let fake = Arc::new(
        FakeStorage::new()
            .gated(Arc::clone(&gate))
            .succeed(record("r.png", "image/png", None, None)),
    );
    let store = WorkspaceStore::new(Arc::clone(&fake) as Arc<dyn StorageClient>);
    let workspace = store.create();
    let mut rx = workspace.uploader().subscribe();

    let upload = tokio::spawn({
        let workspace = workspace.clone();
        async move { workspace.upload([payload("r.png")]).await }
    });
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.is_uploading))
        .await
        .unwrap()
        .unwrap();

    // Idle long enough, but the upload is still in flight
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(store.cleanup_expired_with_timeout(Duration::from_millis(1)), 0);

    gate.notify_one();
    assert!(matches!(upload.await.unwrap(), UploadOutcome::Completed(_)));
    tokio::time::sleep(Duration::from_millis(20)).await;

    let sweeper = store.spawn_sweeper(Duration::from_millis(1), Duration::from_millis(1));
    tokio::time::timeout(Duration::from_secs(5), async {
        while !store.is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("settled workspace should be swept");
    sweeper.abort();
}
