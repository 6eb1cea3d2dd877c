//! Scenario: runs that fail, and what they leave behind.

use tempfile::tempdir;

use dcr::domain::ports::TransferEvent;
use dcr::Stage;

use crate::common::*;

#[tokio::test]
async fn invalid_key_fails_connecting_and_removes_archive() {
    let source = tempdir().unwrap();
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    write_site(source.path());
    let key = write_key(keys.path(), INVALID_KEY);
    let remote = FakeRemote::new();
    let sink = RecordingSink::shared();

    let outcome = use_case(&remote, work.path())
        .run(&profile(source.path(), &key, "/srv/app"), sink.clone())
        .await;

    assert_eq!(outcome.failed_stage(), Some(Stage::Connecting));
    assert_eq!(outcome.error().unwrap().kind(), "ConnectError");
    assert!(dir_is_empty(work.path()), "local archive left behind");
    assert!(remote.log().commands.is_empty());
    assert!(matches!(
        sink.events().last(),
        Some(TransferEvent::Failed {
            stage: Stage::Connecting,
            kind: "ConnectError",
            ..
        })
    ));
}

#[tokio::test]
async fn read_only_destination_fails_validating_without_upload() {
    let source = tempdir().unwrap();
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    write_site(source.path());
    let key = write_key(keys.path(), VALID_KEY);
    let remote = FakeRemote::new().read_only_dir("/readonly");

    let outcome = use_case(&remote, work.path())
        .execute(&profile(source.path(), &key, "/readonly"))
        .await;

    assert_eq!(outcome.failed_stage(), Some(Stage::Validating));
    assert_eq!(outcome.error().unwrap().kind(), "PermissionError");
    let log = remote.log();
    assert!(log.uploads.is_empty());
    assert_eq!(log.sessions_closed, log.sessions_opened);
    assert!(dir_is_empty(work.path()));
}

#[tokio::test]
async fn uncreatable_destination_is_remote_environment_error() {
    let source = tempdir().unwrap();
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    write_site(source.path());
    let key = write_key(keys.path(), VALID_KEY);
    let remote = FakeRemote::new().read_only_dir("/locked");

    let outcome = use_case(&remote, work.path())
        .execute(&profile(source.path(), &key, "/locked/site"))
        .await;

    assert_eq!(outcome.failed_stage(), Some(Stage::Validating));
    assert_eq!(outcome.error().unwrap().kind(), "RemoteEnvironmentError");
    assert!(outcome.to_string().contains("Permission denied"));
}

#[tokio::test]
async fn missing_unzip_fails_before_upload() {
    let source = tempdir().unwrap();
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    write_site(source.path());
    let key = write_key(keys.path(), VALID_KEY);
    let remote = FakeRemote::new().without_unzip();

    let outcome = use_case(&remote, work.path())
        .execute(&profile(source.path(), &key, "/srv/app"))
        .await;

    assert_eq!(outcome.failed_stage(), Some(Stage::Validating));
    assert_eq!(outcome.error().unwrap().kind(), "MissingDependencyError");
    assert!(remote.log().uploads.is_empty());
}

#[tokio::test]
async fn missing_source_fails_packaging_without_connecting() {
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    let key = write_key(keys.path(), VALID_KEY);
    let remote = FakeRemote::new();
    let missing = work.path().join("does-not-exist");

    let outcome = use_case(&remote, work.path())
        .execute(&profile(&missing, &key, "/srv/app"))
        .await;

    assert_eq!(outcome.failed_stage(), Some(Stage::Packaging));
    assert_eq!(outcome.error().unwrap().kind(), "NotFoundError");
    assert_eq!(remote.log().sessions_opened, 0);
    assert!(dir_is_empty(work.path()));
}

#[tokio::test]
async fn failure_line_names_stage_and_kind() {
    let source = tempdir().unwrap();
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    write_site(source.path());
    let key = write_key(keys.path(), VALID_KEY);
    let remote = FakeRemote::new().read_only_dir("/readonly");

    let failure = use_case(&remote, work.path())
        .execute(&profile(source.path(), &key, "/readonly"))
        .await
        .into_result()
        .unwrap_err();

    assert!(
        failure
            .to_string()
            .starts_with("Validating: PermissionError: cannot write to /readonly"),
        "{}",
        failure
    );
}
