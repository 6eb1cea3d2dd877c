//! Scenario: delivering the same tree twice, and the `test` check.

use tempfile::tempdir;

use crate::common::*;

#[tokio::test]
async fn second_run_leaves_destination_unchanged() {
    let source = tempdir().unwrap();
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    write_site(source.path());
    let key = write_key(keys.path(), VALID_KEY);
    let remote = FakeRemote::new();
    let use_case = use_case(&remote, work.path());
    let profile = profile(source.path(), &key, "/srv/app");

    assert!(use_case.execute(&profile).await.is_success());
    let first = remote.snapshot("/srv/app");
    assert!(use_case.execute(&profile).await.is_success());
    let second = remote.snapshot("/srv/app");

    assert_eq!(first, second);
    assert_eq!(remote.log().sessions_closed, 2);
}

#[tokio::test]
async fn changed_files_overwrite_previous_delivery() {
    let source = tempdir().unwrap();
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    write_site(source.path());
    let key = write_key(keys.path(), VALID_KEY);
    let remote = FakeRemote::new();
    let use_case = use_case(&remote, work.path());
    let profile = profile(source.path(), &key, "/srv/app");

    assert!(use_case.execute(&profile).await.is_success());
    write_tree(source.path(), &[("index.html", b"<h1>v2</h1>")]);
    assert!(use_case.execute(&profile).await.is_success());

    let index = std::fs::read(remote.path("/srv/app/index.html")).unwrap();
    assert_eq!(index, b"<h1>v2</h1>");
}

#[tokio::test]
async fn check_creates_destination_without_uploading() {
    let source = tempdir().unwrap();
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    write_site(source.path());
    let key = write_key(keys.path(), VALID_KEY);
    let remote = FakeRemote::new();

    let resolved = use_case(&remote, work.path())
        .check(&profile(source.path(), &key, "/srv/fresh"))
        .await
        .unwrap();

    assert_eq!(resolved.path, "/srv/fresh");
    assert!(resolved.created);
    assert!(remote.path("/srv/fresh").is_dir());
    assert!(remote.log().uploads.is_empty());
    assert!(dir_is_empty(work.path()));
}
