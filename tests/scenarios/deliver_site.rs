//! Scenario: a developer delivers a project directory to a server.

use tempfile::tempdir;

use dcr::domain::ports::TransferEvent;
use dcr::Stage;

use crate::common::*;

#[tokio::test]
async fn default_exclusions_leave_only_project_files() {
    let source = tempdir().unwrap();
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    let text = "lorem ipsum ".repeat(10 * 1024 / 12);
    let blob: Vec<u8> = (0..2 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    write_tree(
        source.path(),
        &[
            ("node_modules/left-pad/index.js", b"module.exports = 1"),
            (".git/HEAD", b"ref: refs/heads/main"),
            ("notes.txt", text.as_bytes()),
            ("assets/blob.bin", &blob),
        ],
    );
    let key = write_key(keys.path(), VALID_KEY);
    let remote = FakeRemote::new();
    let sink = RecordingSink::shared();

    let outcome = use_case(&remote, work.path())
        .run(&profile(source.path(), &key, "/srv/app"), sink.clone())
        .await;

    assert!(outcome.is_success(), "{}", outcome);
    assert_eq!(sink.entry_count(), Some(2));
    let delivered = remote.snapshot("/srv/app");
    let names: Vec<&str> = delivered.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, vec!["assets/blob.bin", "notes.txt"]);
    assert_eq!(delivered[0].1, blob);
    assert_eq!(delivered[1].1, text.as_bytes());
}

#[tokio::test]
async fn missing_destination_is_created_and_reported() {
    let source = tempdir().unwrap();
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    write_site(source.path());
    let key = write_key(keys.path(), VALID_KEY);
    let remote = FakeRemote::new();
    let sink = RecordingSink::shared();

    let outcome = use_case(&remote, work.path())
        .run(&profile(source.path(), &key, "/srv/new/site"), sink.clone())
        .await;

    assert!(outcome.is_success(), "{}", outcome);
    assert!(sink.events().contains(&TransferEvent::Validated {
        destination: "/srv/new/site".to_string(),
        created: true,
    }));
    assert_eq!(remote.snapshot("/srv/new/site").len(), 3);
}

#[tokio::test]
async fn home_relative_destination_lands_under_remote_home() {
    let source = tempdir().unwrap();
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    write_site(source.path());
    let key = write_key(keys.path(), VALID_KEY);
    let remote = FakeRemote::new();

    let outcome = use_case(&remote, work.path())
        .execute(&profile(source.path(), &key, "~/www"))
        .await;

    assert!(outcome.is_success(), "{}", outcome);
    let expected = format!("{}/www", REMOTE_HOME);
    assert_eq!(remote.snapshot(&expected).len(), 3);
    assert_eq!(
        remote.log().uploads,
        vec![format!("{}/.dcr-upload.zip", expected)]
    );
}

#[tokio::test]
async fn progress_is_monotonic_and_ends_at_archive_size() {
    let source = tempdir().unwrap();
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    let blob: Vec<u8> = (0..300 * 1024).map(|i| (i * 7 % 256) as u8).collect();
    write_tree(source.path(), &[("data.bin", &blob)]);
    let key = write_key(keys.path(), VALID_KEY);
    let remote = FakeRemote::new();
    let sink = RecordingSink::shared();

    let outcome = use_case(&remote, work.path())
        .run(&profile(source.path(), &key, "/srv/app"), sink.clone())
        .await;
    let bytes = outcome.into_result().unwrap();

    let samples = sink.progress();
    assert!(samples.len() > 1, "expected several chunks");
    assert!(samples
        .windows(2)
        .all(|w| w[0].bytes_transferred <= w[1].bytes_transferred));
    let last = samples.last().unwrap();
    assert_eq!(last.bytes_transferred, last.bytes_total);
    assert_eq!(Some(last.bytes_total), sink.packaged_size());
    assert_eq!(bytes, last.bytes_total);
}

#[tokio::test]
async fn stages_run_in_order_and_temporaries_are_gone() {
    let source = tempdir().unwrap();
    let keys = tempdir().unwrap();
    let work = tempdir().unwrap();
    write_site(source.path());
    let key = write_key(keys.path(), VALID_KEY);
    let remote = FakeRemote::new();
    let sink = RecordingSink::shared();

    let outcome = use_case(&remote, work.path())
        .run(&profile(source.path(), &key, "/srv/app"), sink.clone())
        .await;

    assert!(outcome.is_success(), "{}", outcome);
    assert_eq!(sink.stages(), Stage::ALL.to_vec());
    assert!(dir_is_empty(work.path()), "local archive left behind");
    assert!(!remote.path("/srv/app/.dcr-upload.zip").exists());
    let log = remote.log();
    assert_eq!(log.sessions_opened, 1);
    assert_eq!(log.sessions_closed, 1);
}
