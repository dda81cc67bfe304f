//! Behaviour of the JSON file results store.

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::records::{AssessmentOutcome, PatternOutcome};
use crate::domain::{Participant, ParticipantDraft};

struct Store {
    _tmp: tempfile::TempDir,
    dir: Utf8PathBuf,
    repo: JsonFileResultsRepository,
}

impl Store {
    fn write_raw(&self, contents: &str) {
        let dir = Dir::open_ambient_dir(&self.dir, ambient_authority()).expect("open dir");
        dir.write("all_results.json", contents).expect("seed file");
    }

    fn read_raw(&self, name: &str) -> String {
        let dir = Dir::open_ambient_dir(&self.dir, ambient_authority()).expect("open dir");
        dir.read_to_string(name).expect("read file")
    }
}

#[fixture]
fn store() -> Store {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dir = Utf8PathBuf::from_path_buf(tmp.path().join("data")).expect("utf-8 temp path");
    let repo = JsonFileResultsRepository::open(dir.join("all_results.json")).expect("open store");
    Store {
        _tmp: tmp,
        dir,
        repo,
    }
}

fn record(name: &str, score: u32) -> AssessmentRecord {
    let participant = Participant::from_draft(ParticipantDraft {
        name: Some(name.to_owned()),
        ..ParticipantDraft::default()
    });
    let at = Utc
        .with_ymd_and_hms(2024, 5, 1, 10, 30, 0)
        .single()
        .expect("valid timestamp");
    AssessmentRecord::new(
        participant,
        AssessmentOutcome::Pattern(PatternOutcome {
            level: 1,
            score,
            total_problems: 5,
            times: vec![1.25, 2.0],
        }),
        at,
    )
}

#[rstest]
#[tokio::test]
async fn missing_file_lists_empty(store: Store) {
    assert!(store.repo.list().await.expect("list").is_empty());
}

#[rstest]
#[case("")]
#[case("  \n")]
#[tokio::test]
async fn blank_file_lists_empty(store: Store, #[case] contents: &str) {
    store.write_raw(contents);
    assert!(store.repo.list().await.expect("list").is_empty());
}

#[rstest]
#[tokio::test]
async fn appends_preserve_order(store: Store) {
    let first = record("Ada", 3);
    let second = record("Lin", 4);
    store.repo.append(&first).await.expect("append first");
    store.repo.append(&second).await.expect("append second");

    let listed = store.repo.list().await.expect("list");
    assert_eq!(listed, vec![first, second]);
    assert!(store.read_raw("all_results.json").contains("\n    {"));
}

#[rstest]
#[tokio::test]
async fn malformed_file_reads_empty_and_is_moved_aside(store: Store) {
    store.write_raw("{ not json");
    assert!(store.repo.list().await.expect("list").is_empty());

    let fresh = record("Ada", 2);
    store.repo.append(&fresh).await.expect("append");

    assert_eq!(store.read_raw("all_results.json.corrupt"), "{ not json");
    assert_eq!(store.repo.list().await.expect("list"), vec![fresh]);
}

#[rstest]
#[tokio::test]
async fn repeated_corruption_keeps_every_copy(store: Store) {
    store.write_raw("{ first");
    store.repo.append(&record("Ada", 1)).await.expect("append");
    store.write_raw("{ second");
    store.repo.append(&record("Lin", 2)).await.expect("append");

    assert_eq!(store.read_raw("all_results.json.corrupt"), "{ first");
    assert_eq!(store.read_raw("all_results.json.corrupt.1"), "{ second");
    assert_eq!(store.repo.list().await.expect("list").len(), 1);
}

#[rstest]
#[tokio::test]
async fn unknown_entries_are_skipped_but_kept(store: Store) {
    store.write_raw(&json!([{ "mystery": true }]).to_string());
    assert!(store.repo.list().await.expect("list").is_empty());

    store.repo.append(&record("Ada", 1)).await.expect("append");

    let raw: Vec<Value> =
        serde_json::from_str(&store.read_raw("all_results.json")).expect("valid array");
    assert_eq!(raw.len(), 2);
    assert_eq!(raw[0], json!({ "mystery": true }));
    assert_eq!(store.repo.list().await.expect("list").len(), 1);
}

#[rstest]
#[tokio::test]
async fn legacy_entries_are_listed(store: Store) {
    store.write_raw(
        &json!([{
            "user_info": { "name": "Kim", "age": "70", "gender": "F", "test_date": "2024-03-02" },
            "final_level": 2,
            "history": []
        }])
        .to_string(),
    );
    let listed = store.repo.list().await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].participant.name(), "Kim");
}

#[rstest]
#[tokio::test]
async fn concurrent_appends_are_all_kept(store: Store) {
    let repo = store.repo.clone();
    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.append(&record("Ada", i % 5)).await })
        })
        .collect();
    for task in tasks {
        task.await.expect("join").expect("append");
    }
    assert_eq!(store.repo.list().await.expect("list").len(), 8);
}

#[rstest]
fn path_without_file_name_is_rejected() {
    let result = JsonFileResultsRepository::open(Utf8Path::new("/"));
    assert!(matches!(
        result,
        Err(ResultsRepositoryError::Connection { .. })
    ));
}
