//! End-to-end pipeline runs with remote and local generators

use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use textmint::error::{GenerationError, PipelineError, StorageError};
use textmint::generator::{GenerationParams, LocalGenerator, LocalPool};
use textmint::integrity::{sidecar_path, sha256_hex, IntegrityVerifier};
use textmint::ledger::{Ledger, TimeMode};
use textmint::pipeline::{IntegrityStatus, Pipeline};
use textmint::store::{CollisionPolicy, OutputStore};
use textmint::types::{GenerationRequest, GenerationSource};

use crate::integration::test_utils::{facade, seeded_local, BrokenLocal, FixedRemote, OfflineRemote};

fn request(count: usize, char_length: usize, dir: &std::path::Path) -> GenerationRequest {
    GenerationRequest::new(count, char_length, "gpt-4o-mini", 0.9, dir.to_path_buf()).unwrap()
}

#[tokio::test]
async fn test_offline_remote_every_item_local_and_verified() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("out");
    let remote = Arc::new(OfflineRemote::new());
    let pipeline = Pipeline::new(
        facade(remote.clone(), seeded_local(7)),
        OutputStore::default(),
        Some(IntegrityVerifier::default()),
    );

    let report = pipeline.run(&request(3, 40, &out)).await;

    assert!(report.is_success());
    assert_eq!(remote.calls(), 3, "remote is tried once per item");
    assert_eq!(report.count_by_source(GenerationSource::Local), 3);
    for (i, outcome) in report.outcomes.iter().enumerate() {
        assert_eq!(outcome.index, i);
        let path = out.join(format!("output_{}.txt", i));
        assert_eq!(outcome.artifact.path, path);
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.chars().count(), 40);

        let record = outcome.integrity_record().unwrap();
        assert_eq!(record.digest, sha256_hex(content.as_bytes()));
        let sidecar = fs::read_to_string(sidecar_path(&path)).unwrap();
        assert_eq!(sidecar.trim_end(), record.digest);
    }
}

#[tokio::test]
async fn test_remote_available_items_tagged_remote() {
    let temp = TempDir::new().unwrap();
    let remote = Arc::new(FixedRemote("the quick brown fox jumps".to_string()));
    let pipeline = Pipeline::new(
        facade(remote, seeded_local(1)),
        OutputStore::default(),
        None,
    );

    let report = pipeline.run(&request(2, 9, temp.path())).await;

    assert!(report.is_success());
    assert_eq!(report.count_by_source(GenerationSource::Remote), 2);
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.integrity == IntegrityStatus::Disabled));
    assert_eq!(
        fs::read_to_string(temp.path().join("output_1.txt")).unwrap(),
        "the quick"
    );
    assert!(!sidecar_path(&temp.path().join("output_0.txt")).exists());
}

#[tokio::test]
async fn test_single_character_items() {
    let temp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(
        facade(Arc::new(OfflineRemote::new()), seeded_local(3)),
        OutputStore::default(),
        Some(IntegrityVerifier::default()),
    );

    let report = pipeline.run(&request(1, 1, temp.path())).await;

    assert!(report.is_success());
    let content = fs::read_to_string(temp.path().join("output_0.txt")).unwrap();
    assert_eq!(content.chars().count(), 1);
}

#[tokio::test]
async fn test_zero_count_touches_nothing() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("never");
    let remote = Arc::new(OfflineRemote::new());
    let pipeline = Pipeline::new(
        facade(remote.clone(), seeded_local(3)),
        OutputStore::default(),
        Some(IntegrityVerifier::default()),
    );

    let report = pipeline.run(&request(0, 10, &out)).await;

    assert!(report.is_success());
    assert!(report.outcomes.is_empty());
    assert_eq!(remote.calls(), 0);
    assert!(!out.exists());
}

#[tokio::test]
async fn test_unwritable_output_dir_fails_at_first_index() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "a file, not a directory").unwrap();
    let pipeline = Pipeline::new(
        facade(Arc::new(OfflineRemote::new()), seeded_local(3)),
        OutputStore::default(),
        Some(IntegrityVerifier::default()),
    );

    let report = pipeline.run(&request(3, 10, &blocker.join("out"))).await;

    assert!(report.outcomes.is_empty());
    match report.failure {
        Some(PipelineError::Storage {
            index: 0,
            source: StorageError::DirectoryUnavailable { .. },
        }) => {}
        other => panic!("expected storage failure at index 0, got {:?}", other),
    }
}

#[tokio::test]
async fn test_collision_keeps_earlier_items() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("output_1.txt"), "pre-existing").unwrap();
    let pipeline = Pipeline::new(
        facade(Arc::new(OfflineRemote::new()), seeded_local(5)),
        OutputStore::new("output", CollisionPolicy::Fail),
        Some(IntegrityVerifier::default()),
    );

    let report = pipeline.run(&request(3, 12, temp.path())).await;

    assert_eq!(report.succeeded_indices(), vec![0]);
    assert_eq!(report.failure.as_ref().map(|e| e.index()), Some(1));
    assert_eq!(
        fs::read_to_string(temp.path().join("output_1.txt")).unwrap(),
        "pre-existing"
    );
    assert!(!temp.path().join("output_2.txt").exists());
}

#[tokio::test]
async fn test_verification_failure_stops_run_without_digest() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(sidecar_path(&temp.path().join("output_1.txt"))).unwrap();
    let pipeline = Pipeline::new(
        facade(Arc::new(OfflineRemote::new()), seeded_local(4)),
        OutputStore::default(),
        Some(IntegrityVerifier::default()),
    );

    let report = pipeline.run(&request(3, 16, temp.path())).await;

    assert_eq!(report.outcomes.len(), 2);
    assert!(report.outcomes[0].integrity_record().is_some());
    match &report.outcomes[1].integrity {
        IntegrityStatus::Failed { error } => assert!(error.contains("sidecar")),
        other => panic!("expected failed integrity, got {:?}", other),
    }
    match report.failure {
        Some(PipelineError::Verification {
            index: 1,
            ref artifact,
            ..
        }) => assert_eq!(artifact, &temp.path().join("output_1.txt")),
        ref other => panic!("expected verification failure at index 1, got {:?}", other),
    }
    assert!(temp.path().join("output_1.txt").exists());
    assert!(!temp.path().join("output_2.txt").exists());
}

#[tokio::test]
async fn test_rerun_flags_overwritten_artifacts() {
    let temp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(
        facade(Arc::new(OfflineRemote::new()), seeded_local(8)),
        OutputStore::default(),
        None,
    );

    let first = pipeline.run(&request(2, 10, temp.path())).await;
    assert!(first.artifacts().all(|a| !a.replaced));

    let second = pipeline.run(&request(3, 10, temp.path())).await;
    let replaced: Vec<bool> = second.artifacts().map(|a| a.replaced).collect();
    assert_eq!(replaced, vec![true, true, false]);
}

#[tokio::test]
async fn test_broken_fallback_reports_index() {
    let temp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(
        facade(Arc::new(OfflineRemote::new()), Arc::new(BrokenLocal)),
        OutputStore::default(),
        None,
    );

    let report = pipeline.run(&request(2, 12, temp.path())).await;

    match report.failure {
        Some(PipelineError::FallbackUnavailable {
            index: 0,
            source: GenerationError::FallbackUnavailable { ref reason, .. },
        }) => assert_eq!(reason, "pool exhausted"),
        ref other => panic!("expected fallback failure at index 0, got {:?}", other),
    }
    assert!(report.outcomes.is_empty());
}

#[tokio::test]
async fn test_custom_fallback_slot() {
    let alphabet: Arc<dyn textmint::generator::TextGenerator> =
        Arc::new(LocalGenerator::seeded(LocalPool::alphabet("ab"), 2));
    let facade = facade(Arc::new(OfflineRemote::new()), seeded_local(1)).with_fallback(alphabet);

    let text = facade.generate(&GenerationParams::new(30)).await.unwrap();

    assert_eq!(text.source, GenerationSource::Local);
    assert!(text.text.chars().all(|c| c == 'a' || c == 'b'));
    assert_eq!(text.text.chars().count(), 30);
}

#[tokio::test]
async fn test_ledger_records_each_item() {
    let temp = TempDir::new().unwrap();
    let ledger_path = temp.path().join("ledger.jsonl");
    let pipeline = Pipeline::new(
        facade(Arc::new(OfflineRemote::new()), seeded_local(9)),
        OutputStore::default(),
        Some(IntegrityVerifier::default()),
    )
    .with_ledger(Ledger::new(&ledger_path, false, TimeMode::Utc));

    let report = pipeline.run(&request(2, 20, temp.path())).await;
    assert!(report.is_success());

    let records = Ledger::new(&ledger_path, false, TimeMode::Utc).records().unwrap();
    assert_eq!(records.len(), 2);
    for (record, outcome) in records.iter().zip(&report.outcomes) {
        assert_eq!(record.artifact, outcome.artifact.path);
        assert_eq!(
            record.digest.as_deref(),
            outcome.integrity_record().map(|r| r.digest.as_str())
        );
        assert_eq!(record.length, 20);
    }
}
