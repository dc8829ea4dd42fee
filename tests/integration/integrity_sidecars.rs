//! Sidecar digests written by the verifier and checked later

use std::fs;
use tempfile::TempDir;
use textmint::error::VerificationError;
use textmint::integrity::{sidecar_path, IntegrityVerifier, DEFAULT_CHUNK_SIZE};
use textmint::store::OutputStore;
use textmint::types::{GeneratedItem, GenerationSource};

fn stored(temp: &TempDir, index: usize, text: &str) -> textmint::types::StoredArtifact {
    let item = GeneratedItem {
        index,
        text: text.to_string(),
        source: GenerationSource::Local,
    };
    OutputStore::default().store(&item, temp.path()).unwrap()
}

#[test]
fn test_verify_then_check_roundtrip() {
    let temp = TempDir::new().unwrap();
    let artifact = stored(&temp, 0, "héllo wörld");
    let verifier = IntegrityVerifier::default();

    let written = verifier.verify(&artifact).unwrap();
    let checked = verifier.check(&artifact.path).unwrap();

    assert_eq!(written.digest, checked.digest);
    assert_eq!(written.digest_path, sidecar_path(&artifact.path));
    assert_eq!(
        fs::read_to_string(&written.digest_path).unwrap(),
        format!("{}\n", written.digest)
    );
}

#[test]
fn test_digest_independent_of_chunk_size() {
    let temp = TempDir::new().unwrap();
    let text = "0123456789".repeat(30_000);
    let artifact = stored(&temp, 0, &text);

    let small = IntegrityVerifier::new(7).unwrap().digest_file(&artifact.path).unwrap();
    let large = IntegrityVerifier::new(DEFAULT_CHUNK_SIZE)
        .unwrap()
        .digest_file(&artifact.path)
        .unwrap();
    let whole = IntegrityVerifier::new(text.len() * 2)
        .unwrap()
        .digest_file(&artifact.path)
        .unwrap();

    assert_eq!(small, large);
    assert_eq!(large, whole);
}

#[test]
fn test_check_detects_tampering() {
    let temp = TempDir::new().unwrap();
    let artifact = stored(&temp, 3, "original");
    let verifier = IntegrityVerifier::default();
    verifier.verify(&artifact).unwrap();

    fs::write(&artifact.path, "tampered").unwrap();

    assert!(matches!(
        verifier.check(&artifact.path),
        Err(VerificationError::Mismatch { .. })
    ));
}

#[test]
fn test_check_without_sidecar() {
    let temp = TempDir::new().unwrap();
    let artifact = stored(&temp, 0, "no digest yet");
    assert!(matches!(
        IntegrityVerifier::default().check(&artifact.path),
        Err(VerificationError::SidecarRead { .. })
    ));
}

#[test]
fn test_verify_missing_artifact() {
    let temp = TempDir::new().unwrap();
    let artifact = stored(&temp, 0, "soon gone");
    fs::remove_file(&artifact.path).unwrap();
    assert!(IntegrityVerifier::default().verify(&artifact).is_err());
    assert!(!sidecar_path(&artifact.path).exists());
}

#[test]
fn test_zero_chunk_size_rejected() {
    assert!(matches!(
        IntegrityVerifier::new(0),
        Err(VerificationError::InvalidChunkSize(0))
    ));
}
