//! Streamed digests match one-shot hashing for any content and chunk size

use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;
use textmint::integrity::{sha256_hex, IntegrityVerifier};
use textmint::store::OutputStore;
use textmint::types::{GeneratedItem, GenerationSource};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_streamed_digest_matches_one_shot(
        content in proptest::collection::vec(any::<u8>(), 0..4096),
        chunk_size in 1usize..1024,
    ) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("blob.bin");
        fs::write(&path, &content).unwrap();

        let verifier = IntegrityVerifier::new(chunk_size).unwrap();
        prop_assert_eq!(verifier.digest_file(&path).unwrap(), sha256_hex(&content));
    }

    #[test]
    fn test_stored_text_verifies(text in "\\PC{1,200}", index in 0usize..50) {
        let temp = TempDir::new().unwrap();
        let item = GeneratedItem { index, text: text.clone(), source: GenerationSource::Remote };
        let artifact = OutputStore::default().store(&item, temp.path()).unwrap();
        prop_assert_eq!(artifact.bytes_written, text.len() as u64);

        let verifier = IntegrityVerifier::default();
        let record = verifier.verify(&artifact).unwrap();
        prop_assert_eq!(&record.digest, &sha256_hex(text.as_bytes()));
        prop_assert_eq!(verifier.check(&artifact.path).unwrap().digest, record.digest);
    }
}
