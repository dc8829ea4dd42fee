//! Local generator output length and pool membership

use proptest::prelude::*;
use textmint::generator::{LocalGenerator, LocalPool, DEFAULT_WORD_POOL};

proptest! {
    #[test]
    fn test_words_pool_exact_length(seed in any::<u64>(), len in 1usize..2048) {
        let generator = LocalGenerator::seeded(LocalPool::words(), seed);
        let text = generator.generate_text(len);
        prop_assert_eq!(text.chars().count(), len);
    }

    #[test]
    fn test_words_pool_only_known_words(seed in any::<u64>(), len in 1usize..512) {
        let generator = LocalGenerator::seeded(LocalPool::words(), seed);
        let text = generator.generate_text(len);
        let words: Vec<&str> = text.split(' ').collect();
        // Every word but the last is whole; the last may be cut short.
        let (last, whole) = words.split_last().unwrap();
        for word in whole {
            prop_assert!(DEFAULT_WORD_POOL.contains(word), "unexpected word {:?}", word);
        }
        prop_assert!(last.is_empty() || DEFAULT_WORD_POOL.iter().any(|w| w.starts_with(last)));
    }

    #[test]
    fn test_alphabet_pool_membership(
        seed in any::<u64>(),
        len in 1usize..1024,
        alphabet in "[a-zé✓]{1,8}",
    ) {
        let generator = LocalGenerator::seeded(LocalPool::alphabet(&alphabet), seed);
        let text = generator.generate_text(len);
        prop_assert_eq!(text.chars().count(), len);
        prop_assert!(text.chars().all(|c| alphabet.contains(c)));
    }

    #[test]
    fn test_same_seed_same_text(seed in any::<u64>(), len in 1usize..256) {
        let a = LocalGenerator::seeded(LocalPool::words(), seed).generate_text(len);
        let b = LocalGenerator::seeded(LocalPool::words(), seed).generate_text(len);
        prop_assert_eq!(a, b);
    }
}
