//! Integration tests for layered configuration loading

use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;
use textmint::config::{ConfigLoader, PoolKind, ProviderKind};
use textmint::ledger::TimeMode;
use textmint::store::CollisionPolicy;

// Serializes tests that touch process environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Point the global config lookup at an empty directory for the duration of `f`.
fn with_isolated_env<F: FnOnce(&TempDir)>(f: F) {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let temp = TempDir::new().unwrap();
    let original = std::env::var("XDG_CONFIG_HOME").ok();
    std::env::set_var("XDG_CONFIG_HOME", temp.path().join("xdg"));

    f(&temp);

    match original {
        Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
        None => std::env::remove_var("XDG_CONFIG_HOME"),
    }
}

#[test]
fn test_defaults_without_files() {
    with_isolated_env(|temp| {
        let config = ConfigLoader::load(temp.path()).unwrap();
        assert_eq!(config.generation.count, 1);
        assert!(config.generation.hashing_enabled);
        assert_eq!(config.provider.kind, ProviderKind::OpenAI);
        assert_eq!(config.integrity.chunk_size, 128 * 1024);
        assert!(!config.ledger.enabled);
        assert!(config.validate().is_ok());
    });
}

#[test]
fn test_workspace_file_overrides_defaults() {
    with_isolated_env(|temp| {
        fs::write(
            temp.path().join("textmint.toml"),
            r#"
[generation]
count = 4
char_length = 64
collision = "fail"

[provider]
kind = "ollama"
endpoint = "http://localhost:11434"

[local]
pool = "alphabet"
alphabet = "xyz"
seed = 42

[ledger]
enabled = true
time_mode = "utc"
"#,
        )
        .unwrap();

        let config = ConfigLoader::load(temp.path()).unwrap();
        assert_eq!(config.generation.count, 4);
        assert_eq!(config.generation.char_length, 64);
        assert_eq!(config.generation.collision, CollisionPolicy::Fail);
        assert_eq!(config.provider.kind, ProviderKind::Ollama);
        assert_eq!(config.local.pool, PoolKind::Alphabet);
        assert_eq!(config.local.seed, Some(42));
        assert!(config.ledger.enabled);
        assert_eq!(config.ledger.time_mode, TimeMode::Utc);
    });
}

#[test]
fn test_environment_overrides_workspace_file() {
    with_isolated_env(|temp| {
        fs::write(
            temp.path().join("textmint.toml"),
            "[generation]\ncount = 4\n",
        )
        .unwrap();
        std::env::set_var("TEXTMINT__GENERATION__COUNT", "9");

        let result = ConfigLoader::load(temp.path());
        std::env::remove_var("TEXTMINT__GENERATION__COUNT");

        assert_eq!(result.unwrap().generation.count, 9);
    });
}

#[test]
fn test_global_file_is_lowest_file_layer() {
    with_isolated_env(|temp| {
        let global_dir = temp.path().join("xdg").join("textmint");
        fs::create_dir_all(&global_dir).unwrap();
        fs::write(
            global_dir.join("config.toml"),
            "[generation]\ncount = 2\nchar_length = 12\n",
        )
        .unwrap();
        fs::write(temp.path().join("textmint.toml"), "[generation]\ncount = 5\n").unwrap();

        let config = ConfigLoader::load(temp.path()).unwrap();
        assert_eq!(config.generation.count, 5);
        assert_eq!(config.generation.char_length, 12);
    });
}

#[test]
fn test_load_from_missing_file_errors() {
    let temp = TempDir::new().unwrap();
    assert!(ConfigLoader::load_from_file(&temp.path().join("missing.toml")).is_err());
}

#[test]
fn test_invalid_values_fail_validation() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.toml");
    fs::write(
        &path,
        "[generation]\nchar_length = 0\ntemperature = 3.5\n\n[integrity]\nchunk_size = 0\n",
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&path).unwrap();
    let errors = config.validate().unwrap_err();
    assert!(errors.len() >= 3, "expected every problem reported: {:?}", errors);
}
