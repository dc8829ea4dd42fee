//! Integration tests for the textmint generate/store/verify pipeline

mod config_loading;
mod fallback_pipeline;
mod integrity_sidecars;
mod test_utils;
