//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{AppError, PipelineError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &AppError) -> String {
    match e {
        AppError::Pipeline(PipelineError::Storage { index, source }) => {
            format!("error: storage failed at item {}: {}", index, source)
        }
        other => format!("error: {}", other),
    }
}
