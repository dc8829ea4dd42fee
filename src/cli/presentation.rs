//! Presentation: run summaries and verification results for the terminal.

use crate::error::{AppError, VerificationError};
use crate::pipeline::{IntegrityStatus, PipelineReport};
use crate::types::IntegrityRecord;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;
use std::path::PathBuf;

const PREVIEW_WIDTH: usize = 99;
const PREVIEW_PLACEHOLDER: &str = " ...";

/// Collapse whitespace and shorten `text` to at most `width` characters on a
/// word boundary, marking the cut with " ...".
pub fn preview(text: &str, width: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= width {
        return collapsed;
    }

    let budget = width.saturating_sub(PREVIEW_PLACEHOLDER.chars().count());
    let mut out = String::new();
    let mut used = 0;
    for word in collapsed.split(' ') {
        let len = word.chars().count();
        let needed = if out.is_empty() { len } else { used + 1 + len };
        if needed > budget {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        used = needed;
    }

    if out.is_empty() {
        PREVIEW_PLACEHOLDER.trim_start().to_string()
    } else {
        out.push_str(PREVIEW_PLACEHOLDER);
        out
    }
}

fn integrity_cell(status: &IntegrityStatus) -> String {
    match status {
        IntegrityStatus::Disabled => "-".to_string(),
        IntegrityStatus::Recorded { record } => record.digest.clone(),
        IntegrityStatus::Failed { error } => format!("FAILED: {}", error),
    }
}

pub fn format_report_text(report: &PipelineReport) -> String {
    if report.outcomes.is_empty() && report.is_success() {
        return "No items requested.".to_string();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Source", "Path", "Bytes", "SHA-256"]);
    for outcome in &report.outcomes {
        table.add_row(vec![
            outcome.index.to_string(),
            outcome.source.to_string(),
            outcome.artifact.path.display().to_string(),
            outcome.artifact.bytes_written.to_string(),
            integrity_cell(&outcome.integrity),
        ]);
    }

    let mut s = table.to_string();
    for outcome in &report.outcomes {
        s.push_str(&format!(
            "\n[{}] {}",
            outcome.index,
            preview(&outcome.text, PREVIEW_WIDTH)
        ));
    }

    let existing: Vec<String> = report
        .artifacts()
        .filter(|a| a.replaced)
        .map(|a| a.index.to_string())
        .collect();
    if !existing.is_empty() {
        s.push_str(&format!(
            "\nExisting files written over: [{}]",
            existing.join(", ")
        ));
    }

    match &report.failure {
        None => s.push_str(&format!("\n\n{} item(s) completed.", report.outcomes.len())),
        Some(err) => {
            let ok: Vec<String> = report
                .succeeded_indices()
                .iter()
                .map(|i| i.to_string())
                .collect();
            s.push_str(&format!(
                "\n\nRun aborted at item {}: {}\nSucceeded: [{}]",
                err.index(),
                err,
                ok.join(", ")
            ));
        }
    }
    s
}

pub fn format_report_json(report: &PipelineReport) -> Result<String, AppError> {
    let out = json!({
        "success": report.is_success(),
        "items": report.outcomes,
        "succeeded": report.succeeded_indices(),
        "failure": report.failure.as_ref().map(|e| json!({
            "index": e.index(),
            "message": e.to_string(),
        })),
    });
    serde_json::to_string_pretty(&out)
        .map_err(|e| AppError::Runtime(format!("Failed to render JSON: {}", e)))
}

pub fn format_verify_results(
    results: &[(PathBuf, Result<IntegrityRecord, VerificationError>)],
) -> String {
    results
        .iter()
        .map(|(path, result)| match result {
            Ok(record) => format!("OK      {}  {}", path.display(), record.digest),
            Err(e) => format!("FAILED  {}  {}", path.display(), e),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
