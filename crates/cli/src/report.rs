//! Human-readable and JSON rendering of validated references.

use std::fmt::Write;

use refguard_core::{IntegrityStatus, Reference};
use refguard_engine::ValidationPass;

/// One line per reference:
/// `Reference[1]: 2 -> 1 | Status: Unresolved | Candidates: 3 4`
pub fn render_reference(reference: &Reference) -> String {
    let status = reference
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Pending".to_string());
    let mut line = format!(
        "Reference[{}]: {} -> {} | Status: {}",
        reference.id, reference.source_id, reference.target_id, status
    );
    if !reference.candidate_ids.is_empty() {
        line.push_str(" | Candidates:");
        for id in &reference.candidate_ids {
            let _ = write!(line, " {}", id);
        }
    }
    line
}

pub fn render_references(references: &[Reference]) -> String {
    references
        .iter()
        .map(render_reference)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-status totals, then the ids left unprocessed by a cancelled pass.
pub fn render_summary(pass: &ValidationPass) -> String {
    let counts: Vec<String> = IntegrityStatus::ALL
        .iter()
        .filter(|s| pass.count(**s) > 0)
        .map(|s| format!("{}={}", s, pass.count(*s)))
        .collect();
    let mut summary = format!(
        "Validated {} of {} references in {:?}",
        pass.validated(),
        pass.references.len(),
        pass.duration
    );
    if !counts.is_empty() {
        let _ = write!(summary, " [{}]", counts.join(", "));
    }
    if !pass.is_complete() {
        let ids: Vec<String> = pass.unprocessed().iter().map(|id| id.to_string()).collect();
        let _ = write!(summary, "\nIncomplete pass, unprocessed: {}", ids.join(" "));
    }
    summary
}

pub fn render_text(pass: &ValidationPass) -> String {
    let body = render_references(&pass.references);
    if body.is_empty() {
        render_summary(pass)
    } else {
        format!("{}\n{}", body, render_summary(pass))
    }
}

pub fn render_json(pass: &ValidationPass) -> serde_json::Result<String> {
    serde_json::to_string_pretty(pass)
}
