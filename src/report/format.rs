//! Terminal output for the `natives` commands.
//!
//! Formatting lives here so the pipelines stay free of presentation.

use std::path::Path;

use crate::app::pipeline::{CompatOutcome, CompileOutput};
use crate::domain::{TypeClass, TypeVocabulary, Vector3};
use crate::io::ingest::DocumentError;

/// Summary of a compile run: per-namespace counts, annotations, failures.
pub fn format_compile_summary(output: &CompileOutput, out_path: Option<&Path>) -> String {
    let mut out = String::new();

    out.push_str("=== natives - compile ===\n");
    out.push_str(&format!(
        "Documents: compiled={} failed={} skipped={} duplicates={}\n",
        output.documents.len(),
        output.errors.len(),
        output.skipped,
        output.duplicates,
    ));

    let annotated: usize = output
        .documents
        .iter()
        .map(|doc| doc.native.annotations().len())
        .sum();
    out.push_str(&format!("Natives: {} | annotated symbols: {annotated}\n", output.database.len()));

    if !output.database.is_empty() {
        out.push('\n');
        out.push_str(&format!("{:<24} {:>8}\n", "namespace", "natives"));
        out.push_str(&format!("{:-<24} {:-<8}\n", "", ""));
        for (ns, count) in output.database.namespaces() {
            out.push_str(&format!("{:<24} {:>8}\n", truncate(ns, 24), count));
        }
    }

    if !output.errors.is_empty() {
        out.push('\n');
        out.push_str(&format_errors(&output.errors));
    }

    match out_path {
        Some(path) => out.push_str(&format!("\nWrote {}\n", path.display())),
        None => out.push_str("\nNothing written.\n"),
    }

    out
}

/// One line per failed document.
pub fn format_errors(errors: &[DocumentError]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Failed documents ({}):\n", errors.len()));
    for err in errors {
        out.push_str(&format!("- {}: {}\n", err.path.display(), err.message));
    }
    out
}

/// The declaration vocabulary and the `Vector3` byte layout.
pub fn format_schema(vocab: &TypeVocabulary) -> String {
    let mut out = String::new();

    out.push_str(&format!("{:<16} {:<16} {:>5}\n", "type", "class", "size"));
    out.push_str(&format!("{:-<16} {:-<16} {:-<5}\n", "", "", ""));
    for entry in vocab.iter() {
        let size = entry.size.map_or_else(|| "-".to_string(), |s| s.to_string());
        out.push_str(&format!("{:<16} {:<16} {:>5}\n", entry.name, class_label(entry.class), size));
    }

    out.push_str(&format!("\nVector3 ({} bytes, {} argument slots):\n", Vector3::SIZE, Vector3::SLOTS));
    out.push_str(&format!("{:<12} {:>6} {:>5}\n", "field", "offset", "size"));
    out.push_str(&format!("{:-<12} {:-<6} {:-<5}\n", "", "", ""));
    for (field, offset, size) in Vector3::LAYOUT {
        out.push_str(&format!("{field:<12} {offset:>6} {size:>5}\n"));
    }

    out
}

fn class_label(class: TypeClass) -> &'static str {
    match class {
        TypeClass::Builtin => "builtin",
        TypeClass::Alias => "alias",
        TypeClass::Handle(kind) if kind.is_dword_based() => "handle (dword)",
        TypeClass::Handle(_) => "handle",
        TypeClass::Vector3 => "vector",
    }
}

/// Result of a compatibility table regeneration.
pub fn format_compat_summary(outcome: &CompatOutcome) -> String {
    let mut out = String::new();
    out.push_str(&format!("Loaded {} previous native signatures.\n", outcome.previous_natives));
    out.push_str(&format!("Version: {}\n", outcome.version));
    match &outcome.written {
        Some(path) => out.push_str(&format!(
            "{} change(s) found, compatibility file generated at '{}'\n",
            outcome.changes,
            path.display()
        )),
        None => out.push_str(&format!(
            "{} change(s) found, skipped compatibility file generation.\n",
            outcome.changes
        )),
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}
