//! Shared pipelines behind the `compile`, `compat` and `sitemap` commands.
//!
//! discover documents -> compile in parallel -> merge into the database
//!
//! The commands differ only in what they do with the compiled documents.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;

use crate::compat::lua::{CompatFile, parse_compat_lua, render_compat_lua};
use crate::compat::version::{CompatVersion, VersionRequest, days_since, next_version};
use crate::compat::{CompatTable, Signature, parse_native_hash};
use crate::compile::{CompiledNative, compile_native};
use crate::domain::{NativeDatabase, TypeVocabulary};
use crate::error::AppError;
use crate::io::ingest::{DocumentError, discover_documents, namespace_from_path, read_document};
use crate::io::sitemap::{SitemapEntry, native_url};

/// Namespace of a document with no `ns` key outside any directory.
pub const DEFAULT_NAMESPACE: &str = "UNKNOWN";

/// One successfully compiled document.
#[derive(Debug, Clone)]
pub struct CompiledDocument {
    pub path: PathBuf,
    pub namespace: String,
    pub native: CompiledNative,
    pub modified: Option<DateTime<Utc>>,
}

/// Everything a compile run produced.
#[derive(Debug, Clone, Default)]
pub struct CompileOutput {
    pub database: NativeDatabase,
    pub documents: Vec<CompiledDocument>,
    pub errors: Vec<DocumentError>,
    /// Files seen under the root that are not native documents.
    pub skipped: usize,
    /// Documents whose hash was already taken in their namespace.
    pub duplicates: usize,
}

impl CompileOutput {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compile every native document under `root`.
///
/// Per-document failures are collected, not returned; only failing to list the
/// tree is an error here.
pub fn compile_directory(root: &Path, vocab: &TypeVocabulary) -> Result<CompileOutput, AppError> {
    let set = discover_documents(root)?;
    tracing::info!(
        root = %root.display(),
        documents = set.documents.len(),
        skipped = set.skipped,
        "compiling native documents"
    );

    let results: Vec<Result<CompiledDocument, DocumentError>> = set
        .documents
        .par_iter()
        .map(|path| compile_document(path, vocab))
        .collect();

    let mut output = CompileOutput { skipped: set.skipped, ..CompileOutput::default() };
    for result in results {
        match result {
            Ok(doc) => {
                let replaced = output
                    .database
                    .insert(doc.namespace.clone(), doc.native.definition.clone());
                if let Some(previous) = replaced {
                    output.duplicates += 1;
                    tracing::warn!(
                        namespace = %doc.namespace,
                        hash = %previous.hash,
                        path = %doc.path.display(),
                        "duplicate native hash, keeping the later document"
                    );
                }
                output.documents.push(doc);
            }
            Err(err) => {
                tracing::debug!(path = %err.path.display(), error = %err.message, "document failed");
                output.errors.push(err);
            }
        }
    }

    tracing::info!(
        natives = output.database.len(),
        failed = output.errors.len(),
        "compilation finished"
    );
    Ok(output)
}

/// Read and compile one document, filling in its namespace.
pub fn compile_document(path: &Path, vocab: &TypeVocabulary) -> Result<CompiledDocument, DocumentError> {
    let source = read_document(path)?;
    let mut native = compile_native(&source.text, vocab).map_err(|e| DocumentError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let namespace = native
        .definition
        .meta
        .ns
        .clone()
        .or_else(|| namespace_from_path(path))
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
    native.definition.meta.ns = Some(namespace.clone());

    tracing::trace!(path = %path.display(), native = native.definition.label(), "compiled");
    Ok(CompiledDocument { path: path.to_path_buf(), namespace, native, modified: source.modified })
}

/// Sitemap entries for compiled documents, in document order.
pub fn sitemap_entries(documents: &[CompiledDocument], base: &str) -> Vec<SitemapEntry> {
    documents
        .iter()
        .map(|doc| SitemapEntry {
            loc: native_url(base, &doc.native.definition.hash),
            lastmod: doc.modified,
        })
        .collect()
}

/// Inputs of a compatibility table regeneration.
#[derive(Debug, Clone)]
pub struct CompatOptions {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub force: bool,
    pub ignore_missing_input: bool,
    pub version: VersionRequest,
    pub start_date: NaiveDate,
    pub today: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct CompatOutcome {
    /// Natives read from the previous file.
    pub previous_natives: usize,
    /// Signatures added on top of the previous file.
    pub changes: usize,
    pub version: CompatVersion,
    /// Where the table was written, if it was.
    pub written: Option<PathBuf>,
    pub table: CompatTable,
}

/// Load the previous compatibility file. No input means an empty table.
pub fn load_previous_compat(input: Option<&Path>, ignore_missing: bool) -> Result<CompatFile, AppError> {
    let Some(path) = input else {
        return Ok(CompatFile::default());
    };
    if !path.exists() {
        if ignore_missing {
            tracing::warn!(path = %path.display(), "previous compatibility file not found, starting empty");
            return Ok(CompatFile::default());
        }
        return Err(AppError::new(
            3,
            format!(
                "Input file '{}' not found, stopping execution. If required use the --ignore-missing-in option to continue on another attempt.",
                path.display()
            ),
        ));
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| AppError::new(2, format!("Failed to read '{}': {e}", path.display())))?;
    Ok(parse_compat_lua(&text)?)
}

/// Add the signature of every manually hashed native; returns how many were new.
pub fn collect_signatures(table: &mut CompatTable, documents: &[CompiledDocument]) -> Result<usize, AppError> {
    let mut added = 0;
    for doc in documents.iter().filter(|d| d.native.definition.manual_hash) {
        let hash = parse_native_hash(&doc.native.definition.hash)?;
        let signature = Signature::of(&doc.native.declaration);
        if table.insert(hash, signature) {
            tracing::debug!(native = doc.native.definition.label(), hash = %doc.native.definition.hash, "new signature");
            added += 1;
        }
    }
    Ok(added)
}

/// Merge the docs' signatures into the previous table and write it if anything changed.
pub fn run_compat(documents: &[CompiledDocument], options: &CompatOptions) -> Result<CompatOutcome, AppError> {
    let previous = load_previous_compat(options.input.as_deref(), options.ignore_missing_input)?;
    let previous_natives = previous.table.len();
    tracing::info!(natives = previous_natives, signatures = previous.signatures, "loaded previous signatures");

    let days = days_since(options.start_date, options.today);
    let version = next_version(options.version, previous.version, days);

    let mut table = previous.table;
    let changes = collect_signatures(&mut table, documents)?;

    let written = match &options.output {
        Some(path) if options.force || changes > 0 => {
            std::fs::write(path, render_compat_lua(&table, version))
                .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
            Some(path.clone())
        }
        _ => None,
    };

    Ok(CompatOutcome { previous_natives, changes, version, written, table })
}
