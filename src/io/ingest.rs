//! Native document discovery and loading.
//!
//! A docs tree holds one Markdown file per native, grouped in namespace
//! directories. Anything that is not a native document (dot files, README,
//! non-Markdown files) is skipped, not rejected.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::AppError;

/// A document read from disk.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub text: String,
    pub modified: Option<DateTime<Utc>>,
}

/// A document that failed to load or compile.
#[derive(Debug, Clone)]
pub struct DocumentError {
    pub path: PathBuf,
    pub message: String,
}

/// Listing of a docs tree.
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    pub documents: Vec<PathBuf>,
    /// Files seen but not treated as native documents.
    pub skipped: usize,
}

/// Whether a file name denotes a native document.
pub fn is_native_document(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with('.') || name.eq_ignore_ascii_case("README.md") {
        return false;
    }
    path.extension().and_then(|e| e.to_str()) == Some("md")
}

/// Recursively list native documents under `root`, sorted by path.
pub fn discover_documents(root: &Path) -> Result<DocumentSet, AppError> {
    let mut set = DocumentSet::default();
    walk(root, &mut set)?;
    set.documents.sort();
    Ok(set)
}

fn walk(dir: &Path, set: &mut DocumentSet) -> Result<(), AppError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::new(2, format!("Failed to read directory '{}': {e}", dir.display())))?;

    for entry in entries {
        let entry = entry
            .map_err(|e| AppError::new(2, format!("Failed to read directory '{}': {e}", dir.display())))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| AppError::new(2, format!("Failed to stat '{}': {e}", path.display())))?;

        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));

        if file_type.is_dir() {
            if hidden {
                tracing::debug!(path = %path.display(), "skipping hidden directory");
            } else {
                walk(&path, set)?;
            }
        } else if is_native_document(&path) {
            set.documents.push(path);
        } else {
            set.skipped += 1;
        }
    }

    Ok(())
}

/// Read a document and its modification time.
pub fn read_document(path: &Path) -> Result<SourceDocument, DocumentError> {
    let text = fs::read_to_string(path).map_err(|e| DocumentError {
        path: path.to_path_buf(),
        message: format!("Failed to read: {e}"),
    })?;
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from);
    Ok(SourceDocument { path: path.to_path_buf(), text, modified })
}

/// Namespace implied by the directory a document lives in (`docs/PLAYER/x.md` → `PLAYER`).
pub fn namespace_from_path(path: &Path) -> Option<String> {
    path.parent()
        .and_then(Path::file_name)
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_ascii_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_document_filter() {
        assert!(is_native_document(Path::new("PLAYER/GetPlayerPed.md")));
        assert!(!is_native_document(Path::new("PLAYER/README.md")));
        assert!(!is_native_document(Path::new("PLAYER/.hidden.md")));
        assert!(!is_native_document(Path::new("PLAYER/notes.txt")));
        assert!(!is_native_document(Path::new("PLAYER/Makefile")));
    }

    #[test]
    fn discovery_walks_namespaces() {
        let dir = tempfile::tempdir().unwrap();
        let player = dir.path().join("PLAYER");
        let hidden = dir.path().join(".git");
        fs::create_dir_all(&player).unwrap();
        fs::create_dir_all(&hidden).unwrap();
        fs::write(player.join("B.md"), "").unwrap();
        fs::write(player.join("A.md"), "").unwrap();
        fs::write(player.join("README.md"), "").unwrap();
        fs::write(hidden.join("C.md"), "").unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();

        let set = discover_documents(dir.path()).unwrap();
        assert_eq!(set.documents, vec![player.join("A.md"), player.join("B.md")]);
        assert_eq!(set.skipped, 2);
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let err = discover_documents(Path::new("/definitely/not/here")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn namespace_comes_from_parent_directory() {
        assert_eq!(namespace_from_path(Path::new("docs/player/A.md")).as_deref(), Some("PLAYER"));
        assert_eq!(namespace_from_path(Path::new("A.md")), None);
    }

    #[test]
    fn read_document_reports_path() {
        let err = read_document(Path::new("/definitely/not/here.md")).unwrap_err();
        assert_eq!(err.path, PathBuf::from("/definitely/not/here.md"));
        assert!(err.message.starts_with("Failed to read"));
    }
}
