//! Directory scanning: per-file extraction over a whole project tree.
//!
//! Walks a directory in sorted order, extracts a summary for every file
//! with a recognized source extension, and unions the per-file tags into
//! one aggregate set. Dependency and build directories are skipped, as
//! is everything hidden.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use promptcraft_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use walkdir::{DirEntry, WalkDir};

use crate::extract::extract_file;
use crate::profile::known_extension;
use crate::types::ContextSummary;

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "build",
    "dist",
    "vendor",
    "venv",
    "__pycache__",
];

/// Upper bound on summarized files per scan; past it the scan stops and
/// the aggregate tags record the cut.
pub const MAX_SCAN_FILES: usize = 200;

/// One scanned file: its path relative to the scan root plus the
/// extracted summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub summary: ContextSummary,
}

/// Result of a directory scan: summaries in walk order and the union of
/// every file's tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryScan {
    pub files: Vec<FileSummary>,
    pub tags: BTreeSet<String>,
}

fn is_visible_source_dir(entry: &DirEntry) -> bool {
    // The scan root itself always passes, whatever it is named.
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return false;
    }
    !(entry.file_type().is_dir() && SKIP_DIRS.contains(&name.as_ref()))
}

/// Scan a directory tree and summarize every recognized source file.
///
/// File order is the sorted walk order, so repeated scans of an
/// unchanged tree produce identical output. Files that disappear or
/// fail to read mid-walk are skipped, matching the extraction engine's
/// best-effort contract.
pub fn scan_directory(dir: &Path) -> AppResult<DirectoryScan> {
    if !dir.is_dir() {
        return Err(AppError::InputNotFound(dir.display().to_string()));
    }

    let mut files = Vec::new();
    let mut tags = BTreeSet::new();

    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(is_visible_source_dir);

    for entry in walker.flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let recognized = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(known_extension);
        if !recognized {
            continue;
        }

        if files.len() == MAX_SCAN_FILES {
            tags.insert("scan-truncated".to_string());
            break;
        }

        let summary = match extract_file(path) {
            Ok(summary) => summary,
            Err(_) => continue,
        };

        tags.extend(summary.tags.iter().cloned());
        files.push(FileSummary {
            path: path.strip_prefix(dir).unwrap_or(path).to_path_buf(),
            summary,
        });
    }

    tracing::debug!(
        dir = %dir.display(),
        files = files.len(),
        tags = tags.len(),
        "scanned directory"
    );

    Ok(DirectoryScan { files, tags })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_orders_files_and_aggregates_tags() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("alpha.py"),
            "import os\n\nasync def fetch():\n    pass\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("beta.rs"),
            "fn main() {}\n\n#[cfg(test)]\nmod tests {}\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "no source here\n").unwrap();

        let scan = scan_directory(dir.path()).unwrap();

        let paths: Vec<&Path> = scan.files.iter().map(|f| f.path.as_path()).collect();
        assert_eq!(paths, vec![Path::new("alpha.py"), Path::new("beta.rs")]);
        assert_eq!(scan.files[0].summary.language, "python");

        // Union of the per-file tags.
        assert!(scan.tags.contains("async-usage"));
        assert!(scan.tags.contains("main-entry"));
        assert!(scan.tags.contains("test-code"));
    }

    #[test]
    fn test_scan_skips_dependency_and_hidden_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        std::fs::write(
            dir.path().join("node_modules/pkg/index.js"),
            "function hidden() {}\n",
        )
        .unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join(".git/hook.py"), "def h():\n    pass\n").unwrap();
        std::fs::write(dir.path().join("app.js"), "function visible() {}\n").unwrap();

        let scan = scan_directory(dir.path()).unwrap();

        assert_eq!(scan.files.len(), 1);
        assert_eq!(scan.files[0].path, Path::new("app.js"));
    }

    #[test]
    fn test_scan_missing_directory() {
        let err = scan_directory(Path::new("/nonexistent/nowhere")).unwrap_err();
        assert!(matches!(err, AppError::InputNotFound(_)));
    }

    #[test]
    fn test_scan_is_deterministic() {
        let dir = tempfile::TempDir::new().unwrap();
        for name in ["c.py", "a.py", "b.py"] {
            std::fs::write(dir.path().join(name), "import os\n").unwrap();
        }

        let first = scan_directory(dir.path()).unwrap();
        let second = scan_directory(dir.path()).unwrap();
        assert_eq!(first, second);
        let paths: Vec<&Path> = first.files.iter().map(|f| f.path.as_path()).collect();
        assert_eq!(
            paths,
            vec![Path::new("a.py"), Path::new("b.py"), Path::new("c.py")]
        );
    }
}
