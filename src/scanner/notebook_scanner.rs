use crate::config::DiscoveryConfig;
use crate::error::{NbBatchError, Result};
use crate::scanner::notebook_filter::NotebookFilter;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotebookFile {
    pub path: PathBuf,
    pub filename: String,
    pub size: u64,
}

impl NotebookFile {
    pub fn new(path: PathBuf, size: u64) -> Self {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        Self {
            path,
            filename,
            size,
        }
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

pub struct NotebookScanner {
    filter: NotebookFilter,
}

/// Everything a scan produced: the notebooks, plus entries that could not be read.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub notebooks: Vec<NotebookFile>,
    pub skipped: Vec<String>,
}

impl NotebookScanner {
    pub fn new(config: &DiscoveryConfig) -> Self {
        Self {
            filter: NotebookFilter::new(config),
        }
    }

    /// Lists the notebooks directly inside `root`, sorted by path.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<ScanResult> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(NbBatchError::DirectoryNotFound {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(NbBatchError::NotADirectory {
                path: root_path.display().to_string(),
            });
        }

        let mut result = ScanResult::default();

        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // The root itself failing to open means nothing can be listed.
                    if err.depth() == 0 {
                        return Err(map_root_error(root_path, err));
                    }
                    tracing::warn!("Skipping unreadable entry: {}", err);
                    result.skipped.push(format!("Scan error: {}", err));
                    continue;
                }
            };

            if let Some(notebook) = self.process_entry(&entry, &mut result.skipped) {
                result.notebooks.push(notebook);
            }
        }

        result.notebooks.sort_by(|a, b| a.path.cmp(&b.path));

        tracing::debug!(
            "Discovered {} notebook(s) in {}",
            result.notebooks.len(),
            root_path.display()
        );

        Ok(result)
    }

    fn process_entry(&self, entry: &DirEntry, skipped: &mut Vec<String>) -> Option<NotebookFile> {
        let path = entry.path();

        if !self.filter.is_notebook(path) {
            return None;
        }

        // Symlinks to files still count, the way a glob would list them.
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) => {
                skipped.push(format!("Error reading {}: {}", path.display(), err));
                return None;
            }
        };

        if !metadata.is_file() {
            return None;
        }

        Some(NotebookFile::new(path.to_path_buf(), metadata.len()))
    }
}

fn map_root_error(root: &Path, err: walkdir::Error) -> NbBatchError {
    let path = root.display().to_string();
    match err.io_error().map(|e| e.kind()) {
        Some(std::io::ErrorKind::PermissionDenied) => NbBatchError::Permission { path },
        Some(std::io::ErrorKind::NotFound) => NbBatchError::DirectoryNotFound { path },
        _ => match err.into_io_error() {
            Some(io) => NbBatchError::Io(io),
            None => NbBatchError::InvalidPath { path },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scanner() -> NotebookScanner {
        NotebookScanner::new(&DiscoveryConfig::default())
    }

    #[test]
    fn test_notebook_file_creation() {
        let notebook = NotebookFile::new(PathBuf::from("chapters/intro.ipynb"), 42);
        assert_eq!(notebook.filename, "intro.ipynb");
        assert_eq!(notebook.size, 42);
        assert_eq!(notebook.display_path(), "chapters/intro.ipynb");
    }

    #[test]
    fn test_scan_finds_notebooks_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("summary.ipynb"), "{}").unwrap();
        fs::write(root.join("intro.ipynb"), "{}").unwrap();
        fs::write(root.join("intro.html"), "<html></html>").unwrap();
        fs::write(root.join(".hidden.ipynb"), "{}").unwrap();

        let result = scanner().scan_directory(root).unwrap();
        let names: Vec<_> = result.notebooks.iter().map(|n| n.filename.as_str()).collect();

        assert_eq!(names, vec!["intro.ipynb", "summary.ipynb"]);
        assert_eq!(result.notebooks[0].path, root.join("intro.ipynb"));
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_scan_is_not_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let checkpoints = root.join(".ipynb_checkpoints");
        fs::create_dir(&checkpoints).unwrap();
        fs::write(checkpoints.join("intro-checkpoint.ipynb"), "{}").unwrap();

        let nested = root.join("part1");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("deep.ipynb"), "{}").unwrap();

        fs::write(root.join("top.ipynb"), "{}").unwrap();

        let result = scanner().scan_directory(root).unwrap();
        assert_eq!(result.notebooks.len(), 1);
        assert_eq!(result.notebooks[0].filename, "top.ipynb");
    }

    #[test]
    fn test_directory_named_like_notebook_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("weird.ipynb")).unwrap();

        let result = scanner().scan_directory(temp_dir.path()).unwrap();
        assert!(result.notebooks.is_empty());
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = scanner().scan_directory(temp_dir.path()).unwrap();
        assert!(result.notebooks.is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = scanner().scan_directory(temp_dir.path().join("chapters"));
        assert!(matches!(result, Err(NbBatchError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_file_instead_of_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("chapters");
        fs::write(&file, "not a dir").unwrap();

        let result = scanner().scan_directory(&file);
        assert!(matches!(result, Err(NbBatchError::NotADirectory { .. })));
    }

    #[test]
    fn test_scan_is_stable_across_runs() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["c.ipynb", "a.ipynb", "b.ipynb"] {
            fs::write(temp_dir.path().join(name), "{}").unwrap();
        }

        let first = scanner().scan_directory(temp_dir.path()).unwrap();
        let second = scanner().scan_directory(temp_dir.path()).unwrap();
        assert_eq!(first.notebooks, second.notebooks);
    }
}
