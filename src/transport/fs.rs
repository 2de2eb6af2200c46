use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::constants::unpack::{CSV_EXTENSION, DATA_FILE_MARKER};
use crate::errors::PipelineError;
use crate::splits::SplitFolder;

/// A raw file admitted by the scan, tagged with the split it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitFile {
    /// Split subfolder the file was found in.
    pub split: SplitFolder,
    /// Full path of the file.
    pub path: PathBuf,
}

/// Filesystem transport that lists raw files under `train/`, `test/`, and `dev/`.
pub struct SplitDirScanner {
    root: PathBuf,
}

impl SplitDirScanner {
    /// Create a scanner rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Admitted files in split order (`train`, `test`, `dev`), sorted by file name within a split.
    ///
    /// A missing root is an error; a missing split subfolder is skipped.
    pub fn scan(&self) -> Result<Vec<SplitFile>, PipelineError> {
        let metadata = std::fs::metadata(&self.root)
            .map_err(|err| PipelineError::filesystem(&self.root, err))?;
        if !metadata.is_dir() {
            return Err(PipelineError::filesystem(
                &self.root,
                std::io::Error::new(
                    std::io::ErrorKind::NotADirectory,
                    "input_dir is not a directory",
                ),
            ));
        }

        let mut files = Vec::new();
        for split in SplitFolder::all() {
            let dir = split.path_in(&self.root);
            if !dir.is_dir() {
                warn!(
                    "[protein_pipeline:unpack] split folder {} not found; skipping",
                    dir.display()
                );
                continue;
            }
            for path in self.list_split_dir(&dir)? {
                if is_candidate_file(&path) {
                    files.push(SplitFile { split, path });
                } else {
                    debug!(
                        "[protein_pipeline:unpack] ignoring non-data file {}",
                        path.display()
                    );
                }
            }
        }
        Ok(files)
    }

    fn list_split_dir(&self, dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();
        let mut paths = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(dir).to_path_buf();
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                PipelineError::filesystem(path, source)
            })?;
            if entry.file_type().is_file() {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }
}

/// True if the file name ends in `.csv` or contains `data-`.
pub fn is_candidate_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(CSV_EXTENSION) || name.contains(DATA_FILE_MARKER))
        .unwrap_or(false)
}
