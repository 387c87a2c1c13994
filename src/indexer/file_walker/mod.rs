//! Recursive enumeration of source files by extension

use crate::error::IndexingError;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Walks a directory tree and yields every file with a given extension.
///
/// No ignore files, size limits or exclusion lists are applied; the only
/// filter is the extension. Symlinked files are yielded but symlinked
/// directories are not descended into.
pub struct FileWalker {
    pub(crate) root: PathBuf,
    pub(crate) extension: String,
}

impl FileWalker {
    pub fn new(root: impl AsRef<Path>, extension: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Start a fresh walk. The returned iterator is lazy: directories are
    /// read only as it is advanced.
    pub fn walk(&self) -> Result<MatchingFiles, IndexingError> {
        if !self.root.exists() {
            return Err(IndexingError::DirectoryNotFound(
                self.root.display().to_string(),
            ));
        }
        if !self.root.is_dir() {
            return Err(IndexingError::NotADirectory(
                self.root.display().to_string(),
            ));
        }

        tracing::debug!(
            "Walking {} for *.{} files",
            self.root.display(),
            self.extension
        );

        Ok(MatchingFiles {
            inner: WalkDir::new(&self.root).follow_links(false).into_iter(),
            extension: self.extension.clone(),
        })
    }

    pub(crate) fn matches_extension(path: &Path, extension: &str) -> bool {
        path.extension().and_then(OsStr::to_str) == Some(extension)
    }
}

/// Lazy iterator over the files matched by [`FileWalker::walk`]
pub struct MatchingFiles {
    inner: walkdir::IntoIter,
    extension: String,
}

impl Iterator for MatchingFiles {
    type Item = Result<PathBuf, IndexingError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(IndexingError::WalkFailed(e.to_string()))),
            };

            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                continue;
            }

            if FileWalker::matches_extension(entry.path(), &self.extension) {
                return Some(Ok(entry.into_path()));
            }
        }
    }
}
