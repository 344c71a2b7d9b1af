use globset::{Glob, GlobMatcher};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::EnumerationError;

pub const SOURCE_PATTERN: &str = "*.php";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDepth {
    /// Only files directly inside each root.
    TopLevel,
    Unbounded,
}

/// Supplies candidate source files.
pub trait FileEnumerator: Send + Sync {
    fn enumerate(
        &self,
        roots: &[PathBuf],
        pattern: &str,
        depth: ScanDepth,
    ) -> Result<Vec<PathBuf>, EnumerationError>;
}

/// Directory walk with a file-name glob. Entries are visited in file-name
/// order within each directory, roots in the order given. Dot-directories
/// below a root are skipped unless `exclude_hidden` is turned off.
#[derive(Debug, Clone)]
pub struct WalkDirEnumerator {
    pub exclude_hidden: bool,
}

impl Default for WalkDirEnumerator {
    fn default() -> Self {
        Self {
            exclude_hidden: true,
        }
    }
}

impl WalkDirEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn walk_root(
        &self,
        root: &Path,
        matcher: &GlobMatcher,
        depth: ScanDepth,
        files: &mut Vec<PathBuf>,
    ) -> Result<(), EnumerationError> {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        let mut walker = WalkDir::new(&root).sort_by_file_name();
        if depth == ScanDepth::TopLevel {
            walker = walker.max_depth(1);
        }

        let exclude_hidden = self.exclude_hidden;
        for entry in walker.into_iter().filter_entry(|e| {
            !(exclude_hidden && e.depth() > 0 && e.file_name().to_string_lossy().starts_with('.'))
        }) {
            let entry = entry.map_err(|e| EnumerationError::DirectoryScan {
                path: root.clone(),
                source: e,
            })?;

            if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
                files.push(entry.into_path());
            }
        }

        Ok(())
    }
}

impl FileEnumerator for WalkDirEnumerator {
    fn enumerate(
        &self,
        roots: &[PathBuf],
        pattern: &str,
        depth: ScanDepth,
    ) -> Result<Vec<PathBuf>, EnumerationError> {
        let matcher = Glob::new(pattern)
            .map_err(|e| EnumerationError::InvalidPattern {
                pattern: pattern.to_string(),
                source: e,
            })?
            .compile_matcher();

        let mut files = Vec::new();
        for root in roots {
            self.walk_root(root, &matcher, depth, &mut files)?;
        }
        Ok(files)
    }
}
