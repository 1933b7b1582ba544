use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use rayon::prelude::*;
use walkdir::{DirEntry, WalkDir};

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal relative paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Paths excluded from a scan, relative to the scanned root.
#[derive(Debug, Default, Clone)]
pub struct ScanFilter {
    literal_paths: Vec<PathBuf>,
    glob_patterns: Vec<Pattern>,
}

impl ScanFilter {
    pub fn new(ignores: &[String]) -> Result<Self> {
        let mut filter = Self::default();
        for p in ignores {
            if is_glob_pattern(p) {
                let pattern = Pattern::new(p)
                    .with_context(|| format!("Invalid ignore pattern: \"{}\"", p))?;
                filter.glob_patterns.push(pattern);
            } else {
                filter.literal_paths.push(PathBuf::from(p));
            }
        }
        Ok(filter)
    }

    pub fn is_ignored(&self, relative: &Path) -> bool {
        self.literal_paths.iter().any(|p| relative.starts_with(p))
            || self.glob_patterns.iter().any(|p| p.matches_path(relative))
    }
}

/// Recursively list every file under `root`, sorted by path.
///
/// Ignored directories are pruned rather than walked. Entries are checked in
/// parallel as the walk yields them; the call returns once the whole tree has
/// been listed. Directories are not part of the result.
pub fn list_files(root: &Path, filter: &ScanFilter) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        entry.depth() == 0 || !filter.is_ignored(relative)
    });

    let mut files = walker
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(entry) if is_listed_file(&entry) => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(err) => Some(
                Err::<PathBuf, _>(err)
                    .with_context(|| format!("Failed to walk directory: {}", root.display())),
            ),
        })
        .collect::<Result<Vec<_>>>()?;
    files.sort();
    Ok(files)
}

/// Regular files, and symlinks that point at one.
fn is_listed_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}
