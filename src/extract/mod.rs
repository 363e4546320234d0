//! File extraction - directory tree to ordered FileRecord list
//!
//! Walks a project directory and produces the flat, ordered file list the
//! pipeline runs over. The walk order is sorted by path so the same tree
//! always yields the same records in the same positions; file indices are
//! identities for the rest of the run, and the cache fingerprints depend
//! on them.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use thiserror::Error;
use walkdir::WalkDir;

use crate::core::FileRecord;

/// Directories never worth documenting, skipped in addition to hidden ones.
const SKIPPED_DIRS: &[&str] = &["target", "node_modules", "__pycache__", "venv", "dist"];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("invalid glob pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: globset::Error,
    },
}

/// Filters applied during extraction.
#[derive(Debug, Default, Clone)]
pub struct ExtractOptions {
    /// Include globs over relative paths; empty means include everything.
    pub include: Vec<String>,
    /// Exclude globs over relative paths.
    pub exclude: Vec<String>,
    /// Skip files larger than this many bytes.
    pub max_file_size: Option<u64>,
}

/// Read the project's `.gitignore` into glob patterns.
///
/// Supports the common subset: blank lines and comments are dropped,
/// anchored and directory patterns are expanded to match at any depth and
/// below. Negations and unparsable lines are skipped rather than fatal;
/// the file is advisory input, not configuration we own.
fn gitignore_patterns(directory: &Path) -> Vec<String> {
    let Ok(content) = std::fs::read_to_string(directory.join(".gitignore")) else {
        return Vec::new();
    };
    let mut patterns = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let base = line.trim_start_matches('/').trim_end_matches('/');
        if base.is_empty() {
            continue;
        }
        patterns.push(base.to_string());
        patterns.push(format!("{base}/**"));
        patterns.push(format!("**/{base}"));
        patterns.push(format!("**/{base}/**"));
    }
    patterns
}

/// Globset over gitignore-derived patterns; bad lines are skipped.
fn build_gitignore_globset(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder.build().ok()
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, ExtractError> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ExtractError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    let set = builder.build().map_err(|source| ExtractError::Pattern {
        pattern: patterns.join(","),
        source,
    })?;
    Ok(Some(set))
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| SKIPPED_DIRS.contains(&name))
            .unwrap_or(false)
}

/// Extract files from `directory` into the ordered FileRecord list.
///
/// The project's `.gitignore` is honored in addition to the caller's
/// exclude patterns. Unreadable and non-UTF-8 files are skipped, not
/// fatal; deciding whether an *empty* result aborts the run is left to
/// the caller.
pub fn extract(directory: &Path, options: &ExtractOptions) -> Result<Vec<FileRecord>, ExtractError> {
    if !directory.exists() {
        return Err(ExtractError::MissingDirectory(directory.to_path_buf()));
    }
    if !directory.is_dir() {
        return Err(ExtractError::NotADirectory(directory.to_path_buf()));
    }

    let include = build_globset(&options.include)?;
    let exclude = build_globset(&options.exclude)?;
    let gitignore = build_gitignore_globset(&gitignore_patterns(directory));

    let mut records = Vec::new();
    // depth 0 is the root itself; its name must not be filtered on.
    let walker = WalkDir::new(directory)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || (!is_hidden(e) && !is_skipped_dir(e)));

    for entry in walker.flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel_path = match entry.path().strip_prefix(directory) {
            Ok(p) => p,
            Err(_) => continue,
        };

        if let Some(ref gitignore) = gitignore {
            if gitignore.is_match(rel_path) {
                continue;
            }
        }
        if let Some(ref exclude) = exclude {
            if exclude.is_match(rel_path) {
                continue;
            }
        }
        if let Some(ref include) = include {
            if !include.is_match(rel_path) {
                continue;
            }
        }
        if let Some(limit) = options.max_file_size {
            match entry.metadata() {
                Ok(meta) if meta.len() > limit => continue,
                Err(_) => continue,
                _ => {}
            }
        }

        // Binary or unreadable files are silently left out of the record set.
        if let Ok(content) = std::fs::read_to_string(entry.path()) {
            records.push(FileRecord::new(rel_path.to_string_lossy(), content));
        }
    }

    Ok(records)
}
