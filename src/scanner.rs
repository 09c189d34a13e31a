//! Directory scanning for candidate audio files.
//!
//! Candidates are selected purely by extension; whether a file can actually
//! be parsed is decided later when it is opened.

use crate::error::{Result, TagfixError};
use crate::tags::is_supported_path;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy)]
pub struct ScanOptions {
    pub recursive: bool,
    pub include_hidden: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            include_hidden: false,
        }
    }
}

/// Turn raw user input into an absolute directory path.
///
/// Strips surrounding whitespace and quotes (paths pasted from a file
/// manager often carry them) and expands `~`. The directory must be listable.
pub fn resolve_directory(input: &str) -> Result<PathBuf> {
    let path = clean_path_input(input);

    if !path.exists() {
        return Err(TagfixError::DirectoryNotFound(path));
    }
    if !path.is_dir() {
        return Err(TagfixError::NotADirectory(path));
    }
    if let Err(e) = fs::read_dir(&path) {
        return Err(TagfixError::DirectoryUnreadable {
            path,
            reason: e.to_string(),
        });
    }

    fs::canonicalize(&path).map_err(|e| TagfixError::DirectoryUnreadable {
        path,
        reason: e.to_string(),
    })
}

/// Strip whitespace and surrounding quotes from typed path input and expand `~`.
pub fn clean_path_input(input: &str) -> PathBuf {
    let trimmed = input.trim().trim_matches('"').trim_matches('\'').trim();
    PathBuf::from(shellexpand::tilde(trimmed).as_ref())
}

/// Check if a file or directory is hidden (starts with '.')
pub fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Collect supported audio files under `dir`, sorted lexicographically.
///
/// The root directory must be readable; unreadable subdirectories are logged
/// and skipped so one bad folder does not hide the rest of a library.
pub fn scan_directory(dir: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(TagfixError::DirectoryNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(TagfixError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    collect_files(dir, options, &mut files)?;
    files.sort();

    log::info!("Scanned {}: {} candidate(s)", dir.display(), files.len());
    Ok(files)
}

fn collect_files(dir: &Path, options: &ScanOptions, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries: Vec<_> = fs::read_dir(dir)?.collect::<std::result::Result<_, _>>()?;

    for entry in entries {
        let path = entry.path();

        if !options.include_hidden && is_hidden_file(&path) {
            continue;
        }

        if path.is_dir() {
            if !options.recursive {
                continue;
            }
            if let Err(e) = collect_files(&path, options, files) {
                log::warn!("Skipping unreadable directory {}: {e}", path.display());
            }
        } else if path.is_file() && is_supported_path(&path) {
            files.push(path);
        }
    }

    Ok(())
}
