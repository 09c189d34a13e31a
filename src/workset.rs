//! The working set: files of one directory run that opened successfully.

use crate::cover::CoverImage;
use crate::error::TagfixError;
use crate::tags::{AudioFormat, TagField, TagHandle, TagLibrary};
use crate::ui::output;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// One file under edit, with the values waiting to be written to it.
pub struct AudioFile<H: TagHandle> {
    pub path: PathBuf,
    pub format: AudioFormat,
    pub handle: H,
    pub pending: BTreeMap<TagField, String>,
    /// Front cover waiting to be embedded
    pub pending_cover: Option<Rc<CoverImage>>,
}

impl<H: TagHandle> AudioFile<H> {
    pub fn new(path: PathBuf, handle: H) -> Self {
        Self {
            format: handle.format(),
            path,
            handle,
            pending: BTreeMap::new(),
            pending_cover: None,
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn current(&self, field: TagField) -> Option<String> {
        self.handle.read(field)
    }

    pub fn stage(&mut self, field: TagField, value: impl Into<String>) {
        self.pending.insert(field, value.into());
    }

    pub fn stage_cover(&mut self, cover: Rc<CoverImage>) {
        self.pending_cover = Some(cover);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty() || self.pending_cover.is_some()
    }

    /// Number of staged writes, counting a cover as one.
    pub fn pending_count(&self) -> usize {
        self.pending.len() + usize::from(self.pending_cover.is_some())
    }
}

/// A file that matched by extension but could not be opened.
#[derive(Debug, Clone, PartialEq)]
pub struct UnreadableFile {
    pub path: PathBuf,
    pub reason: String,
}

pub struct WorkingSet<H: TagHandle> {
    pub files: Vec<AudioFile<H>>,
    pub unreadable: Vec<UnreadableFile>,
}

impl<H: TagHandle> WorkingSet<H> {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn pending_writes(&self) -> usize {
        self.files.iter().map(AudioFile::pending_count).sum()
    }

    pub fn files_with_pending(&self) -> usize {
        self.files.iter().filter(|f| f.has_pending()).count()
    }

    pub fn clear_pending(&mut self) {
        for file in &mut self.files {
            file.pending.clear();
            file.pending_cover = None;
        }
    }
}

/// Open every candidate, warning about and setting aside the ones that fail.
pub fn open_working_set<L: TagLibrary>(library: &L, paths: &[PathBuf]) -> WorkingSet<L::Handle> {
    let mut files = Vec::with_capacity(paths.len());
    let mut unreadable = Vec::new();

    for path in paths {
        match library.open(path) {
            Ok(handle) => files.push(AudioFile::new(path.clone(), handle)),
            Err(err) => {
                let reason = skip_reason(path, err);
                log::warn!("Skipping {}: {reason}", path.display());
                output::print_skip_warning(path, &reason);
                unreadable.push(UnreadableFile {
                    path: path.clone(),
                    reason,
                });
            }
        }
    }

    WorkingSet { files, unreadable }
}

fn skip_reason(path: &Path, err: TagfixError) -> String {
    match err {
        TagfixError::UnsupportedOrCorruptFile { reason, .. } => reason,
        other => {
            log::debug!("Unexpected open error for {}: {other}", path.display());
            other.to_string()
        }
    }
}
