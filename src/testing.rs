//! In-memory tag library for exercising sessions without real audio files.
//!
//! Paths are plain keys; nothing is read from or written to disk. Open and
//! save failures can be injected per path.

use crate::cancel::CancelToken;
use crate::cover::CoverImage;
use crate::error::{Result, TagfixError};
use crate::tags::{AudioFormat, TagField, TagHandle, TagLibrary};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub type TagMap = BTreeMap<TagField, String>;

#[derive(Default)]
struct MemoryStore {
    files: HashMap<PathBuf, TagMap>,
    covers: HashMap<PathBuf, Vec<u8>>,
    unreadable: HashMap<PathBuf, String>,
    failing_saves: HashSet<PathBuf>,
    commits: Vec<PathBuf>,
    cancel_on_commit: Option<CancelToken>,
}

#[derive(Clone, Default)]
pub struct MemoryLibrary {
    store: Rc<RefCell<MemoryStore>>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>, tags: &[(TagField, &str)]) {
        let tags = tags
            .iter()
            .map(|(field, value)| (*field, value.to_string()))
            .collect();
        self.store
            .borrow_mut()
            .files
            .insert(path.as_ref().to_path_buf(), tags);
    }

    pub fn add_unreadable(&self, path: impl AsRef<Path>, reason: &str) {
        self.store
            .borrow_mut()
            .unreadable
            .insert(path.as_ref().to_path_buf(), reason.to_string());
    }

    /// Make every commit of `path` fail.
    pub fn fail_saves_for(&self, path: impl AsRef<Path>) {
        self.store
            .borrow_mut()
            .failing_saves
            .insert(path.as_ref().to_path_buf());
    }

    /// Cancel `token` as soon as the first commit succeeds.
    pub fn cancel_after_first_commit(&self, token: CancelToken) {
        self.store.borrow_mut().cancel_on_commit = Some(token);
    }

    /// Stored (committed) tags of `path`.
    pub fn tags(&self, path: impl AsRef<Path>) -> TagMap {
        self.store
            .borrow()
            .files
            .get(path.as_ref())
            .cloned()
            .unwrap_or_default()
    }

    /// Committed front cover bytes of `path`.
    pub fn cover(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.store.borrow().covers.get(path.as_ref()).cloned()
    }

    pub fn committed_paths(&self) -> Vec<PathBuf> {
        self.store.borrow().commits.clone()
    }
}

impl TagLibrary for MemoryLibrary {
    type Handle = MemoryHandle;

    fn open(&self, path: &Path) -> Result<MemoryHandle> {
        let store = self.store.borrow();
        if let Some(reason) = store.unreadable.get(path) {
            return Err(TagfixError::UnsupportedOrCorruptFile {
                path: path.to_path_buf(),
                reason: reason.clone(),
            });
        }

        let format = AudioFormat::from_path(path);
        match (store.files.get(path), format) {
            (Some(tags), Some(format)) => Ok(MemoryHandle {
                path: path.to_path_buf(),
                format,
                tags: tags.clone(),
                cover: store.covers.get(path).cloned(),
                store: Rc::clone(&self.store),
            }),
            _ => Err(TagfixError::UnsupportedOrCorruptFile {
                path: path.to_path_buf(),
                reason: "unknown file".to_string(),
            }),
        }
    }
}

pub struct MemoryHandle {
    path: PathBuf,
    format: AudioFormat,
    tags: TagMap,
    cover: Option<Vec<u8>>,
    store: Rc<RefCell<MemoryStore>>,
}

impl TagHandle for MemoryHandle {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn read(&self, field: TagField) -> Option<String> {
        self.tags.get(&field).cloned()
    }

    fn write(&mut self, field: TagField, value: &str) {
        if value.is_empty() {
            self.tags.remove(&field);
        } else {
            self.tags.insert(field, value.to_string());
        }
    }

    fn has_cover(&self) -> bool {
        self.cover.is_some()
    }

    fn set_cover(&mut self, cover: &CoverImage) {
        self.cover = Some(cover.data.clone());
    }

    fn commit(&mut self) -> Result<()> {
        let mut store = self.store.borrow_mut();
        if store.failing_saves.contains(&self.path) {
            return Err(TagfixError::SaveFailed {
                path: self.path.clone(),
                reason: "simulated write failure".to_string(),
            });
        }

        store.files.insert(self.path.clone(), self.tags.clone());
        if let Some(cover) = &self.cover {
            store.covers.insert(self.path.clone(), cover.clone());
        }
        store.commits.push(self.path.clone());
        if let Some(token) = store.cancel_on_commit.take() {
            token.cancel();
        }
        Ok(())
    }
}
