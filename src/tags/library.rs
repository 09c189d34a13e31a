//! Capability interface over the tag-editing library.
//!
//! Everything outside `tags` talks to audio files only through these two
//! traits, so field selection, planning and applying stay format-agnostic.

use super::{AudioFormat, TagField};
use crate::cover::CoverImage;
use crate::error::Result;
use std::path::Path;

/// An open, tagged audio file.
///
/// Writes only touch the in-memory handle until `commit` persists all of
/// them in one container rewrite.
pub trait TagHandle {
    fn format(&self) -> AudioFormat;

    fn read(&self, field: TagField) -> Option<String>;

    /// Stage a value. An empty value clears the field.
    fn write(&mut self, field: TagField, value: &str);

    /// True when the file carries a front cover picture.
    fn has_cover(&self) -> bool;

    /// Stage `cover` as the front cover, replacing any existing one.
    fn set_cover(&mut self, cover: &CoverImage);

    /// Persist every staged write. Either all of them land or none do.
    fn commit(&mut self) -> Result<()>;
}

pub trait TagLibrary {
    type Handle: TagHandle;

    /// Open a candidate file. Fails with `UnsupportedOrCorruptFile` when the
    /// container cannot be parsed.
    fn open(&self, path: &Path) -> Result<Self::Handle>;
}
