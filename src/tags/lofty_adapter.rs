//! `lofty`-backed implementation of the tag library traits.
//!
//! Commits never rewrite the original file in place: the file is copied to a
//! hidden sibling, tags are written into the copy, the copy is re-probed and
//! every staged value is read back from it. Only then is it renamed over the
//! original. A failure at any step removes the copy and leaves the original
//! untouched.

use super::library::{TagHandle, TagLibrary};
use super::{AudioFormat, TagField, split_position};
use crate::constants::TEMP_FILE_PREFIX;
use crate::cover::{CoverImage, ImageFormat};
use crate::error::{Result, TagfixError};
use lofty::config::WriteOptions;
use lofty::file::{AudioFile, TaggedFile, TaggedFileExt};
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::probe::Probe;
use lofty::tag::{ItemKey, Tag, TagType};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyLibrary;

impl LoftyLibrary {
    pub fn new() -> Self {
        Self
    }
}

impl TagLibrary for LoftyLibrary {
    type Handle = LoftyHandle;

    fn open(&self, path: &Path) -> Result<LoftyHandle> {
        let unsupported = |reason: String| TagfixError::UnsupportedOrCorruptFile {
            path: path.to_path_buf(),
            reason,
        };

        let format = AudioFormat::from_path(path)
            .ok_or_else(|| unsupported("unsupported file extension".to_string()))?;
        // lofty has no ASF reader
        if format == AudioFormat::Wma {
            return Err(unsupported("WMA tags are not supported".to_string()));
        }

        let file = Probe::open(path)
            .and_then(|probe| probe.read())
            .map_err(|e| unsupported(e.to_string()))?;

        log::debug!(
            "Opened {} as {:?} ({} tag(s))",
            path.display(),
            file.file_type(),
            file.tags().len()
        );

        Ok(LoftyHandle {
            path: path.to_path_buf(),
            format,
            file,
            staged: BTreeMap::new(),
            rejected: Vec::new(),
            staged_cover: None,
        })
    }
}

pub struct LoftyHandle {
    path: PathBuf,
    format: AudioFormat,
    file: TaggedFile,
    /// Values written since the last commit, checked against the saved copy
    staged: BTreeMap<TagField, String>,
    /// Fields the primary tag refused to hold
    rejected: Vec<TagField>,
    /// Byte length of the staged front cover
    staged_cover: Option<usize>,
}

impl LoftyHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tag_types(&self) -> Vec<TagType> {
        self.file.tags().iter().map(|t| t.tag_type()).collect()
    }

    fn ensure_primary_tag(&mut self) -> TagType {
        let primary = self.file.primary_tag_type();
        if self.file.tag(primary).is_none() {
            self.file.insert_tag(Tag::new(primary));
        }
        primary
    }

    fn remove_item(&mut self, key: &ItemKey) {
        for tag_type in self.tag_types() {
            if let Some(tag) = self.file.tag_mut(tag_type) {
                tag.remove_key(key);
            }
        }
    }

    fn set_item(&mut self, field: TagField, key: ItemKey, value: &str) {
        let primary = self.ensure_primary_tag();

        for tag_type in self.tag_types() {
            let Some(tag) = self.file.tag_mut(tag_type) else {
                continue;
            };
            // Secondary tags are only updated when they already hold the field
            if tag_type != primary && tag.get_string(&key).is_none() {
                continue;
            }
            if !tag.insert_text(key.clone(), value.to_string()) && tag_type == primary {
                log::warn!(
                    "{:?} tag in {} cannot hold {field}",
                    tag_type,
                    self.path.display()
                );
                if !self.rejected.contains(&field) {
                    self.rejected.push(field);
                }
            }
        }
    }

    /// Copy, write and verify into `temp_path`. Leaves cleanup to the caller.
    fn write_verified_copy(&self, temp_path: &Path) -> std::result::Result<(), String> {
        fs::copy(&self.path, temp_path).map_err(|e| format!("copy failed: {e}"))?;

        self.file
            .save_to_path(temp_path, WriteOptions::default())
            .map_err(|e| e.to_string())?;

        let written = Probe::open(temp_path)
            .and_then(|probe| probe.read())
            .map_err(|e| format!("written file failed verification: {e}"))?;

        check_read_back(&self.staged, |field| read_field(&written, field))?;
        if let Some(len) = self.staged_cover
            && !front_cover_len(&written).is_some_and(|stored| stored == len)
        {
            return Err("cover image was not stored".to_string());
        }

        Ok(())
    }
}

impl TagHandle for LoftyHandle {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn read(&self, field: TagField) -> Option<String> {
        read_field(&self.file, field)
    }

    fn write(&mut self, field: TagField, value: &str) {
        self.staged.insert(field, value.to_string());
        self.rejected.retain(|f| *f != field);

        let key = field.item_key();
        let total_key = field.total_item_key();

        if value.is_empty() {
            self.remove_item(&key);
            if let Some(total_key) = total_key {
                self.remove_item(&total_key);
            }
            return;
        }

        match total_key {
            // Containers like MP4 store number and total as two integers
            Some(total_key) => {
                let (number, total) = split_position(value);
                self.set_item(field, key, number);
                if let Some(total) = total {
                    self.set_item(field, total_key, total);
                }
            }
            None => self.set_item(field, key, value),
        }
    }

    fn has_cover(&self) -> bool {
        front_cover_len(&self.file).is_some()
    }

    fn set_cover(&mut self, cover: &CoverImage) {
        let picture = Picture::new_unchecked(
            PictureType::CoverFront,
            Some(mime_type(cover.format)),
            Some("Cover".to_string()),
            cover.data.clone(),
        );

        let primary = self.ensure_primary_tag();
        if let Some(tag) = self.file.tag_mut(primary) {
            tag.remove_picture_type(PictureType::CoverFront);
            tag.push_picture(picture);
        }
        self.staged_cover = Some(cover.data.len());
    }

    fn commit(&mut self) -> Result<()> {
        if !self.rejected.is_empty() {
            let fields: Vec<String> = self.rejected.iter().map(|f| f.to_string()).collect();
            return Err(TagfixError::SaveFailed {
                path: self.path.clone(),
                reason: format!(
                    "{:?} tag cannot hold {}",
                    self.file.primary_tag_type(),
                    fields.join(", ")
                ),
            });
        }

        let temp_path = temp_sibling(&self.path, self.format);

        if let Err(reason) = self.write_verified_copy(&temp_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(TagfixError::SaveFailed {
                path: self.path.clone(),
                reason,
            });
        }

        // Atomic rename so the original is either fully replaced or untouched
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(TagfixError::SaveFailed {
                path: self.path.clone(),
                reason: format!("failed to replace original file: {e}"),
            });
        }

        self.staged.clear();
        self.staged_cover = None;
        log::info!("Committed tags to {}", self.path.display());
        Ok(())
    }
}

fn read_key(file: &TaggedFile, key: &ItemKey) -> Option<String> {
    // Primary tag wins, then any other tag the container carries
    file.primary_tag()
        .and_then(|tag| tag.get_string(key))
        .or_else(|| file.tags().iter().find_map(|tag| tag.get_string(key)))
        .map(str::to_string)
}

/// Current value of `field`; numbered fields are shown as `N/M` when a
/// total is present.
fn read_field(file: &TaggedFile, field: TagField) -> Option<String> {
    let value = read_key(file, &field.item_key())?;
    match field.total_item_key().and_then(|key| read_key(file, &key)) {
        Some(total) => Some(format!("{value}/{total}")),
        None => Some(value),
    }
}

/// Compare every staged value with what `read` finds in the written file.
fn check_read_back(
    staged: &BTreeMap<TagField, String>,
    read: impl Fn(TagField) -> Option<String>,
) -> std::result::Result<(), String> {
    for (field, expected) in staged {
        let actual = read(*field);
        if !stored_value_matches(*field, expected, actual.as_deref()) {
            return Err(match actual {
                Some(actual) => format!("{field} was stored as '{actual}' instead of '{expected}'"),
                None => format!("{field} '{expected}' was not stored"),
            });
        }
    }
    Ok(())
}

fn stored_value_matches(field: TagField, expected: &str, actual: Option<&str>) -> bool {
    if expected.is_empty() {
        return actual.is_none_or(str::is_empty);
    }
    let Some(actual) = actual else {
        return false;
    };
    if field.total_item_key().is_none() {
        return actual == expected;
    }

    // Numbers may be normalised on save ("03" becomes "3"); a total that was
    // not typed is allowed to stay from before
    let same = |a: &str, b: &str| match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    };
    let (number, total) = split_position(expected);
    let (stored_number, stored_total) = split_position(actual);
    same(number, stored_number)
        && total.is_none_or(|total| stored_total.is_some_and(|stored| same(total, stored)))
}

fn front_cover_len(file: &TaggedFile) -> Option<usize> {
    file.tags()
        .iter()
        .flat_map(|tag| tag.pictures())
        .find(|picture| picture.pic_type() == PictureType::CoverFront)
        .map(|picture| picture.data().len())
}

fn mime_type(format: ImageFormat) -> MimeType {
    match format {
        ImageFormat::Jpeg => MimeType::Jpeg,
        ImageFormat::Png => MimeType::Png,
        ImageFormat::Bmp => MimeType::Bmp,
        ImageFormat::Gif => MimeType::Gif,
    }
}

fn temp_sibling(path: &Path, format: AudioFormat) -> PathBuf {
    let temp_filename = format!(
        "{TEMP_FILE_PREFIX}-{}-{}.{}",
        std::process::id(),
        uuid::Uuid::new_v4().simple(),
        format.extension()
    );
    path.parent().unwrap_or(Path::new(".")).join(temp_filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cover::tests::png_bytes;
    use tempfile::TempDir;

    fn write_wav(path: &Path) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..800 {
            writer.write_sample((i % 64) as i16 * 100).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_open_wav_without_tags() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_wav(&path);

        let handle = LoftyLibrary::new().open(&path).unwrap();
        assert_eq!(handle.format(), AudioFormat::Wav);
        assert_eq!(handle.read(TagField::Artist), None);
    }

    #[test]
    fn test_open_corrupt_file_is_skippable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.flac");
        fs::write(&path, b"definitely not a flac stream").unwrap();

        let result = LoftyLibrary::new().open(&path);
        assert!(matches!(
            result,
            Err(TagfixError::UnsupportedOrCorruptFile { .. })
        ));
    }

    #[test]
    fn test_write_is_in_memory_until_commit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_wav(&path);

        let library = LoftyLibrary::new();
        let mut handle = library.open(&path).unwrap();
        handle.write(TagField::Artist, "The Testers");
        assert_eq!(handle.read(TagField::Artist).as_deref(), Some("The Testers"));

        let reopened = library.open(&path).unwrap();
        assert_eq!(reopened.read(TagField::Artist), None);
    }

    #[test]
    fn test_commit_persists_all_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_wav(&path);

        let library = LoftyLibrary::new();
        let mut handle = library.open(&path).unwrap();
        handle.write(TagField::Artist, "The Testers");
        handle.write(TagField::Album, "Fixtures");
        handle.write(TagField::Title, "Sine");
        handle.commit().unwrap();

        let reopened = library.open(&path).unwrap();
        assert_eq!(reopened.read(TagField::Artist).as_deref(), Some("The Testers"));
        assert_eq!(reopened.read(TagField::Album).as_deref(), Some("Fixtures"));
        assert_eq!(reopened.read(TagField::Title).as_deref(), Some("Sine"));
    }

    #[test]
    fn test_commit_leaves_no_temp_files() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_wav(&path);

        let mut handle = LoftyLibrary::new().open(&path).unwrap();
        handle.write(TagField::Genre, "Test");
        handle.commit().unwrap();

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(TEMP_FILE_PREFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_commit_failure_leaves_original_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_wav(&path);
        let before = fs::read(&path).unwrap();

        let mut handle = LoftyLibrary::new().open(&path).unwrap();
        handle.write(TagField::Artist, "Ghost");
        fs::remove_file(&path).unwrap();

        let result = handle.commit();
        assert!(matches!(result, Err(TagfixError::SaveFailed { .. })));
        assert!(!path.exists());

        // Restoring the bytes shows nothing was half-written in between
        fs::write(&path, &before).unwrap();
        let reopened = LoftyLibrary::new().open(&path).unwrap();
        assert_eq!(reopened.read(TagField::Artist), None);
    }

    #[test]
    fn test_empty_value_clears_field() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_wav(&path);

        let library = LoftyLibrary::new();
        let mut handle = library.open(&path).unwrap();
        handle.write(TagField::Comment, "remove me");
        handle.write(TagField::Artist, "Keeper");
        handle.commit().unwrap();

        let mut handle = library.open(&path).unwrap();
        handle.write(TagField::Comment, "");
        handle.commit().unwrap();

        let reopened = library.open(&path).unwrap();
        assert_eq!(reopened.read(TagField::Comment), None);
        assert_eq!(reopened.read(TagField::Artist).as_deref(), Some("Keeper"));
    }

    #[test]
    fn test_position_is_split_into_number_and_total() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_wav(&path);

        let library = LoftyLibrary::new();
        let mut handle = library.open(&path).unwrap();
        handle.write(TagField::TrackNumber, "3/12");
        handle.write(TagField::DiscNumber, "1 / 2");
        handle.commit().unwrap();

        let mut reopened = library.open(&path).unwrap();
        assert_eq!(reopened.read(TagField::TrackNumber).as_deref(), Some("3/12"));
        assert_eq!(reopened.read(TagField::DiscNumber).as_deref(), Some("1/2"));

        // A bare number keeps the stored total
        reopened.write(TagField::TrackNumber, "4");
        reopened.commit().unwrap();
        let reopened = library.open(&path).unwrap();
        assert_eq!(reopened.read(TagField::TrackNumber).as_deref(), Some("4/12"));
    }

    #[test]
    fn test_clearing_position_removes_total() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_wav(&path);

        let library = LoftyLibrary::new();
        let mut handle = library.open(&path).unwrap();
        handle.write(TagField::TrackNumber, "3/12");
        handle.commit().unwrap();

        let mut handle = library.open(&path).unwrap();
        handle.write(TagField::TrackNumber, "");
        handle.commit().unwrap();

        let reopened = library.open(&path).unwrap();
        assert_eq!(reopened.read(TagField::TrackNumber), None);
    }

    #[test]
    fn test_read_back_mismatch_is_reported() {
        let mut staged = BTreeMap::new();
        staged.insert(TagField::TrackNumber, "A1".to_string());

        // What MP4 does with a track number that is not an integer
        let err = check_read_back(&staged, |_| None).unwrap_err();
        assert!(err.contains("tracknumber"));
        assert!(err.contains("A1"));

        staged.insert(TagField::TrackNumber, "3/12".to_string());
        let err = check_read_back(&staged, |_| Some("3".to_string())).unwrap_err();
        assert!(err.contains("stored as '3'"));

        let mut staged = BTreeMap::new();
        staged.insert(TagField::Title, "Sine".to_string());
        assert!(check_read_back(&staged, |_| Some("Sine".to_string())).is_ok());
        assert!(check_read_back(&staged, |_| Some("Square".to_string())).is_err());
    }

    #[test]
    fn test_read_back_tolerates_normalised_numbers_and_cleared_fields() {
        assert!(stored_value_matches(TagField::TrackNumber, "03", Some("3")));
        assert!(stored_value_matches(TagField::TrackNumber, "3", Some("3/12")));
        assert!(stored_value_matches(TagField::DiscNumber, "01/02", Some("1/2")));
        assert!(!stored_value_matches(TagField::DiscNumber, "1/3", Some("1/2")));
        assert!(stored_value_matches(TagField::Comment, "", None));
        assert!(!stored_value_matches(TagField::Comment, "", Some("left")));
        assert!(!stored_value_matches(TagField::Title, "03", Some("3")));
    }

    #[test]
    fn test_wma_is_reported_as_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("old.wma");
        fs::write(&path, b"0&\xb2u\x8ef\xcf\x11 not really asf").unwrap();

        match LoftyLibrary::new().open(&path) {
            Err(TagfixError::UnsupportedOrCorruptFile { reason, .. }) => {
                assert_eq!(reason, "WMA tags are not supported");
            }
            other => panic!("expected an unsupported file error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_cover_is_embedded_on_commit() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_wav(&path);
        let cover = CoverImage {
            path: temp_dir.path().join("front.png"),
            format: ImageFormat::Png,
            data: png_bytes(),
        };

        let library = LoftyLibrary::new();
        let mut handle = library.open(&path).unwrap();
        assert!(!handle.has_cover());
        handle.set_cover(&cover);
        handle.write(TagField::Album, "Fixtures");
        handle.commit().unwrap();

        let reopened = library.open(&path).unwrap();
        assert!(reopened.has_cover());
        assert_eq!(front_cover_len(&reopened.file), Some(cover.data.len()));
        assert_eq!(reopened.read(TagField::Album).as_deref(), Some("Fixtures"));
    }

    #[test]
    fn test_new_cover_replaces_old_one() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tone.wav");
        write_wav(&path);
        let small = CoverImage {
            path: temp_dir.path().join("small.png"),
            format: ImageFormat::Png,
            data: png_bytes(),
        };
        let mut large = small.clone();
        large.data.extend_from_slice(&[1u8; 100]);

        let library = LoftyLibrary::new();
        let mut handle = library.open(&path).unwrap();
        handle.set_cover(&small);
        handle.commit().unwrap();

        let mut handle = library.open(&path).unwrap();
        handle.set_cover(&large);
        handle.commit().unwrap();

        let reopened = library.open(&path).unwrap();
        let fronts = reopened
            .file
            .tags()
            .iter()
            .flat_map(|tag| tag.pictures())
            .filter(|p| p.pic_type() == PictureType::CoverFront)
            .count();
        assert_eq!(fronts, 1);
        assert_eq!(front_cover_len(&reopened.file), Some(large.data.len()));
    }

    #[test]
    fn test_temp_sibling_is_hidden_and_keeps_extension() {
        let temp = temp_sibling(Path::new("/music/album/01.flac"), AudioFormat::Flac);
        assert_eq!(temp.parent(), Some(Path::new("/music/album")));
        let name = temp.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(TEMP_FILE_PREFIX));
        assert!(name.ends_with(".flac"));
    }
}
