//! Tag fields and audio formats understood by tagfix.
//!
//! The nine editable fields are fixed; each maps onto a format-neutral
//! `lofty` item key so the rest of the program never deals with ID3 frame
//! names, MP4 atoms or Vorbis comment keys directly.

use crate::constants::AUDIO_EXTENSIONS;
use lofty::tag::ItemKey;
use std::fmt;
use std::path::Path;

pub mod library;
pub mod lofty_adapter;

pub use library::{TagHandle, TagLibrary};
pub use lofty_adapter::{LoftyHandle, LoftyLibrary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagField {
    Artist,
    AlbumArtist,
    Album,
    Title,
    Genre,
    Date,
    TrackNumber,
    DiscNumber,
    Comment,
}

impl TagField {
    /// All fields in menu order.
    pub const ALL: [TagField; 9] = [
        TagField::Artist,
        TagField::AlbumArtist,
        TagField::Album,
        TagField::Title,
        TagField::Genre,
        TagField::Date,
        TagField::TrackNumber,
        TagField::DiscNumber,
        TagField::Comment,
    ];

    /// Lowercase key, as shown in prompts and logs.
    pub fn key(self) -> &'static str {
        match self {
            TagField::Artist => "artist",
            TagField::AlbumArtist => "albumartist",
            TagField::Album => "album",
            TagField::Title => "title",
            TagField::Genre => "genre",
            TagField::Date => "date",
            TagField::TrackNumber => "tracknumber",
            TagField::DiscNumber => "discnumber",
            TagField::Comment => "comment",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TagField::Artist => "Artist",
            TagField::AlbumArtist => "Album Artist",
            TagField::Album => "Album",
            TagField::Title => "Title",
            TagField::Genre => "Genre",
            TagField::Date => "Date",
            TagField::TrackNumber => "Track Number",
            TagField::DiscNumber => "Disc Number",
            TagField::Comment => "Comment",
        }
    }

    /// 1-based position in the field menu.
    pub fn menu_number(self) -> usize {
        TagField::ALL
            .iter()
            .position(|f| *f == self)
            .map(|i| i + 1)
            .unwrap_or_default()
    }

    pub fn from_menu_number(number: usize) -> Option<TagField> {
        number
            .checked_sub(1)
            .and_then(|i| TagField::ALL.get(i))
            .copied()
    }

    pub fn from_key(key: &str) -> Option<TagField> {
        let key = key.trim().to_lowercase();
        TagField::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Fields usually shared by every track of an album.
    pub fn is_album_level(self) -> bool {
        matches!(
            self,
            TagField::Artist
                | TagField::AlbumArtist
                | TagField::Album
                | TagField::Genre
                | TagField::Date
        )
    }

    pub fn item_key(self) -> ItemKey {
        match self {
            TagField::Artist => ItemKey::TrackArtist,
            TagField::AlbumArtist => ItemKey::AlbumArtist,
            TagField::Album => ItemKey::AlbumTitle,
            TagField::Title => ItemKey::TrackTitle,
            TagField::Genre => ItemKey::Genre,
            TagField::Date => ItemKey::RecordingDate,
            TagField::TrackNumber => ItemKey::TrackNumber,
            TagField::DiscNumber => ItemKey::DiscNumber,
            TagField::Comment => ItemKey::Comment,
        }
    }

    /// Key holding the "of N" half of a numbered field.
    pub fn total_item_key(self) -> Option<ItemKey> {
        match self {
            TagField::TrackNumber => Some(ItemKey::TrackTotal),
            TagField::DiscNumber => Some(ItemKey::DiscTotal),
            _ => None,
        }
    }
}

/// Split a position such as `3/12` into number and total.
///
/// A missing or blank total yields `None`; the number part is returned as
/// typed, so non-numeric input still reaches the tag library.
pub fn split_position(value: &str) -> (&str, Option<&str>) {
    match value.split_once('/') {
        Some((number, total)) => {
            let total = total.trim();
            (number.trim(), (!total.is_empty()).then_some(total))
        }
        None => (value.trim(), None),
    }
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Flac,
    Mp3,
    M4a,
    Ogg,
    Opus,
    Wma,
    Wav,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Option<AudioFormat> {
        match ext.to_lowercase().as_str() {
            "flac" => Some(AudioFormat::Flac),
            "mp3" => Some(AudioFormat::Mp3),
            "m4a" => Some(AudioFormat::M4a),
            "ogg" => Some(AudioFormat::Ogg),
            "opus" => Some(AudioFormat::Opus),
            "wma" => Some(AudioFormat::Wma),
            "wav" => Some(AudioFormat::Wav),
            _ => None,
        }
    }

    /// Detect the format of a path from its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<AudioFormat> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(AudioFormat::from_extension)
    }

    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Flac => "flac",
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
            AudioFormat::Ogg => "ogg",
            AudioFormat::Opus => "opus",
            AudioFormat::Wma => "wma",
            AudioFormat::Wav => "wav",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

/// True when the path carries one of the supported audio extensions.
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
}
