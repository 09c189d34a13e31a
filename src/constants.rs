//! Project-wide constants used across multiple modules.
//!
//! This module centralizes constant definitions to avoid duplication and ensure
//! consistency across the codebase.

/// Spinner animation characters for progress indicators
pub const SPINNER_CHARS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Supported audio file extensions (lowercase, without the leading dot)
pub const AUDIO_EXTENSIONS: &[&str] = &["flac", "mp3", "m4a", "ogg", "opus", "wma", "wav"];

/// Prefix of the hidden scratch copy written next to a file during commit
pub const TEMP_FILE_PREFIX: &str = ".tagfix-temp";

/// Label shown for a field with no value
pub const NOT_SET: &str = "[Not Set]";

/// Menu input that leaves the current menu
pub const EXIT_CHOICE: &str = "0";

/// Application directory name under the user's config dir
pub const APP_DIR_NAME: &str = "tagfix";

/// Image extensions accepted for cover art
pub const COVER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif"];

/// Field menu entry for embedding a cover image
pub const COVER_CHOICE: &str = "c";
