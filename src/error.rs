//! Error taxonomy for a tagging session.
//!
//! File-level errors (`UnsupportedOrCorruptFile`, `SaveFailed`) are recorded
//! against a single file and never abort a batch. Directory and input-stream
//! errors end the current directory run; `UserInterrupt` ends the session
//! cleanly.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TagfixError {
    #[error("Directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Cannot read directory {}: {reason}", path.display())]
    DirectoryUnreadable { path: PathBuf, reason: String },

    #[error("Cannot read {}: {reason}", path.display())]
    UnsupportedOrCorruptFile { path: PathBuf, reason: String },

    #[error("Failed to save {}: {reason}", path.display())]
    SaveFailed { path: PathBuf, reason: String },

    #[error("Invalid input: {0}")]
    InvalidMenuInput(String),

    #[error("Unusable cover image {}: {reason}", path.display())]
    InvalidCoverImage { path: PathBuf, reason: String },

    #[error("Interrupted by user")]
    UserInterrupt,

    #[error("Input stream closed")]
    InputClosed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TagfixError {
    /// True for errors that only re-prompt the user.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TagfixError::DirectoryNotFound(_)
                | TagfixError::NotADirectory(_)
                | TagfixError::DirectoryUnreadable { .. }
                | TagfixError::InvalidMenuInput(_)
                | TagfixError::InvalidCoverImage { .. }
        )
    }
}

impl From<dialoguer::Error> for TagfixError {
    fn from(err: dialoguer::Error) -> Self {
        let err: io::Error = err.into();
        match err.kind() {
            io::ErrorKind::Interrupted => TagfixError::UserInterrupt,
            io::ErrorKind::UnexpectedEof => TagfixError::InputClosed,
            _ => TagfixError::Io(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, TagfixError>;
