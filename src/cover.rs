//! Local cover images embedded as the front cover of every file in a run.

use crate::constants::COVER_EXTENSIONS;
use crate::error::{Result, TagfixError};
use crate::scanner::clean_path_input;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Bmp,
    Gif,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "bmp" => Some(ImageFormat::Bmp),
            "gif" => Some(ImageFormat::Gif),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Whether `data` starts with this format's magic bytes.
    pub fn matches_signature(self, data: &[u8]) -> bool {
        match self {
            ImageFormat::Jpeg => data.starts_with(&[0xFF, 0xD8, 0xFF]),
            ImageFormat::Png => data.starts_with(b"\x89PNG\r\n\x1a\n"),
            ImageFormat::Bmp => data.starts_with(b"BM"),
            ImageFormat::Gif => data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a"),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
            ImageFormat::Bmp => "BMP",
            ImageFormat::Gif => "GIF",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverImage {
    pub path: PathBuf,
    pub format: ImageFormat,
    pub data: Vec<u8>,
}

impl CoverImage {
    /// Load an image named by typed input.
    ///
    /// Every rejection is an `InvalidCoverImage`, which callers treat as
    /// "ask again".
    pub fn load(input: &str) -> Result<CoverImage> {
        let path = clean_path_input(input);
        let invalid = |reason: String| TagfixError::InvalidCoverImage {
            path: path.clone(),
            reason,
        };

        if !path.is_file() {
            return Err(invalid("file not found".to_string()));
        }
        let format = ImageFormat::from_path(&path).ok_or_else(|| {
            invalid(format!(
                "unsupported image format, use {}",
                COVER_EXTENSIONS.join("/")
            ))
        })?;
        let data = fs::read(&path).map_err(|e| invalid(e.to_string()))?;
        if !format.matches_signature(&data) {
            return Err(invalid(format!("contents are not a {format} image")));
        }

        log::debug!("Loaded {format} cover {} ({} bytes)", path.display(), data.len());
        Ok(CoverImage { path, format, data })
    }

    pub fn size_kb(&self) -> usize {
        self.data.len().div_ceil(1024)
    }
}
