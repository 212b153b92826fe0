//! Meal image intake
//!
//! Accepts anything whose magic bytes sniff as an `image/*` format. Only the
//! header is decoded (for dimensions); pixel content is never inspected.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Accepted MIME prefix
pub const ACCEPTED_MIME_PREFIX: &str = "image/";

/// Errors while reading an uploaded image
#[derive(Debug, Error)]
pub enum ImageReadError {
    /// The file could not be read
    #[error("Failed to read image at {path}: {source}")]
    Io {
        /// Path that was attempted
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Zero-length upload
    #[error("Image is empty")]
    Empty,

    /// Upload exceeds the configured cap
    #[error("Image is {size} bytes (max: {limit})")]
    TooLarge {
        /// Upload size in bytes
        size: u64,
        /// Configured maximum
        limit: u64,
    },

    /// Bytes do not sniff as an `image/*` format
    #[error("Not an image: {0}")]
    NotAnImage(String),

    /// Header could not be decoded
    #[error("Failed to decode image header: {0}")]
    Decode(String),
}

/// Display metadata for a loaded image
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSummary {
    /// Original file name
    pub file_name: String,
    /// Sniffed MIME type
    pub mime: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Size in bytes
    pub byte_len: usize,
}

/// A validated meal photo
#[derive(Clone)]
pub struct MealImage {
    file_name: String,
    mime: &'static str,
    width: u32,
    height: u32,
    bytes: Arc<[u8]>,
}

impl std::fmt::Debug for MealImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MealImage")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("byte_len", &self.bytes.len())
            .finish()
    }
}

impl MealImage {
    /// Validate raw upload bytes
    ///
    /// # Errors
    ///
    /// Returns [`ImageReadError`] when the bytes are empty, over `max_bytes`,
    /// not an `image/*` format, or have an undecodable header.
    pub fn from_bytes(
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        max_bytes: u64,
    ) -> Result<Self, ImageReadError> {
        if bytes.is_empty() {
            return Err(ImageReadError::Empty);
        }
        let size = bytes.len() as u64;
        if size > max_bytes {
            return Err(ImageReadError::TooLarge {
                size,
                limit: max_bytes,
            });
        }

        let format =
            image::guess_format(&bytes).map_err(|e| ImageReadError::NotAnImage(e.to_string()))?;
        let mime = format.to_mime_type();
        if !mime.starts_with(ACCEPTED_MIME_PREFIX) {
            return Err(ImageReadError::NotAnImage(mime.to_string()));
        }

        let (width, height) = image::ImageReader::with_format(Cursor::new(&bytes[..]), format)
            .into_dimensions()
            .map_err(|e| ImageReadError::Decode(e.to_string()))?;

        Ok(Self {
            file_name: file_name.into(),
            mime,
            width,
            height,
            bytes: bytes.into(),
        })
    }

    /// Read and validate an image file
    ///
    /// # Errors
    ///
    /// Returns [`ImageReadError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`MealImage::from_bytes`].
    pub async fn from_path(path: impl AsRef<Path>, max_bytes: u64) -> Result<Self, ImageReadError> {
        let path = path.as_ref();
        let io_err = |source| ImageReadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let size = tokio::fs::metadata(path).await.map_err(io_err)?.len();
        if size > max_bytes {
            return Err(ImageReadError::TooLarge {
                size,
                limit: max_bytes,
            });
        }
        let bytes = tokio::fs::read(path).await.map_err(io_err)?;

        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self::from_bytes(file_name, bytes, max_bytes)
    }

    /// Original file name
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Sniffed MIME type
    #[must_use]
    pub fn mime(&self) -> &str {
        self.mime
    }

    /// Pixel dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw bytes
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Inline `data:` URL for surfaces that display images
    #[must_use]
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Display metadata
    #[must_use]
    pub fn summary(&self) -> ImageSummary {
        ImageSummary {
            file_name: self.file_name.clone(),
            mime: self.mime.to_string(),
            width: self.width,
            height: self.height,
            byte_len: self.bytes.len(),
        }
    }
}
