//! Uploaded label images: acceptance rules, decoding and previews.

use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, ImageReader};

/// File extensions offered by the upload control
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Errors raised while turning an upload into pixels
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("unsupported file type: {0} (accepted: jpg, jpeg, png)")]
    UnsupportedType(String),
    #[error("uploaded file is empty")]
    Empty,
    #[error("unrecognized image data")]
    UnrecognizedFormat,
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to decode image: {0}")]
    Decode(String),
}

/// Whether a filename carries one of the accepted extensions
pub fn is_accepted_filename(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// One file as received from the upload control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// A decoded label image
#[derive(Debug, Clone)]
pub struct LabelImage {
    pub image: DynamicImage,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl UploadedImage {
    pub fn new(
        filename: impl Into<String>,
        content_type: Option<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Decode the upload into pixels
    ///
    /// The extension must be accepted and the sniffed content must be JPEG
    /// or PNG; the extension alone is not trusted.
    pub fn decode(&self) -> Result<LabelImage, ImageError> {
        if !is_accepted_filename(&self.filename) {
            return Err(ImageError::UnsupportedType(self.filename.clone()));
        }
        if self.bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let reader = ImageReader::new(Cursor::new(self.bytes.as_ref()))
            .with_guessed_format()
            .map_err(|e| ImageError::Decode(e.to_string()))?;

        let format = reader.format().ok_or(ImageError::UnrecognizedFormat)?;
        if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
            return Err(ImageError::UnsupportedFormat(format!("{format:?}")));
        }

        let image = reader
            .decode()
            .map_err(|e| ImageError::Decode(e.to_string()))?;

        Ok(LabelImage {
            width: image.width(),
            height: image.height(),
            image,
            format,
        })
    }

    /// MIME type for the preview, preferring sniffed content over the client's claim
    pub fn mime_type(&self) -> String {
        image::guess_format(&self.bytes)
            .map(|format| format.to_mime_type().to_string())
            .ok()
            .or_else(|| self.content_type.clone())
            .unwrap_or_else(|| "application/octet-stream".to_string())
    }

    /// `data:` URI used to show the upload next to its summary
    pub fn preview_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type(),
            BASE64.encode(&self.bytes)
        )
    }
}
