//! Multipart form shared by the page and the JSON label endpoint.

use axum::extract::Multipart;
use tracing::{debug, warn};

use crate::core::language::Language;
use crate::core::upload::UploadedImage;
use crate::errors::{AppError, AppResult};

/// Fields submitted with an upload
#[derive(Debug, Default)]
pub struct LabelForm {
    /// `None` when the field was missing
    pub language: Option<Language>,
    pub advanced: bool,
    pub images: Vec<UploadedImage>,
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

/// Read the `language`, `advanced` and `images` fields
///
/// File parts without a filename and without content are what browsers send
/// when nothing was picked; they are skipped. More than `max_images` files is
/// rejected.
pub async fn read_label_form(mut multipart: Multipart, max_images: usize) -> AppResult<LabelForm> {
    let mut form = LabelForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "language" => {
                let value = field.text().await?;
                form.language = Some(Language::parse(&value).ok_or_else(|| {
                    AppError::BadRequest(format!("unknown language: {}", value.trim()))
                })?);
            }
            "advanced" => {
                let value = field.text().await?;
                form.advanced = is_truthy(&value);
            }
            "images" | "images[]" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;

                if filename.is_empty() && bytes.is_empty() {
                    continue;
                }
                if form.images.len() >= max_images {
                    return Err(AppError::TooManyImages {
                        max: max_images,
                        got: form.images.len() + 1,
                    });
                }

                debug!(
                    filename = %filename,
                    bytes = bytes.len(),
                    "Image received"
                );
                form.images.push(UploadedImage::new(filename, content_type, bytes));
            }
            other => {
                warn!(field = %other, "Ignoring unknown form field");
            }
        }
    }

    Ok(form)
}
