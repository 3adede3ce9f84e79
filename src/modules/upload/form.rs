use std::collections::HashMap;

use axum::extract::Multipart;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::modules::upload::UploadedFile;

/// Name of the multipart part carrying the image
const FILE_FIELD: &str = "file";

/// Text fields and the image part drained from a multipart body
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, Vec<String>>,
    file: Option<UploadedFile>,
}

impl UploadForm {
    /// Drain a multipart body.
    ///
    /// Repeated text fields keep their order; `skill[]` and `skill` name the
    /// same field. A `file` part larger than `max_file_size` is rejected.
    pub async fn read(multipart: &mut Multipart, max_file_size: usize) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            debug!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read multipart data: {}", e))
        })? {
            let field_name = field
                .name()
                .unwrap_or("")
                .trim_end_matches("[]")
                .to_string();

            if field_name == FILE_FIELD {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field.file_name().map(|s| s.to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                if data.len() > max_file_size {
                    return Err(AppError::BadRequest(format!(
                        "File too large. Maximum size is {} bytes",
                        max_file_size
                    )));
                }

                form.file = Some(UploadedFile::new(file_name, &content_type, data.to_vec()));
            } else if !field_name.is_empty() {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field '{}': {}", field_name, e))
                })?;
                form.fields.entry(field_name).or_default().push(text);
            } else {
                debug!("Ignoring unnamed multipart field");
            }
        }

        Ok(form)
    }

    /// First value of a text field
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// First value of a text field that the form must carry
    pub fn require_text(&self, name: &str) -> Result<String> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation(format!("{} is required", name)))
    }

    /// All values of a repeated text field, in submission order
    pub fn texts(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Take the uploaded file, failing if the form carried none
    pub fn take_file(&mut self) -> Result<UploadedFile> {
        self.file
            .take()
            .ok_or_else(|| AppError::Validation("File is required".to_string()))
    }
}
