//! Image upload handling
//!
//! Reads multipart forms, gates uploads on their declared content type and
//! converts image bytes to and from the base64 text they are stored as.

mod form;
mod image_upload;

pub use form::UploadForm;
pub use image_upload::{encode, UploadedFile};
