use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::{Image, MainImage};

/// Data for inserting an image row
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateImageDto {
    #[validate(length(max = 255, message = "name must not exceed 255 characters"))]
    pub name: Option<String>,

    /// Base64 text from `upload::encode`
    #[validate(length(min = 1, message = "name_base64 is required"))]
    pub name_base64: String,

    #[validate(range(min = 1, message = "category_id must be positive"))]
    pub category_id: i64,
}

/// Single-file upload form for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadImageDto {
    /// JPEG or PNG image
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Stored image record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageResponseDto {
    pub id: i64,
    pub name: Option<String>,
    pub name_base64: String,
    pub category_id: i64,
}

impl From<Image> for ImageResponseDto {
    fn from(image: Image) -> Self {
        Self {
            id: image.id,
            name: image.name,
            name_base64: image.name_base64,
            category_id: image.category_id,
        }
    }
}

/// Stored cover image record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MainImageResponseDto {
    pub id: i64,
    pub name: Option<String>,
    pub name_base64: String,
    pub category_id: i64,
}

impl From<MainImage> for MainImageResponseDto {
    fn from(image: MainImage) -> Self {
        Self {
            id: image.id,
            name: image.name,
            name_base64: image.name_base64,
            category_id: image.category_id,
        }
    }
}
