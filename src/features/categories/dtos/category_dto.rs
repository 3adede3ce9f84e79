use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::features::categories::models::{Category, ImageContent, MainImage};

/// Longest accepted single skill tag
const MAX_SKILL_LENGTH: usize = 100;

/// Validated fields of the category creation form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, max = 255, message = "category_name must be 1-255 characters"))]
    pub category_name: String,

    #[validate(length(max = 5000, message = "description must not exceed 5000 characters"))]
    pub description: String,

    #[validate(custom(function = "validate_skills"))]
    pub skill: Vec<String>,
}

fn validate_skills(skills: &[String]) -> Result<(), ValidationError> {
    if skills.iter().any(|s| s.trim().len() > MAX_SKILL_LENGTH) {
        let mut err = ValidationError::new("skill_length");
        err.message = Some(format!("each skill must not exceed {} characters", MAX_SKILL_LENGTH).into());
        return Err(err);
    }
    Ok(())
}

/// Category creation form for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler reads the multipart body directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadCategoryDto {
    #[schema(example = "Smiling")]
    pub category_name: String,
    #[schema(example = "test")]
    pub description: String,
    /// Repeat the field (or send `skill[]`) for several tags
    #[schema(example = json!(["happy"]))]
    pub skill: Vec<String>,
    /// Cover image, JPEG or PNG
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Category returned right after creation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i64,
    pub category_name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub skill: Vec<String>,
    pub main_image_id: Option<i64>,
    /// Base64 content of the cover image
    pub main_image: Option<String>,
}

impl CategoryResponseDto {
    pub fn new(category: Category, main_image: Option<MainImage>) -> Self {
        let skill = category.skills();
        Self {
            id: category.id,
            category_name: category.category_name,
            title: category.title,
            description: category.description,
            skill,
            main_image_id: category.main_image_id,
            main_image: main_image.map(|m| m.name_base64),
        }
    }
}

/// Image embedded in a category detail
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryImageDto {
    pub id: i64,
    pub image_base64: String,
}

impl From<ImageContent> for CategoryImageDto {
    fn from(image: ImageContent) -> Self {
        Self {
            id: image.id,
            image_base64: image.name_base64,
        }
    }
}

/// Category with its cover image and gallery
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDetailDto {
    pub id: i64,
    pub category_name: String,
    pub title: Option<String>,
    pub main_image: Option<String>,
    pub description: Option<String>,
    pub skill: Vec<String>,
    pub images: Vec<CategoryImageDto>,
}

impl CategoryDetailDto {
    pub fn assemble(
        category: Category,
        main_image: Option<MainImage>,
        images: Vec<ImageContent>,
    ) -> Self {
        let skill = category.skills();
        Self {
            id: category.id,
            category_name: category.category_name,
            title: category.title,
            main_image: main_image.map(|m| m.name_base64),
            description: category.description,
            skill,
            images: images.into_iter().map(CategoryImageDto::from).collect(),
        }
    }
}

/// Entry of the category list
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryListItemDto {
    pub id: i64,
    pub category_name: String,
    pub main_image: Option<String>,
}

impl CategoryListItemDto {
    pub fn new(category: Category, main_image: Option<MainImage>) -> Self {
        Self {
            id: category.id,
            category_name: category.category_name,
            main_image: main_image.map(|m| m.name_base64),
        }
    }
}

/// Response DTO for delete operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponseDto {
    pub id: i64,
    pub deleted: bool,
}
