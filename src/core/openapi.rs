use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        categories_handlers::category_handler::get_category,
        categories_handlers::category_handler::list_categories,
        categories_handlers::category_handler::create_category,
        categories_handlers::category_handler::delete_category,
        categories_handlers::category_handler::change_main_image,
        // Images
        categories_handlers::image_handler::create_image,
        categories_handlers::image_handler::delete_image,
        categories_handlers::image_handler::get_image,
        categories_handlers::image_handler::list_images,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            categories_dtos::UploadCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryDetailDto,
            categories_dtos::CategoryImageDto,
            categories_dtos::CategoryListItemDto,
            categories_dtos::DeleteResponseDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<categories_dtos::CategoryDetailDto>,
            ApiResponse<Vec<categories_dtos::CategoryListItemDto>>,
            ApiResponse<categories_dtos::DeleteResponseDto>,
            // Images
            categories_dtos::UploadImageDto,
            categories_dtos::ImageResponseDto,
            categories_dtos::MainImageResponseDto,
            ApiResponse<categories_dtos::ImageResponseDto>,
            ApiResponse<Vec<categories_dtos::ImageResponseDto>>,
            ApiResponse<categories_dtos::MainImageResponseDto>,
        )
    ),
    tags(
        (name = "categories", description = "Categories and their cover images"),
        (name = "images", description = "Gallery images owned by a category"),
    ),
    info(
        title = "Category Gallery API",
        version = "0.1.0",
        description = "Categories with base64-encoded cover and gallery images",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
