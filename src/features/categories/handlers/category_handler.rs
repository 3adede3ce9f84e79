use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::config::UploadConfig;
use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppMultipart, AppPath};
use crate::features::categories::dtos::{
    CategoryDetailDto, CategoryListItemDto, CategoryResponseDto, CreateCategoryDto,
    DeleteResponseDto, MainImageResponseDto, UploadCategoryDto, UploadImageDto,
};
use crate::features::categories::services::{CategoryService, ImageService};
use crate::modules::upload::{self, UploadForm};
use crate::shared::types::{ApiResponse, Meta};

/// State for category and image handlers
#[derive(Clone)]
pub struct CategoryState {
    pub category_service: Arc<CategoryService>,
    pub image_service: Arc<ImageService>,
    pub upload: UploadConfig,
}

/// Get a category with its cover image and gallery
#[utoipa::path(
    get,
    path = "/category/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryDetailDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(state): State<CategoryState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<CategoryDetailDto>>> {
    let category = state
        .category_service
        .get_category_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;

    let main_image = state
        .category_service
        .image_main_check_by_category_id(id)
        .await?;
    let images = state.image_service.get_image_by_category_id(id).await?;

    let detail = CategoryDetailDto::assemble(category, main_image, images);
    Ok(Json(ApiResponse::success(Some(detail), None, None)))
}

/// List all categories with their cover images
///
/// An empty store is reported as 404.
#[utoipa::path(
    get,
    path = "/categorys/",
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<Vec<CategoryListItemDto>>),
        (status = 404, description = "No categories exist")
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(state): State<CategoryState>,
) -> Result<Json<ApiResponse<Vec<CategoryListItemDto>>>> {
    let categories = state.category_service.get_categories().await?;
    if categories.is_empty() {
        return Err(AppError::NotFound("Categories not found".to_string()));
    }

    let mut items = Vec::with_capacity(categories.len());
    for category in categories {
        let main_image = state
            .category_service
            .image_main_check_by_category_id(category.id)
            .await?;
        items.push(CategoryListItemDto::new(category, main_image));
    }

    let meta = Meta::total(items.len());
    Ok(Json(ApiResponse::success(Some(items), None, Some(meta))))
}

/// Create a category together with its cover image
///
/// Accepts multipart/form-data with:
/// - `category_name`: unique name (required)
/// - `description`: free text (required)
/// - `skill`: tag, repeatable (also accepted as `skill[]`)
/// - `file`: JPEG or PNG cover image (required)
#[utoipa::path(
    post,
    path = "/category/",
    request_body(
        content = UploadCategoryDto,
        content_type = "multipart/form-data",
        description = "Category fields and cover image",
    ),
    responses(
        (status = 200, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Duplicate name, invalid form or unsupported image type")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(state): State<CategoryState>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let mut form = UploadForm::read(&mut multipart, state.upload.max_upload_size).await?;

    let dto = CreateCategoryDto {
        category_name: form.require_text("category_name")?,
        description: form.require_text("description")?,
        skill: form.texts("skill").to_vec(),
    };
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let file = form.take_file()?;

    let (category, main_image) = state
        .category_service
        .create_category_with_main_image(&dto, &file)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(CategoryResponseDto::new(category, Some(main_image))),
        Some("Category created successfully".to_string()),
        None,
    )))
}

/// Delete a category, its gallery and its cover image
#[utoipa::path(
    delete,
    path = "/category/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted", body = ApiResponse<DeleteResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(state): State<CategoryState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<DeleteResponseDto>>> {
    state.category_service.del_category(id).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteResponseDto { id, deleted: true }),
        Some(format!("Category {} deleted successfully", id)),
        None,
    )))
}

/// Set or replace the cover image of a category
#[utoipa::path(
    put,
    path = "/category/main-image/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body(
        content = UploadImageDto,
        content_type = "multipart/form-data",
        description = "New cover image",
    ),
    responses(
        (status = 200, description = "Cover image set", body = ApiResponse<MainImageResponseDto>),
        (status = 400, description = "Unsupported image type or duplicate content"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn change_main_image(
    State(state): State<CategoryState>,
    AppPath(id): AppPath<i64>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<Json<ApiResponse<MainImageResponseDto>>> {
    let mut form = UploadForm::read(&mut multipart, state.upload.max_upload_size).await?;
    let file = form.take_file()?;
    let base64_content = upload::encode(&file)?;

    let main_image = state
        .category_service
        .change_main_img(&base64_content, id)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(main_image.into()),
        Some("Main image updated successfully".to_string()),
        None,
    )))
}
