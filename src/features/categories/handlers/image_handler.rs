use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppMultipart, AppPath};
use crate::features::categories::dtos::{
    CreateImageDto, DeleteResponseDto, ImageResponseDto, UploadImageDto,
};
use crate::features::categories::handlers::CategoryState;
use crate::modules::upload::{self, UploadForm};
use crate::shared::types::{ApiResponse, Meta};

/// Add an image to a category's gallery
///
/// Image content must be unique across all categories.
#[utoipa::path(
    post,
    path = "/category/image/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body(
        content = UploadImageDto,
        content_type = "multipart/form-data",
        description = "Gallery image",
    ),
    responses(
        (status = 200, description = "Image created", body = ApiResponse<ImageResponseDto>),
        (status = 400, description = "Unsupported image type or duplicate content"),
        (status = 404, description = "Category not found")
    ),
    tag = "images"
)]
pub async fn create_image(
    State(state): State<CategoryState>,
    AppPath(category_id): AppPath<i64>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<Json<ApiResponse<ImageResponseDto>>> {
    let mut form = UploadForm::read(&mut multipart, state.upload.max_upload_size).await?;
    let file = form.take_file()?;
    let base64_content = upload::encode(&file)?;

    if state
        .category_service
        .get_category_by_id(category_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound(format!(
            "Category {} not found",
            category_id
        )));
    }

    if state
        .image_service
        .check_image_by_base64(&base64_content)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Image with the same base64 string already exists".to_string(),
        ));
    }

    let dto = CreateImageDto {
        name: file.file_name,
        name_base64: base64_content,
        category_id,
    };
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let image = state.image_service.create_image(&dto).await?;

    Ok(Json(ApiResponse::success(
        Some(image.into()),
        Some("Image created successfully".to_string()),
        None,
    )))
}

/// Delete a gallery image
#[utoipa::path(
    delete,
    path = "/category/image/{id}",
    params(
        ("id" = i64, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image deleted", body = ApiResponse<DeleteResponseDto>),
        (status = 404, description = "Image not found")
    ),
    tag = "images"
)]
pub async fn delete_image(
    State(state): State<CategoryState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<DeleteResponseDto>>> {
    state.image_service.del_image(id).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteResponseDto { id, deleted: true }),
        Some(format!("Image {} deleted successfully", id)),
        None,
    )))
}

/// Get a gallery image by id
#[utoipa::path(
    get,
    path = "/category/image/{id}",
    params(
        ("id" = i64, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image found", body = ApiResponse<ImageResponseDto>),
        (status = 404, description = "Image not found")
    ),
    tag = "images"
)]
pub async fn get_image(
    State(state): State<CategoryState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ApiResponse<ImageResponseDto>>> {
    let image = state
        .image_service
        .get_image_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Image {} not found", id)))?;

    Ok(Json(ApiResponse::success(Some(image.into()), None, None)))
}

/// List the gallery images of a category
///
/// A category without images, or a missing category, is reported as 404.
#[utoipa::path(
    get,
    path = "/category/images/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Images of the category", body = ApiResponse<Vec<ImageResponseDto>>),
        (status = 404, description = "No images for this category")
    ),
    tag = "images"
)]
pub async fn list_images(
    State(state): State<CategoryState>,
    AppPath(category_id): AppPath<i64>,
) -> Result<Json<ApiResponse<Vec<ImageResponseDto>>>> {
    let images = state
        .image_service
        .get_images_by_category_id(category_id)
        .await?;

    if images.is_empty() {
        return Err(AppError::NotFound(format!(
            "Images for category {} not found",
            category_id
        )));
    }

    let dtos: Vec<ImageResponseDto> = images.into_iter().map(ImageResponseDto::from).collect();
    let meta = Meta::total(dtos.len());
    Ok(Json(ApiResponse::success(Some(dtos), None, Some(meta))))
}
