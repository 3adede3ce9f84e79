use sqlx::SqlitePool;
use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CreateImageDto;
use crate::features::categories::models::{Image, ImageContent};

/// Service for the additional images of a category
pub struct ImageService {
    pool: SqlitePool,
}

impl ImageService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get image by id
    pub async fn get_image_by_id(&self, id: i64) -> Result<Option<Image>> {
        sqlx::query_as::<_, Image>(
            r#"
            SELECT id, name, name_base64, category_id
            FROM image
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get image by id: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Id and content of every image of a category, for the category detail
    pub async fn get_image_by_category_id(&self, category_id: i64) -> Result<Vec<ImageContent>> {
        sqlx::query_as::<_, ImageContent>(
            r#"
            SELECT id, name_base64
            FROM image
            WHERE category_id = ?
            ORDER BY id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get image contents by category: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Full records of every image of a category
    pub async fn get_images_by_category_id(&self, category_id: i64) -> Result<Vec<Image>> {
        sqlx::query_as::<_, Image>(
            r#"
            SELECT id, name, name_base64, category_id
            FROM image
            WHERE category_id = ?
            ORDER BY id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get images by category: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Find an image with exactly this content, in any category
    pub async fn check_image_by_base64(&self, content: &str) -> Result<Option<Image>> {
        sqlx::query_as::<_, Image>(
            r#"
            SELECT id, name, name_base64, category_id
            FROM image
            WHERE name_base64 = ?
            "#,
        )
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check image content: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Insert an image row.
    ///
    /// A category that no longer exists is reported as `NotFound`.
    pub async fn create_image(&self, dto: &CreateImageDto) -> Result<Image> {
        let image = sqlx::query_as::<_, Image>(
            r#"
            INSERT INTO image (name, name_base64, category_id)
            VALUES (?, ?, ?)
            RETURNING id, name, name_base64, category_id
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.name_base64)
        .bind(dto.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                AppError::NotFound(format!("Category {} not found", dto.category_id))
            }
            _ => AppError::from_write(e, || {
                "Image with the same base64 string already exists".to_string()
            }),
        })?;

        info!(
            "Image created: id={}, category_id={}, size={}",
            image.id,
            image.category_id,
            image.name_base64.len()
        );

        Ok(image)
    }

    /// Delete an image by id
    pub async fn del_image(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM image WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete image: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Image {} not found", id)));
        }

        info!("Image deleted: id={}", id);

        Ok(())
    }
}
