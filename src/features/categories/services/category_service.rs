use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CreateCategoryDto;
use crate::features::categories::models::{join_skills, Category, MainImage};
use crate::modules::upload::{self, UploadedFile};

/// Service for categories and their cover images
pub struct CategoryService {
    pool: SqlitePool,
}

impl CategoryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get category by id
    pub async fn get_category_by_id(&self, id: i64) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, category_name, title, description, skill, main_image_id
            FROM category
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category by id: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Get category by its unique name
    pub async fn get_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, category_name, title, description, skill, main_image_id
            FROM category
            WHERE category_name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get category by name: {:?}", e);
            AppError::Database(e)
        })
    }

    /// List all categories
    pub async fn get_categories(&self) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, category_name, title, description, skill, main_image_id
            FROM category
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Insert a category row.
    ///
    /// Runs on the caller's connection so it can join a transaction.
    pub async fn create_category(
        conn: &mut SqliteConnection,
        dto: &CreateCategoryDto,
    ) -> Result<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO category (category_name, description, skill)
            VALUES (?, ?, ?)
            RETURNING id, category_name, title, description, skill, main_image_id
            "#,
        )
        .bind(&dto.category_name)
        .bind(&dto.description)
        .bind(join_skills(&dto.skill))
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            AppError::from_write(e, || {
                format!("Category '{}' already exists", dto.category_name)
            })
        })
    }

    /// Insert a cover image row owned by `category_id`.
    ///
    /// Runs on the caller's connection so it can join a transaction.
    pub async fn create_main_image(
        conn: &mut SqliteConnection,
        name: Option<&str>,
        base64_content: &str,
        category_id: i64,
    ) -> Result<MainImage> {
        sqlx::query_as::<_, MainImage>(
            r#"
            INSERT INTO image_main (name, name_base64, category_id)
            VALUES (?, ?, ?)
            RETURNING id, name, name_base64, category_id
            "#,
        )
        .bind(name)
        .bind(base64_content)
        .bind(category_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            AppError::from_write(e, || {
                "Main image with the same content already exists".to_string()
            })
        })
    }

    /// Get the cover image of a category, if it has one
    pub async fn image_main_check_by_category_id(&self, id: i64) -> Result<Option<MainImage>> {
        let mut conn = self.pool.acquire().await?;
        Self::find_main_image(&mut conn, id).await
    }

    /// Create a category together with its cover image.
    ///
    /// The name pre-check is not atomic with the insert; a concurrent insert of
    /// the same name still surfaces as `Conflict` from the unique constraint.
    pub async fn create_category_with_main_image(
        &self,
        dto: &CreateCategoryDto,
        file: &UploadedFile,
    ) -> Result<(Category, MainImage)> {
        if self.get_category_by_name(&dto.category_name).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                dto.category_name
            )));
        }

        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let category = Self::create_category(&mut tx, dto).await?;

        // Dropping `tx` on any error below rolls the category back
        let base64_content = upload::encode(file)?;

        let main_image = Self::create_main_image(
            &mut tx,
            file.file_name.as_deref(),
            &base64_content,
            category.id,
        )
        .await?;

        let category = Self::set_main_image_id(&mut tx, category.id, main_image.id).await?;

        tx.commit().await?;

        info!(
            "Category created: id={}, name={}, main_image_id={}",
            category.id, category.category_name, main_image.id
        );

        Ok((category, main_image))
    }

    /// Replace the cover image content, creating the cover image if missing.
    ///
    /// The write lock is taken at `BEGIN`, so concurrent callers queue on the
    /// busy timeout and the last one to commit wins.
    pub async fn change_main_img(&self, base64_content: &str, category_id: i64) -> Result<MainImage> {
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        if !Self::category_exists(&mut tx, category_id).await? {
            return Err(AppError::NotFound(format!(
                "Category {} not found",
                category_id
            )));
        }

        let main_image = match Self::find_main_image(&mut tx, category_id).await? {
            Some(existing) => {
                debug!(
                    "Overwriting main image {} of category {}",
                    existing.id, category_id
                );
                sqlx::query_as::<_, MainImage>(
                    r#"
                    UPDATE image_main
                    SET name_base64 = ?
                    WHERE id = ?
                    RETURNING id, name, name_base64, category_id
                    "#,
                )
                .bind(base64_content)
                .bind(existing.id)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    AppError::from_write(e, || {
                        "Main image with the same content already exists".to_string()
                    })
                })?
            }
            None => Self::create_main_image(&mut tx, None, base64_content, category_id).await?,
        };

        Self::set_main_image_id(&mut tx, category_id, main_image.id).await?;

        tx.commit().await?;

        info!(
            "Main image set: category_id={}, main_image_id={}",
            category_id, main_image.id
        );

        Ok(main_image)
    }

    /// Delete a category; its images and cover image go with it
    pub async fn del_category(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM category WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete category: {:?}", e);
                AppError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Category {} not found", id)));
        }

        info!("Category deleted: id={}", id);

        Ok(())
    }

    async fn category_exists(conn: &mut SqliteConnection, id: i64) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM category WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(found.is_some())
    }

    async fn find_main_image(
        conn: &mut SqliteConnection,
        category_id: i64,
    ) -> Result<Option<MainImage>> {
        sqlx::query_as::<_, MainImage>(
            r#"
            SELECT id, name, name_base64, category_id
            FROM image_main
            WHERE category_id = ?
            "#,
        )
        .bind(category_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get main image: {:?}", e);
            AppError::Database(e)
        })
    }

    async fn set_main_image_id(
        conn: &mut SqliteConnection,
        category_id: i64,
        main_image_id: i64,
    ) -> Result<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE category
            SET main_image_id = ?
            WHERE id = ?
            RETURNING id, category_name, title, description, skill, main_image_id
            "#,
        )
        .bind(main_image_id)
        .bind(category_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(AppError::Database)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::shared::test_helpers::{file_pool, png_upload, test_pool};

    fn dto(name: &str) -> CreateCategoryDto {
        CreateCategoryDto {
            category_name: name.to_string(),
            description: "test".to_string(),
            skill: vec!["happy".to_string()],
        }
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_with_main_image_links_both_rows() {
        let pool = test_pool().await;
        let service = CategoryService::new(pool.clone());
        let file = png_upload(b"smiling-cover");

        let (category, main_image) = service
            .create_category_with_main_image(&dto("Smiling"), &file)
            .await
            .unwrap();

        assert_eq!(category.id, 1);
        assert_eq!(category.main_image_id, Some(main_image.id));
        assert_eq!(category.skills(), vec!["happy".to_string()]);
        assert_eq!(main_image.category_id, category.id);
        assert_eq!(main_image.name.as_deref(), Some("valid.png"));
        assert_eq!(main_image.name_base64, upload::encode(&file).unwrap());

        let found = service
            .image_main_check_by_category_id(category.id)
            .await
            .unwrap()
            .expect("main image");
        assert_eq!(found.id, main_image.id);
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts_regardless_of_fields() {
        let pool = test_pool().await;
        let service = CategoryService::new(pool.clone());
        service
            .create_category_with_main_image(&dto("Smiling"), &png_upload(b"first"))
            .await
            .unwrap();

        let other = CreateCategoryDto {
            category_name: "Smiling".to_string(),
            description: "something else".to_string(),
            skill: vec![],
        };
        let err = service
            .create_category_with_main_image(&other, &png_upload(b"second"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // The unique constraint catches inserts that skip the pre-check
        let mut conn = pool.acquire().await.unwrap();
        let err = CategoryService::create_category(&mut conn, &other)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        drop(conn);

        assert_eq!(count(&pool, "category").await, 1);
    }

    #[tokio::test]
    async fn test_bad_image_type_leaves_no_rows() {
        let pool = test_pool().await;
        let service = CategoryService::new(pool.clone());
        let gif = UploadedFile::new(Some("a.gif".to_string()), "image/gif", b"GIF89a".to_vec());

        let err = service
            .create_category_with_main_image(&dto("Smiling"), &gif)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(count(&pool, "category").await, 0);
        assert_eq!(count(&pool, "image_main").await, 0);
        assert!(service.get_category_by_name("Smiling").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_change_main_img_twice_keeps_one_row() {
        let pool = test_pool().await;
        let service = CategoryService::new(pool.clone());
        let mut conn = pool.acquire().await.unwrap();
        let category = CategoryService::create_category(&mut conn, &dto("Bare"))
            .await
            .unwrap();
        drop(conn);

        let first = service.change_main_img("Zmlyc3Q=", category.id).await.unwrap();
        let second = service
            .change_main_img("c2Vjb25k", category.id)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name_base64, "c2Vjb25k");
        assert_eq!(count(&pool, "image_main").await, 1);

        let category = service
            .get_category_by_id(category.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(category.main_image_id, Some(second.id));
    }

    #[tokio::test]
    async fn test_change_main_img_missing_category() {
        let service = CategoryService::new(test_pool().await);
        let err = service.change_main_img("eA==", 999).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_change_main_img_last_write_wins() {
        let dir = std::env::temp_dir().join(format!("category-gallery-{}", uuid::Uuid::now_v7()));
        let pool = file_pool(&dir).await;
        let service = Arc::new(CategoryService::new(pool.clone()));
        let (category, _) = service
            .create_category_with_main_image(&dto("Busy"), &png_upload(b"busy"))
            .await
            .unwrap();
        let category_id = category.id;

        let handles: Vec<_> = (0..40)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .change_main_img(&format!("cover-{}", i), category_id)
                        .await
                })
            })
            .collect();

        let mut written = Vec::new();
        for handle in handles {
            let main_image = handle.await.unwrap().expect("every writer succeeds");
            written.push(main_image.name_base64);
        }

        assert_eq!(count(&pool, "image_main").await, 1);
        let current = service
            .image_main_check_by_category_id(category_id)
            .await
            .unwrap()
            .expect("main image");
        assert!(written.contains(&current.name_base64));

        pool.close().await;
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_main_image_content_is_globally_unique() {
        let pool = test_pool().await;
        let service = CategoryService::new(pool.clone());
        let mut conn = pool.acquire().await.unwrap();
        let a = CategoryService::create_category(&mut conn, &dto("A")).await.unwrap();
        let b = CategoryService::create_category(&mut conn, &dto("B")).await.unwrap();
        CategoryService::create_main_image(&mut conn, None, "c2FtZQ==", a.id)
            .await
            .unwrap();
        drop(conn);

        let err = service.change_main_img("c2FtZQ==", b.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_del_category_cascades_main_image() {
        let pool = test_pool().await;
        let service = CategoryService::new(pool.clone());
        let (category, _) = service
            .create_category_with_main_image(&dto("Gone"), &png_upload(b"gone"))
            .await
            .unwrap();

        service.del_category(category.id).await.unwrap();

        assert!(service.get_category_by_id(category.id).await.unwrap().is_none());
        assert!(service
            .image_main_check_by_category_id(category.id)
            .await
            .unwrap()
            .is_none());
        assert_eq!(count(&pool, "image_main").await, 0);

        let err = service.del_category(category.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_categories_in_id_order() {
        let pool = test_pool().await;
        let service = CategoryService::new(pool.clone());
        assert!(service.get_categories().await.unwrap().is_empty());

        for (i, name) in ["One", "Two", "Three"].iter().enumerate() {
            service
                .create_category_with_main_image(&dto(name), &png_upload(&[i as u8; 4]))
                .await
                .unwrap();
        }

        let names: Vec<String> = service
            .get_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.category_name)
            .collect();
        assert_eq!(names, ["One", "Two", "Three"]);
    }
}
