#[cfg(test)]
use std::{path::Path, str::FromStr, sync::Arc, time::Duration};

#[cfg(test)]
use axum::Router;
#[cfg(test)]
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
#[cfg(test)]
use tower_http::catch_panic::CatchPanicLayer;

#[cfg(test)]
use crate::core::{
    config::{DatabaseConfig, UploadConfig},
    database, middleware,
};
#[cfg(test)]
use crate::features::categories::{routes as categories_routes, CategoryService, ImageService};
#[cfg(test)]
use crate::modules::upload::UploadedFile;

/// Fresh in-memory database with migrations applied.
///
/// A single connection that never expires keeps the in-memory data alive.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await
        .unwrap();

    database::run_migrations(&pool).await.unwrap();
    pool
}

/// Migrated pool over a fresh on-disk database in `dir`.
///
/// Built like the production pool, so several connections can contend for
/// the write lock.
#[cfg(test)]
pub async fn file_pool(dir: &Path) -> SqlitePool {
    std::fs::create_dir_all(dir).unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}", dir.join("gallery.db").display()),
        max_connections: 10,
        min_connections: 1,
        acquire_timeout_secs: 30,
        idle_timeout_secs: 600,
        max_lifetime_secs: 1800,
        busy_timeout_secs: 5,
    };

    let pool = database::create_pool(&config).await.unwrap();
    database::run_migrations(&pool).await.unwrap();
    pool
}

/// Category routes over `pool`, layered like the production router
#[cfg(test)]
pub fn test_app(pool: SqlitePool) -> Router {
    categories_routes::routes(
        Arc::new(CategoryService::new(pool.clone())),
        Arc::new(ImageService::new(pool)),
        UploadConfig::default(),
    )
    .layer(CatchPanicLayer::custom(middleware::handle_panic))
}

#[cfg(test)]
pub fn png_upload(data: &[u8]) -> UploadedFile {
    UploadedFile::new(Some("valid.png".to_string()), "image/png", data.to_vec())
}
