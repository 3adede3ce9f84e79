use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::core::config::UploadConfig;
use crate::features::categories::handlers::{self, CategoryState};
use crate::features::categories::services::{CategoryService, ImageService};

/// Create routes for the categories feature
///
/// Upload routes accept bodies up to the configured image size plus
/// multipart overhead.
pub fn routes(
    category_service: Arc<CategoryService>,
    image_service: Arc<ImageService>,
    upload: UploadConfig,
) -> Router {
    let body_limit = DefaultBodyLimit::max(upload.body_limit());
    let state = CategoryState {
        category_service,
        image_service,
        upload,
    };

    Router::new()
        .route("/categorys/", get(handlers::list_categories))
        .route(
            "/category/",
            post(handlers::create_category).layer(body_limit.clone()),
        )
        .route(
            "/category/{id}",
            get(handlers::get_category).delete(handlers::delete_category),
        )
        .route(
            "/category/main-image/{id}",
            put(handlers::change_main_image).layer(body_limit.clone()),
        )
        .route(
            "/category/image/{id}",
            post(handlers::create_image)
                .layer(body_limit)
                .get(handlers::get_image)
                .delete(handlers::delete_image),
        )
        .route("/category/images/{id}", get(handlers::list_images))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use base64::prelude::*;
    use fake::{faker::lorem::en::Word, Fake};
    use serde_json::Value;

    use crate::shared::test_helpers::{test_app, test_pool};

    const VALID_PNG: &[u8] = b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR-valid";

    async fn server() -> TestServer {
        TestServer::new(test_app(test_pool().await)).expect("test server")
    }

    fn file_part(bytes: &[u8], file_name: &str, mime: &str) -> Part {
        Part::bytes(bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_type(mime.to_string())
    }

    fn category_form(name: &str, bytes: &[u8], mime: &str) -> MultipartForm {
        MultipartForm::new()
            .add_text("category_name", name.to_string())
            .add_text("description", "test")
            .add_text("skill", "happy")
            .add_part("file", file_part(bytes, "valid.png", mime))
    }

    fn image_form(bytes: &[u8], mime: &str) -> MultipartForm {
        MultipartForm::new().add_part("file", file_part(bytes, "extra.png", mime))
    }

    #[tokio::test]
    async fn test_create_then_fetch_category() {
        let server = server().await;
        let expected = BASE64_STANDARD.encode(VALID_PNG);

        let response = server
            .post("/category/")
            .multipart(category_form("Smiling", VALID_PNG, "image/png"))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["data"]["skill"], serde_json::json!(["happy"]));
        assert_eq!(body["data"]["main_image"], expected.as_str());

        let response = server.get("/category/1").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["category_name"], "Smiling");
        assert_eq!(body["data"]["description"], "test");
        assert_eq!(body["data"]["main_image"], expected.as_str());
        assert_eq!(body["data"]["skill"], serde_json::json!(["happy"]));
        assert_eq!(body["data"]["images"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_accepts_repeated_skills() {
        let server = server().await;
        let form = MultipartForm::new()
            .add_text("category_name", "Moods")
            .add_text("description", "several tags")
            .add_text("skill[]", "happy")
            .add_text("skill[]", "sad")
            .add_part("file", file_part(b"moods", "moods.jpg", "image/jpeg"));

        let response = server.post("/category/").multipart(form).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["skill"], serde_json::json!(["happy", "sad"]));
    }

    #[tokio::test]
    async fn test_duplicate_category_name_is_rejected() {
        let server = server().await;
        let name: String = Word().fake();

        server
            .post("/category/")
            .multipart(category_form(&name, b"first", "image/png"))
            .await
            .assert_status_ok();

        let response = server
            .post("/category/")
            .multipart(category_form(&name, b"second", "image/jpeg"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_image_type_without_partial_rows() {
        let server = server().await;

        let response = server
            .post("/category/")
            .multipart(category_form("Smiling", b"GIF89a", "image/gif"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        server.get("/categorys/").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let server = server().await;
        let form = MultipartForm::new()
            .add_text("description", "no name")
            .add_part("file", file_part(VALID_PNG, "valid.png", "image/png"));

        server
            .post("/category/")
            .multipart(form)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_categories() {
        let server = server().await;
        server.get("/categorys/").await.assert_status_not_found();

        server
            .post("/category/")
            .multipart(category_form("Smiling", VALID_PNG, "image/png"))
            .await
            .assert_status_ok();

        let response = server.get("/categorys/").await;
        response.assert_status_ok();
        let body: Value = response.json();
        let items = body["data"].as_array().expect("array");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["category_name"], "Smiling");
        assert_eq!(items[0]["main_image"], BASE64_STANDARD.encode(VALID_PNG).as_str());
        assert!(items[0].get("skill").is_none());
        assert_eq!(body["meta"]["total"], 1);
    }

    #[tokio::test]
    async fn test_missing_and_malformed_ids() {
        let server = server().await;
        server.get("/category/42").await.assert_status_not_found();
        server.delete("/category/42").await.assert_status_not_found();
        server.get("/category/image/42").await.assert_status_not_found();
        server.delete("/category/image/42").await.assert_status_not_found();
        server.get("/category/images/42").await.assert_status_not_found();
        server
            .get("/category/not-a-number")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_add_image_to_missing_category() {
        let server = server().await;

        server
            .post("/category/image/999")
            .multipart(image_form(VALID_PNG, "image/png"))
            .await
            .assert_status_not_found();

        server.get("/category/image/1").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_image_lifecycle() {
        let server = server().await;
        server
            .post("/category/")
            .multipart(category_form("Smiling", VALID_PNG, "image/png"))
            .await
            .assert_status_ok();

        let response = server
            .post("/category/image/1")
            .multipart(image_form(b"gallery-one", "image/png"))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Image created successfully");
        let image_id = body["data"]["id"].as_i64().expect("image id");

        // Same content again, in any category, is a conflict
        server
            .post("/category/image/1")
            .multipart(image_form(b"gallery-one", "image/png"))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/category/image/1")
            .multipart(image_form(b"gallery-two", "image/gif"))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let response = server.get(&format!("/category/image/{}", image_id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["name"], "extra.png");
        assert_eq!(body["data"]["category_id"], 1);
        assert_eq!(
            body["data"]["name_base64"],
            BASE64_STANDARD.encode(b"gallery-one").as_str()
        );

        let response = server.get("/category/images/1").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

        let response = server.get("/category/1").await;
        let body: Value = response.json();
        assert_eq!(body["data"]["images"][0]["id"], image_id);
        assert_eq!(
            body["data"]["images"][0]["image_base64"],
            BASE64_STANDARD.encode(b"gallery-one").as_str()
        );

        server
            .delete(&format!("/category/image/{}", image_id))
            .await
            .assert_status_ok();
        server.get("/category/images/1").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn test_change_main_image() {
        let server = server().await;
        server
            .post("/category/")
            .multipart(category_form("Smiling", VALID_PNG, "image/png"))
            .await
            .assert_status_ok();

        for content in [&b"cover-two"[..], &b"cover-three"[..]] {
            server
                .put("/category/main-image/1")
                .multipart(image_form(content, "image/jpeg"))
                .await
                .assert_status_ok();
        }

        let body: Value = server.get("/category/1").await.json();
        assert_eq!(
            body["data"]["main_image"],
            BASE64_STANDARD.encode(b"cover-three").as_str()
        );

        server
            .put("/category/main-image/1")
            .multipart(image_form(b"cover-four", "text/plain"))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .put("/category/main-image/999")
            .multipart(image_form(b"cover-five", "image/png"))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_delete_category_removes_owned_images() {
        let server = server().await;
        server
            .post("/category/")
            .multipart(category_form("Smiling", VALID_PNG, "image/png"))
            .await
            .assert_status_ok();
        let body: Value = server
            .post("/category/image/1")
            .multipart(image_form(b"owned", "image/png"))
            .await
            .json();
        let image_id = body["data"]["id"].as_i64().expect("image id");

        server.delete("/category/1").await.assert_status_ok();

        server.get("/category/1").await.assert_status_not_found();
        server
            .get(&format!("/category/image/{}", image_id))
            .await
            .assert_status_not_found();

        // The cover image content is free again once its category is gone
        server
            .post("/category/")
            .multipart(category_form("Smiling", VALID_PNG, "image/png"))
            .await
            .assert_status_ok();
    }
}
