use axum::{
    extract::{FromRequest, FromRequestParts, Multipart, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// Path extractor that reports malformed ids through `AppError`
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(AppError::BadRequest(format!(
                "Invalid path parameter: {}",
                rejection.body_text()
            ))),
        }
    }
}

/// Multipart extractor with consistent error responses
pub struct AppMultipart(pub Multipart);

impl<S> FromRequest<S> for AppMultipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Multipart::from_request(req, state).await {
            Ok(multipart) => Ok(Self(multipart)),
            Err(rejection) => Err(AppError::BadRequest(format!(
                "Invalid multipart body: {}",
                rejection.body_text()
            ))),
        }
    }
}
