//! Request extractors

use axum::extract::FromRequest;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

/// `axum::Json` whose rejections use the application error shape
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl<T: serde::Serialize> IntoResponse for ApiJson<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

/// Parse an id taken from the path. Anything that is not a UUID cannot name
/// an existing record, so it is reported as not found.
pub fn parse_id(raw: &str, resource: &str) -> Result<uuid::Uuid, AppError> {
    uuid::Uuid::parse_str(raw).map_err(|_| AppError::NotFound(resource.to_string()))
}
