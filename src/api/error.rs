use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

use crate::blob::BlobError;
use crate::storefront::OrderLinkError;
use crate::StoreError;

/// Every failure leaves the gateway as `{"error": "<message>"}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Unprocessable(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self { Self::NotFound(format!("{what} not found")) }

    /// Logs the store failure and hides its detail behind `message`.
    pub fn store(error: StoreError, message: &str) -> Self {
        tracing::error!(error = %error, "{message}");
        Self::Internal(message.to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(m)
            | Self::Unauthorized(m)
            | Self::NotFound(m)
            | Self::Unprocessable(m)
            | Self::PayloadTooLarge(m)
            | Self::Internal(m) => m,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.message()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self { Self::BadRequest(rejection.body_text()) }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self { Self::BadRequest(errors.to_string()) }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        match error.status() {
            StatusCode::PAYLOAD_TOO_LARGE => Self::PayloadTooLarge("File too large".into()),
            _ => Self::BadRequest(error.body_text()),
        }
    }
}

impl From<OrderLinkError> for ApiError {
    fn from(error: OrderLinkError) -> Self { Self::Unprocessable(error.to_string()) }
}

impl From<BlobError> for ApiError {
    fn from(error: BlobError) -> Self {
        match error {
            BlobError::EmptyName => Self::BadRequest("No file provided".into()),
            BlobError::Io(e) => {
                tracing::error!(error = %e, "upload failed");
                Self::Internal("Upload failed".into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::not_found("Product").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({"error": "Product not found"}));
    }

    #[test]
    fn test_order_link_maps_to_unprocessable() {
        let response = ApiError::from(OrderLinkError::NotConfigured).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
