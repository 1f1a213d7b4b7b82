//! Consistent error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use chassis_core::ResponseError;

/// Wire-facing error wrapper so middleware and handlers can `?`/return a
/// [`ResponseError`] directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError(pub ResponseError);

impl From<ResponseError> for ApiError {
    fn from(err: ResponseError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.0.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            axum::Json(json!({
                "error": self.0.name(),
                "code": self.0.code(),
                "message": self.0.message(),
                "hint": self.0.hint(),
            })),
        )
            .into_response()
    }
}
