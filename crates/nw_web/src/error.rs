use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Boundary conversion from core errors to `{success:false, message}` JSON.
/// Validation failures (unknown session, malformed request) map to 404;
/// everything else is a 500 with the detail logged server-side.
pub struct ApiError(pub nw_core::Error);

impl From<nw_core::Error> for ApiError {
    fn from(e: nw_core::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            nw_core::Error::Validation(message) => (StatusCode::NOT_FOUND, message.clone()),
            other => {
                error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        (
            status,
            Json(json!({ "success": false, "message": message })),
        )
            .into_response()
    }
}
