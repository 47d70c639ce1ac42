/**
 * Error Conversion
 *
 * Every backend error implements `IntoResponse`, so handlers can return
 * `Result<_, BackendError>` directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "message": "Invalid credentials",
 *   "status": 400
 * }
 * ```
 *
 * Server-side failures (5xx) are logged at `error`; client errors at `debug`.
 */

use axum::response::{IntoResponse, Json, Response};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("[Error] {} ({})", message, status);
        } else {
            tracing::debug!("[Error] {} ({})", message, status);
        }

        let body = serde_json::json!({
            "message": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
