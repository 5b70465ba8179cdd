use crate::app::diagnostics::verify_data;
use crate::transport::http::types::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// Debug-only surface: echoes raw database errors.
#[utoipa::path(
    get,
    path = "/verify-data",
    responses(
        (status = 200, description = "Revenue rows were read and logged: `{\"message\": \"success\"}`"),
        (status = 500, description = "Read failed and was rolled back: `{\"error\": \"...\"}`")
    )
)]
pub async fn verify_data_handler(State(state): State<AppState>) -> impl IntoResponse {
    match verify_data(&state.pool).await {
        Ok(_) => (StatusCode::OK, Json(serde_json::json!({ "message": "success" }))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}
