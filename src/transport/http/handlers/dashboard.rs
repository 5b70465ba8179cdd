use crate::app::queries;
use crate::transport::http::handlers::common::internal_error;
use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Overview page data, computed on every request (not part of the view cache).
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Card totals, revenue and the latest invoices", body = ApiResponse),
        (status = 500, description = "Database error", body = ApiResponse)
    )
)]
pub async fn overview_handler(State(state): State<AppState>) -> Response {
    let pool = &state.pool;
    let result = tokio::try_join!(
        queries::fetch_card_data(pool),
        queries::fetch_revenue(pool),
        queries::fetch_latest_invoices(pool),
    );

    match result {
        Ok((cards, revenue, latest_invoices)) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({
                "cards": cards,
                "revenue": revenue,
                "latest_invoices": latest_invoices,
            }))),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, source = %e.source, "dashboard overview failed");
            internal_error(e.to_string())
        }
    }
}
