use crate::app::mutations::MutationOutcome;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;

/// Maps a mutation result onto the wire.
///
/// Redirects are `303 See Other` so the browser follows with a GET. Rejected submissions
/// carry the form state body: 422 for validation, 500 for persistence failures.
pub fn mutation_response(outcome: MutationOutcome) -> Response {
    match outcome {
        MutationOutcome::Redirect(redirect) => Redirect::to(&redirect.location).into_response(),
        MutationOutcome::Deleted { message } => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": message })),
        )
            .into_response(),
        MutationOutcome::Invalid(state) => (StatusCode::UNPROCESSABLE_ENTITY, Json(state)).into_response(),
        MutationOutcome::Failed(state) => (StatusCode::INTERNAL_SERVER_ERROR, Json(state)).into_response(),
    }
}

pub fn internal_error(message: impl Into<String>) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::err(message))).into_response()
}

/// Cache key for a listing: the path plus its normalized query string.
pub fn view_key(path: &str, query: &str, page: Option<u32>) -> String {
    match page {
        Some(page) => format!("{path}?query={query}&page={page}"),
        None => format!("{path}?query={query}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::effects::Redirect as Navigate;
    use crate::domain::forms::FormState;
    use axum::http::header::LOCATION;

    #[test]
    fn redirects_use_see_other() {
        let resp = mutation_response(MutationOutcome::Redirect(Navigate::to("/dashboard/invoices")));
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[LOCATION], "/dashboard/invoices");
    }

    #[test]
    fn rejections_pick_status_by_cause() {
        let invalid = mutation_response(MutationOutcome::Invalid(FormState::default()));
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let failed = mutation_response(MutationOutcome::Failed(FormState::message("x")));
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn view_keys_sit_under_their_listing_path() {
        assert_eq!(
            view_key("/dashboard/invoices", "lee", Some(2)),
            "/dashboard/invoices?query=lee&page=2"
        );
        assert_eq!(view_key("/dashboard/customers", "", None), "/dashboard/customers?query=");
    }
}
