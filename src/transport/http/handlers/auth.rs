use crate::app::auth::{authenticate, AuthOutcome};
use crate::domain::forms::FormData;
use crate::transport::http::handlers::common::internal_error;
use crate::transport::http::types::{form_422, ApiResponse, AppState, LoginFormBody};
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginFormBody, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Signed in; redirects to `redirectTo` (default /dashboard)"),
        (status = 401, description = "Rejected; `error` holds the message for the login form", body = ApiResponse),
        (status = 500, description = "Unexpected sign-in failure", body = ApiResponse)
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    form: Result<Form<FormData>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(f) => f,
        Err(e) => return form_422(e).into_response(),
    };

    match authenticate(state.auth.as_ref(), &form).await {
        Ok(AuthOutcome::SignedIn { redirect_to, .. }) => Redirect::to(&redirect_to).into_response(),
        Ok(AuthOutcome::Rejected(message)) => {
            (StatusCode::UNAUTHORIZED, Json(ApiResponse::err(message))).into_response()
        }
        // Already logged by `authenticate`; details stay server-side.
        Err(_) => internal_error("Internal server error"),
    }
}
