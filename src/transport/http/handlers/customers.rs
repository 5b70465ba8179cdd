use crate::app::effects::CUSTOMERS_PATH;
use crate::app::mutations;
use crate::app::queries;
use crate::domain::forms::{FormData, FormState};
use crate::transport::http::handlers::common::{internal_error, mutation_response, view_key};
use crate::transport::http::types::{form_422, ApiResponse, AppState, CustomerFormBody, ListParams};
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};

#[utoipa::path(
    post,
    path = "/dashboard/customers",
    request_body(content = CustomerFormBody, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirects to the customer list"),
        (status = 422, description = "Validation failed", body = FormState),
        (status = 500, description = "Database error", body = FormState)
    )
)]
pub async fn create_customer_handler(
    State(state): State<AppState>,
    form: Result<Form<FormData>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(f) => f,
        Err(e) => return form_422(e).into_response(),
    };
    mutation_response(mutations::create_customer(state.store.as_ref(), state.views.as_ref(), &form).await)
}

#[utoipa::path(
    post,
    path = "/dashboard/customers/{id}/edit",
    params(("id" = String, Path, description = "Customer id")),
    request_body(content = CustomerFormBody, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirects to the customer list"),
        (status = 422, description = "Validation failed", body = FormState),
        (status = 500, description = "Database error", body = FormState)
    )
)]
pub async fn update_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<FormData>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(f) => f,
        Err(e) => return form_422(e).into_response(),
    };
    mutation_response(
        mutations::update_customer(state.store.as_ref(), state.views.as_ref(), &id, &form).await,
    )
}

#[utoipa::path(
    post,
    path = "/dashboard/customers/{id}/delete",
    params(("id" = String, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 500, description = "Database error", body = FormState)
    )
)]
pub async fn delete_customer_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    mutation_response(mutations::delete_customer(state.store.as_ref(), state.views.as_ref(), &id).await)
}

#[utoipa::path(
    get,
    path = "/dashboard/customers",
    params(ListParams),
    responses(
        (status = 200, description = "Customers matching the query, with invoice totals", body = ApiResponse),
        (status = 500, description = "Database error", body = ApiResponse)
    )
)]
pub async fn list_customers_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let query = params.query();
    let key = view_key(CUSTOMERS_PATH, query, None);
    let pool = state.pool.clone();

    let view = state
        .views
        .get_or_load(&key, || async move {
            let rows = queries::fetch_filtered_customers(&pool, query).await?;
            Ok::<_, queries::QueryError>(serde_json::json!({ "customers": rows }))
        })
        .await;

    match view {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, source = %e.source, "customer listing failed");
            internal_error(e.to_string())
        }
    }
}

#[utoipa::path(
    get,
    path = "/dashboard/customer-options",
    responses(
        (status = 200, description = "Customer ids and names for the invoice form", body = ApiResponse),
        (status = 500, description = "Database error", body = ApiResponse)
    )
)]
pub async fn customer_options_handler(State(state): State<AppState>) -> Response {
    match queries::fetch_customers(&state.pool).await {
        Ok(customers) => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({ "customers": customers }))),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, source = %e.source, "customer options failed");
            internal_error(e.to_string())
        }
    }
}
