use crate::app::effects::INVOICES_PATH;
use crate::app::mutations;
use crate::app::queries;
use crate::domain::forms::{FormData, FormState};
use crate::transport::http::handlers::common::{internal_error, mutation_response, view_key};
use crate::transport::http::types::{form_422, ApiResponse, AppState, InvoiceFormBody, ListParams};
use axum::extract::rejection::FormRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use tracing::error;

#[utoipa::path(
    post,
    path = "/dashboard/invoices",
    request_body(content = InvoiceFormBody, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirects to the invoice list"),
        (status = 422, description = "Validation failed", body = FormState),
        (status = 500, description = "Database error", body = FormState)
    )
)]
pub async fn create_invoice_handler(
    State(state): State<AppState>,
    form: Result<Form<FormData>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(f) => f,
        Err(e) => return form_422(e).into_response(),
    };
    mutation_response(mutations::create_invoice(state.store.as_ref(), state.views.as_ref(), &form).await)
}

#[utoipa::path(
    post,
    path = "/dashboard/invoices/{id}/edit",
    params(("id" = String, Path, description = "Invoice id")),
    request_body(content = InvoiceFormBody, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated; redirects to the invoice list"),
        (status = 422, description = "Validation failed", body = FormState),
        (status = 500, description = "Database error", body = FormState)
    )
)]
pub async fn update_invoice_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<FormData>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(f) => f,
        Err(e) => return form_422(e).into_response(),
    };
    mutation_response(
        mutations::update_invoice(state.store.as_ref(), state.views.as_ref(), &id, &form).await,
    )
}

#[utoipa::path(
    post,
    path = "/dashboard/invoices/{id}/delete",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 500, description = "Database error", body = FormState)
    )
)]
pub async fn delete_invoice_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    mutation_response(mutations::delete_invoice(state.store.as_ref(), state.views.as_ref(), &id).await)
}

#[utoipa::path(
    get,
    path = "/dashboard/invoices",
    params(ListParams),
    responses(
        (status = 200, description = "One page of matching invoices plus the page count", body = ApiResponse),
        (status = 500, description = "Database error", body = ApiResponse)
    )
)]
pub async fn list_invoices_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Response {
    let query = params.query();
    let page = params.page();
    let key = view_key(INVOICES_PATH, query, Some(page));
    let pool = state.pool.clone();

    let view = state
        .views
        .get_or_load(&key, || async move {
            let (invoices, total_pages) = tokio::try_join!(
                queries::fetch_filtered_invoices(&pool, query, page),
                queries::fetch_invoice_pages(&pool, query),
            )?;
            Ok::<_, queries::QueryError>(serde_json::json!({
                "invoices": invoices,
                "total_pages": total_pages,
                "page": page,
            }))
        })
        .await;

    match view {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        Err(e) => {
            error!(error = %e, source = %e.source, "invoice listing failed");
            internal_error(e.to_string())
        }
    }
}

#[utoipa::path(
    get,
    path = "/dashboard/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice as shown on the edit form", body = ApiResponse),
        (status = 404, description = "No such invoice", body = ApiResponse),
        (status = 500, description = "Database error", body = ApiResponse)
    )
)]
pub async fn get_invoice_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match queries::fetch_invoice_by_id(&state.pool, &id).await {
        Ok(Some(invoice)) => (StatusCode::OK, Json(ApiResponse::ok(serde_json::json!(invoice)))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::err(format!("Invoice '{}' not found", id))),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, source = %e.source, %id, "invoice lookup failed");
            internal_error(e.to_string())
        }
    }
}
