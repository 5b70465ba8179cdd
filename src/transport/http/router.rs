use crate::app::auth::Session;
use crate::app::queries::{
    CardData, CustomerField, CustomerTableRow, InvoiceEditView, InvoiceTableRow, LatestInvoice, Revenue,
};
use crate::domain::forms::{FormState, InvoiceStatus};
use crate::transport::http::handlers::{auth, customers, dashboard, diagnostics, health, invoices};
use crate::transport::http::types::{ApiResponse, CustomerFormBody, InvoiceFormBody, LoginFormBody};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        diagnostics::verify_data_handler,
        auth::login_handler,
        dashboard::overview_handler,
        customers::create_customer_handler,
        customers::update_customer_handler,
        customers::delete_customer_handler,
        customers::list_customers_handler,
        customers::customer_options_handler,
        invoices::create_invoice_handler,
        invoices::update_invoice_handler,
        invoices::delete_invoice_handler,
        invoices::list_invoices_handler,
        invoices::get_invoice_handler
    ),
    components(schemas(
        ApiResponse,
        FormState,
        CustomerFormBody,
        InvoiceFormBody,
        LoginFormBody,
        InvoiceStatus,
        Session,
        CardData,
        Revenue,
        LatestInvoice,
        InvoiceTableRow,
        InvoiceEditView,
        CustomerField,
        CustomerTableRow
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/verify-data", get(diagnostics::verify_data_handler))
        .route("/login", post(auth::login_handler))
        .route("/dashboard", get(dashboard::overview_handler))
        .route(
            "/dashboard/customers",
            get(customers::list_customers_handler).post(customers::create_customer_handler),
        )
        .route("/dashboard/customers/:id/edit", post(customers::update_customer_handler))
        .route("/dashboard/customers/:id/delete", post(customers::delete_customer_handler))
        .route("/dashboard/customer-options", get(customers::customer_options_handler))
        .route(
            "/dashboard/invoices",
            get(invoices::list_invoices_handler).post(invoices::create_invoice_handler),
        )
        .route("/dashboard/invoices/:id", get(invoices::get_invoice_handler))
        .route("/dashboard/invoices/:id/edit", post(invoices::update_invoice_handler))
        .route("/dashboard/invoices/:id/delete", post(invoices::delete_invoice_handler))
        .with_state(app_state)
}
