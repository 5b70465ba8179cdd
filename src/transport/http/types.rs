use crate::app::auth::AuthProvider;
use crate::app::effects::ViewCache;
use crate::app::PgCredentialsProvider;
use crate::storage::{PgStore, Store};
use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    /// Used by the read models and the diagnostic endpoint; connections are per request.
    pub pool: PgPool,
    pub store: Arc<dyn Store>,
    pub auth: Arc<dyn AuthProvider>,
    pub views: Arc<ViewCache>,
}

impl AppState {
    /// Production wiring: every collaborator backed by the same pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            store: Arc::new(PgStore::new(pool.clone())),
            auth: Arc::new(PgCredentialsProvider::new(pool.clone())),
            views: Arc::new(ViewCache::new()),
            pool,
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Customer form fields (`application/x-www-form-urlencoded`).
#[derive(Deserialize, Debug, ToSchema)]
pub struct CustomerFormBody {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Invoice form fields. The invoice date is assigned by the server.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFormBody {
    pub customer_id: String,
    /// Dollars, e.g. `49.99`.
    pub amount: String,
    /// `pending` or `paid`.
    pub status: String,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginFormBody {
    pub email: String,
    pub password: String,
    /// Local path to continue to after signing in (default `/dashboard`).
    #[serde(default)]
    pub redirect_to: Option<String>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Free-text search.
    #[serde(default)]
    pub query: Option<String>,
    /// 1-based page number (invoices only).
    #[serde(default)]
    pub page: Option<u32>,
}

impl ListParams {
    pub fn query(&self) -> &str {
        self.query.as_deref().map(str::trim).unwrap_or_default()
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

pub fn form_422(err: FormRejection) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::err(format!("Invalid form body: {}", err))),
    )
}
