pub mod router;
pub mod types;
pub mod handlers {
    pub mod auth;
    pub mod common;
    pub mod customers;
    pub mod dashboard;
    pub mod diagnostics;
    pub mod health;
    pub mod invoices;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
