pub mod app;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::auth::{authenticate, AuthOutcome, AuthProvider, SignInError};
pub use app::effects::{Redirect, Revalidator, ViewCache};
pub use app::mutations::MutationOutcome;
pub use domain::forms::{FieldErrors, FormData, FormState};
pub use infra::config::Config;
pub use storage::{PgStore, Statement, SqlValue, Store, StoreError};
