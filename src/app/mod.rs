pub mod auth;
pub mod credentials;
pub mod diagnostics;
pub mod effects;
pub mod mutations;
pub mod queries;

pub use credentials::PgCredentialsProvider;
