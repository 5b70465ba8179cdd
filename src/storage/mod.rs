pub mod postgres;
pub mod schema;
pub mod store;

pub use postgres::{connect, PgStore};
pub use store::{SqlValue, Statement, Store, StoreError};
