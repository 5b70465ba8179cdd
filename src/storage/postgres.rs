//! Postgres-backed store.

use super::store::{SqlValue, Statement, Store, StoreError};
use crate::infra::config::Config;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Opens the connection pool. Connections are acquired per call and released on drop.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
}

/// A [`Store`] that runs statements against a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn execute(&self, statement: Statement) -> Result<u64, StoreError> {
        let mut query = sqlx::query(statement.sql);
        for value in statement.params {
            query = match value {
                SqlValue::Text(v) => query.bind(v),
                SqlValue::NullableText(v) => query.bind(v),
                SqlValue::Integer(v) => query.bind(v),
                SqlValue::Date(v) => query.bind(v),
            };
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
