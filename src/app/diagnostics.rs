//! Connectivity smoke test: read the `revenue` table inside a transaction and log every row.

use serde_json::Value as JsonValue;
use sqlx::{PgPool, Row};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum DiagnosticError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

/// Returns the number of rows logged. Rows are never returned to the caller.
///
/// The connection is taken from the pool for this call only. On any failure after `BEGIN`
/// the transaction is rolled back before the error is returned.
pub async fn verify_data(pool: &PgPool) -> Result<usize, DiagnosticError> {
    let mut tx = pool.begin().await?;

    let read = async {
        let rows = sqlx::query("SELECT row_to_json(revenue.*) AS record FROM revenue")
            .fetch_all(&mut *tx)
            .await?;
        for row in &rows {
            let record: JsonValue = row.try_get("record")?;
            info!(target: "verify_data", %record, "revenue row");
        }
        Ok::<usize, sqlx::Error>(rows.len())
    }
    .await;

    match read {
        Ok(count) => {
            tx.commit().await?;
            info!(target: "verify_data", rows = count, "verify-data committed");
            Ok(count)
        }
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                warn!(target: "verify_data", error = %rollback, "rollback failed");
            }
            Err(e.into())
        }
    }
}
