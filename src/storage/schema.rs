//! Table definitions and optional seed data.

use crate::crypto::hash_password;
use sqlx::PgPool;
use tracing::info;

const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
        name VARCHAR(255) NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS customers (
        id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
        name VARCHAR(255) NOT NULL,
        email VARCHAR(255),
        url TEXT,
        image_url VARCHAR(255)
    )",
    "CREATE TABLE IF NOT EXISTS invoices (
        id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
        customer_id TEXT NOT NULL REFERENCES customers(id),
        amount INTEGER NOT NULL,
        status VARCHAR(255) NOT NULL,
        date DATE NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS revenue (
        month VARCHAR(4) NOT NULL UNIQUE,
        revenue INTEGER NOT NULL
    )",
];

const SEED_REVENUE: &[(&str, i32)] = &[
    ("Jan", 2000),
    ("Feb", 1800),
    ("Mar", 2200),
    ("Apr", 2500),
    ("May", 2300),
    ("Jun", 3200),
    ("Jul", 3500),
    ("Aug", 3700),
    ("Sep", 2500),
    ("Oct", 2800),
    ("Nov", 3000),
    ("Dec", 4800),
];

/// Creates the dashboard tables if they are missing. Safe to run on every start.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for ddl in CREATE_TABLES {
        sqlx::query(ddl).execute(pool).await?;
    }
    info!("dashboard schema ready");
    Ok(())
}

/// Inserts a login user and a year of revenue figures. Existing rows are left alone.
pub async fn seed(pool: &PgPool, name: &str, email: &str, password: &str) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "INSERT INTO users (name, email, password) VALUES ($1, $2, $3)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(name)
    .bind(email)
    .bind(hash_password(password))
    .execute(&mut *tx)
    .await?;

    for (month, revenue) in SEED_REVENUE {
        sqlx::query(
            "INSERT INTO revenue (month, revenue) VALUES ($1, $2)
             ON CONFLICT (month) DO NOTHING",
        )
        .bind(*month)
        .bind(*revenue)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(%email, months = SEED_REVENUE.len(), "seed data applied");
    Ok(())
}
