//! Read models behind the dashboard pages.

use crate::domain::money::{cents_to_dollars, format_currency};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Row};
use utoipa::ToSchema;

pub const ITEMS_PER_PAGE: i64 = 6;
const LATEST_INVOICES: i64 = 5;

#[derive(Debug, thiserror::Error)]
#[error("Database Error: Failed to fetch {what}.")]
pub struct QueryError {
    pub what: &'static str,
    #[source]
    pub source: sqlx::Error,
}

fn failed(what: &'static str) -> impl FnOnce(sqlx::Error) -> QueryError {
    move |source| QueryError { what, source }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Revenue {
    pub month: String,
    pub revenue: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LatestInvoice {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub image_url: Option<String>,
    /// Formatted, e.g. `$1,234.56`.
    pub amount: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CardData {
    pub number_of_customers: i64,
    pub number_of_invoices: i64,
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct InvoiceTableRow {
    pub id: String,
    pub customer_id: String,
    pub name: String,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub date: NaiveDate,
    /// Cents.
    pub amount: i32,
    pub status: String,
}

/// An invoice as the edit form shows it, amount in dollars.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InvoiceEditView {
    pub id: String,
    pub customer_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CustomerField {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerTableRow {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub total_invoices: i64,
    pub total_pending: String,
    pub total_paid: String,
}

fn search_pattern(query: &str) -> String {
    format!("%{}%", query.trim())
}

pub async fn fetch_revenue(pool: &PgPool) -> Result<Vec<Revenue>, QueryError> {
    sqlx::query_as::<_, Revenue>("SELECT month, revenue FROM revenue")
        .fetch_all(pool)
        .await
        .map_err(failed("revenue data"))
}

pub async fn fetch_latest_invoices(pool: &PgPool) -> Result<Vec<LatestInvoice>, QueryError> {
    let rows = sqlx::query(
        "SELECT invoices.id, invoices.amount, customers.name, customers.email, customers.image_url
         FROM invoices
         JOIN customers ON invoices.customer_id = customers.id
         ORDER BY invoices.date DESC
         LIMIT $1",
    )
    .bind(LATEST_INVOICES)
    .fetch_all(pool)
    .await
    .map_err(failed("the latest invoices"))?;

    rows.iter()
        .map(|row| {
            let amount: i32 = row.try_get("amount")?;
            Ok(LatestInvoice {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                email: row.try_get("email")?,
                image_url: row.try_get("image_url")?,
                amount: format_currency(i64::from(amount)),
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()
        .map_err(failed("the latest invoices"))
}

pub async fn fetch_card_data(pool: &PgPool) -> Result<CardData, QueryError> {
    let invoice_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices").fetch_one(pool);
    let customer_count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers").fetch_one(pool);
    let totals = sqlx::query(
        "SELECT
            COALESCE(SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END), 0)::bigint AS paid,
            COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0)::bigint AS pending
         FROM invoices",
    )
    .fetch_one(pool);

    let (number_of_invoices, number_of_customers, totals) =
        tokio::try_join!(invoice_count, customer_count, totals).map_err(failed("card data"))?;

    let paid: i64 = totals.try_get("paid").map_err(failed("card data"))?;
    let pending: i64 = totals.try_get("pending").map_err(failed("card data"))?;

    Ok(CardData {
        number_of_customers,
        number_of_invoices,
        total_paid_invoices: format_currency(paid),
        total_pending_invoices: format_currency(pending),
    })
}

/// One page of invoices matching `query` on customer name/email, amount, date or status.
pub async fn fetch_filtered_invoices(
    pool: &PgPool,
    query: &str,
    page: u32,
) -> Result<Vec<InvoiceTableRow>, QueryError> {
    let offset = i64::from(page.max(1) - 1) * ITEMS_PER_PAGE;
    sqlx::query_as::<_, InvoiceTableRow>(
        "SELECT invoices.id, invoices.customer_id, customers.name, customers.email,
                customers.image_url, invoices.date, invoices.amount, invoices.status
         FROM invoices
         JOIN customers ON invoices.customer_id = customers.id
         WHERE customers.name ILIKE $1
            OR customers.email ILIKE $1
            OR invoices.amount::text ILIKE $1
            OR invoices.date::text ILIKE $1
            OR invoices.status ILIKE $1
         ORDER BY invoices.date DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(search_pattern(query))
    .bind(ITEMS_PER_PAGE)
    .bind(offset)
    .fetch_all(pool)
    .await
    .map_err(failed("invoices"))
}

pub async fn fetch_invoice_pages(pool: &PgPool, query: &str) -> Result<i64, QueryError> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*)
         FROM invoices
         JOIN customers ON invoices.customer_id = customers.id
         WHERE customers.name ILIKE $1
            OR customers.email ILIKE $1
            OR invoices.amount::text ILIKE $1
            OR invoices.date::text ILIKE $1
            OR invoices.status ILIKE $1",
    )
    .bind(search_pattern(query))
    .fetch_one(pool)
    .await
    .map_err(failed("the total number of invoices"))?;

    Ok(page_count(count))
}

pub fn page_count(total: i64) -> i64 {
    (total + ITEMS_PER_PAGE - 1) / ITEMS_PER_PAGE
}

pub async fn fetch_invoice_by_id(pool: &PgPool, id: &str) -> Result<Option<InvoiceEditView>, QueryError> {
    let row = sqlx::query("SELECT id, customer_id, amount, status FROM invoices WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(failed("invoice"))?;

    let Some(row) = row else {
        return Ok(None);
    };
    let read = || -> Result<InvoiceEditView, sqlx::Error> {
        let amount: i32 = row.try_get("amount")?;
        Ok(InvoiceEditView {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            amount: cents_to_dollars(i64::from(amount)),
            status: row.try_get("status")?,
        })
    };
    read().map(Some).map_err(failed("invoice"))
}

pub async fn fetch_customers(pool: &PgPool) -> Result<Vec<CustomerField>, QueryError> {
    sqlx::query_as::<_, CustomerField>("SELECT id, name FROM customers ORDER BY name ASC")
        .fetch_all(pool)
        .await
        .map_err(failed("all customers"))
}

pub async fn fetch_filtered_customers(pool: &PgPool, query: &str) -> Result<Vec<CustomerTableRow>, QueryError> {
    let rows = sqlx::query(
        "SELECT
            customers.id, customers.name, customers.email, customers.url, customers.image_url,
            COUNT(invoices.id) AS total_invoices,
            COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0)::bigint AS total_pending,
            COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0)::bigint AS total_paid
         FROM customers
         LEFT JOIN invoices ON customers.id = invoices.customer_id
         WHERE customers.name ILIKE $1 OR customers.email ILIKE $1
         GROUP BY customers.id, customers.name, customers.email, customers.url, customers.image_url
         ORDER BY customers.name ASC",
    )
    .bind(search_pattern(query))
    .fetch_all(pool)
    .await
    .map_err(failed("customer table"))?;

    rows.iter()
        .map(|row| {
            let pending: i64 = row.try_get("total_pending")?;
            let paid: i64 = row.try_get("total_paid")?;
            Ok(CustomerTableRow {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                email: row.try_get("email")?,
                url: row.try_get("url")?,
                image_url: row.try_get("image_url")?,
                total_invoices: row.try_get("total_invoices")?,
                total_pending: format_currency(pending),
                total_paid: format_currency(paid),
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()
        .map_err(failed("customer table"))
}
