//! Customer and invoice mutations.
//!
//! Every handler runs the same pipeline: validate the submission, execute exactly one
//! statement, invalidate every listing that shows the changed rows, then navigate back to the
//! owning listing. Validation and
//! persistence failures come back as a [`FormState`] for re-display; store errors never
//! escape a handler.

use crate::app::effects::{
    Redirect, Revalidator, CUSTOMERS_PATH, CUSTOMER_VIEWS, INVOICES_PATH, INVOICE_VIEWS,
};
use crate::domain::forms::{parse_customer, parse_invoice, FormData, FormState};
use crate::storage::{Statement, Store};
use chrono::{NaiveDate, Utc};
use tracing::{error, info, warn};

/// How a mutation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Success of a create or update.
    Redirect(Redirect),
    /// Success of a delete. The listing is revalidated in place, no navigation.
    Deleted { message: String },
    /// The submission failed validation. Nothing was written.
    Invalid(FormState),
    /// The statement failed. Nothing was invalidated.
    Failed(FormState),
}

/// Today's date as the server sees it (UTC). Invoice dates always come from here.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Persist, then revalidate `paths`. The revalidation only happens if the statement succeeded.
async fn persist_and_revalidate(
    store: &dyn Store,
    revalidator: &dyn Revalidator,
    statement: Statement,
    paths: &[&str],
    failure: &str,
) -> Result<u64, FormState> {
    let sql = statement.sql;
    match store.execute(statement).await {
        Ok(rows) => {
            for path in paths {
                revalidator.revalidate_path(path);
            }
            Ok(rows)
        }
        Err(e) => {
            error!(error = %e, %sql, "mutation failed");
            Err(FormState::message(failure))
        }
    }
}

pub async fn create_customer(
    store: &dyn Store,
    revalidator: &dyn Revalidator,
    form: &FormData,
) -> MutationOutcome {
    let customer = match parse_customer(form) {
        Ok(c) => c,
        Err(errors) => {
            return MutationOutcome::Invalid(FormState::invalid(
                errors,
                "Missing Fields. Failed to Create Customer.",
            ))
        }
    };

    let statement = Statement::new("INSERT INTO customers (name, email, url) VALUES ($1, $2, $3)")
        .bind(customer.name)
        .bind(customer.email)
        .bind(customer.url);

    if let Err(state) = persist_and_revalidate(
        store,
        revalidator,
        statement,
        &[CUSTOMERS_PATH],
        "Database Error: Failed to Create Customer.",
    )
    .await
    {
        return MutationOutcome::Failed(state);
    }

    info!("customer created");
    MutationOutcome::Redirect(Redirect::to(CUSTOMERS_PATH))
}

/// `id` comes from the route, not the form, and is bound as-is.
pub async fn update_customer(
    store: &dyn Store,
    revalidator: &dyn Revalidator,
    id: &str,
    form: &FormData,
) -> MutationOutcome {
    let customer = match parse_customer(form) {
        Ok(c) => c,
        Err(errors) => {
            return MutationOutcome::Invalid(FormState::invalid(
                errors,
                "Missing Fields. Failed to Update Customer.",
            ))
        }
    };

    let statement =
        Statement::new("UPDATE customers SET name = $1, email = $2, url = $3 WHERE id = $4")
            .bind(customer.name)
            .bind(customer.email)
            .bind(customer.url)
            .bind(id);

    match persist_and_revalidate(
        store,
        revalidator,
        statement,
        CUSTOMER_VIEWS,
        "Database Error: Failed to Update Customer.",
    )
    .await
    {
        Ok(0) => warn!(%id, "customer update matched no rows"),
        Ok(_) => info!(%id, "customer updated"),
        Err(state) => return MutationOutcome::Failed(state),
    }

    MutationOutcome::Redirect(Redirect::to(CUSTOMERS_PATH))
}

pub async fn delete_customer(
    store: &dyn Store,
    revalidator: &dyn Revalidator,
    id: &str,
) -> MutationOutcome {
    let statement = Statement::new("DELETE FROM customers WHERE id = $1").bind(id);
    match persist_and_revalidate(
        store,
        revalidator,
        statement,
        CUSTOMER_VIEWS,
        "Database Error: Failed to Delete Customer.",
    )
    .await
    {
        Ok(_) => {
            info!(%id, "customer deleted");
            MutationOutcome::Deleted {
                message: "Deleted Customer.".to_string(),
            }
        }
        Err(state) => MutationOutcome::Failed(state),
    }
}

pub async fn create_invoice(
    store: &dyn Store,
    revalidator: &dyn Revalidator,
    form: &FormData,
) -> MutationOutcome {
    let invoice = match parse_invoice(form) {
        Ok(i) => i,
        Err(errors) => {
            return MutationOutcome::Invalid(FormState::invalid(
                errors,
                "Missing Fields. Failed to Create Invoice.",
            ))
        }
    };

    let statement = Statement::new(
        "INSERT INTO invoices (customer_id, amount, status, date) VALUES ($1, $2, $3, $4)",
    )
    .bind(invoice.customer_id)
    .bind(invoice.amount_cents)
    .bind(invoice.status.as_str())
    .bind(today());

    if let Err(state) = persist_and_revalidate(
        store,
        revalidator,
        statement,
        INVOICE_VIEWS,
        "Database Error: Failed to Create Invoice.",
    )
    .await
    {
        return MutationOutcome::Failed(state);
    }

    info!(amount_cents = invoice.amount_cents, "invoice created");
    MutationOutcome::Redirect(Redirect::to(INVOICES_PATH))
}

/// The invoice date is left untouched by updates.
pub async fn update_invoice(
    store: &dyn Store,
    revalidator: &dyn Revalidator,
    id: &str,
    form: &FormData,
) -> MutationOutcome {
    let invoice = match parse_invoice(form) {
        Ok(i) => i,
        Err(errors) => {
            return MutationOutcome::Invalid(FormState::invalid(
                errors,
                "Missing Fields. Failed to Update Invoice.",
            ))
        }
    };

    let statement = Statement::new(
        "UPDATE invoices SET customer_id = $1, amount = $2, status = $3 WHERE id = $4",
    )
    .bind(invoice.customer_id)
    .bind(invoice.amount_cents)
    .bind(invoice.status.as_str())
    .bind(id);

    match persist_and_revalidate(
        store,
        revalidator,
        statement,
        INVOICE_VIEWS,
        "Database Error: Failed to Update Invoice.",
    )
    .await
    {
        Ok(0) => warn!(%id, "invoice update matched no rows"),
        Ok(_) => info!(%id, "invoice updated"),
        Err(state) => return MutationOutcome::Failed(state),
    }

    MutationOutcome::Redirect(Redirect::to(INVOICES_PATH))
}

pub async fn delete_invoice(
    store: &dyn Store,
    revalidator: &dyn Revalidator,
    id: &str,
) -> MutationOutcome {
    let statement = Statement::new("DELETE FROM invoices WHERE id = $1").bind(id);
    match persist_and_revalidate(
        store,
        revalidator,
        statement,
        INVOICE_VIEWS,
        "Database Error: Failed to Delete Invoice.",
    )
    .await
    {
        Ok(_) => {
            info!(%id, "invoice deleted");
            MutationOutcome::Deleted {
                message: "Deleted Invoice.".to_string(),
            }
        }
        Err(state) => MutationOutcome::Failed(state),
    }
}
