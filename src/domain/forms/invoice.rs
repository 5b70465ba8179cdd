//! Invoice form rules.

use super::{FieldErrors, FormData, Validated};
use crate::domain::money::{coerce_amount, dollars_to_cents, format_currency, MAX_CENTS};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const CUSTOMER_REQUIRED: &str = "Please select a customer.";
pub const AMOUNT_NOT_POSITIVE: &str = "Please enter an amount greater than $0.";
pub const STATUS_INVALID: &str = "Please select an invoice status.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }

    /// Exact match only: `"Paid"` or `" paid"` are not statuses.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }
}

/// Validated invoice fields. The invoice date is not part of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceInput {
    pub customer_id: String,
    pub amount_cents: i32,
    pub status: InvoiceStatus,
}

fn amount_too_large() -> String {
    format!("Please enter an amount less than {}.", format_currency(MAX_CENTS + 1))
}

pub fn parse_invoice(form: &FormData) -> Validated<InvoiceInput> {
    let mut errors = FieldErrors::default();

    let customer_id = form.non_blank("customerId");
    if customer_id.is_none() {
        errors.push("customerId", CUSTOMER_REQUIRED);
    }

    let mut amount_cents = 0;
    match coerce_amount(form.get("amount").unwrap_or_default()) {
        Some(amount) if amount > Decimal::ZERO => match dollars_to_cents(amount) {
            Some(cents) if cents < 1 => errors.push("amount", AMOUNT_NOT_POSITIVE),
            Some(cents) if cents <= MAX_CENTS => amount_cents = cents as i32,
            _ => errors.push("amount", amount_too_large()),
        },
        _ => errors.push("amount", AMOUNT_NOT_POSITIVE),
    }

    let status = form.get("status").and_then(InvoiceStatus::parse);
    if status.is_none() {
        errors.push("status", STATUS_INVALID);
    }

    errors.finish(|| InvoiceInput {
        customer_id: customer_id.unwrap_or_default().to_string(),
        amount_cents,
        status: status.unwrap_or(InvoiceStatus::Pending),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(customer_id: &str, amount: &str, status: &str) -> FormData {
        FormData::new()
            .with("customerId", customer_id)
            .with("amount", amount)
            .with("status", status)
    }

    #[test]
    fn parses_amount_into_cents() {
        let input = parse_invoice(&form("123", "49.99", "pending")).unwrap();
        assert_eq!(
            input,
            InvoiceInput {
                customer_id: "123".into(),
                amount_cents: 4999,
                status: InvoiceStatus::Pending,
            }
        );
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        for amount in ["0", "-5", "", "abc", "0.001", "NaN", "-inf"] {
            let errors = parse_invoice(&form("123", amount, "paid")).unwrap_err();
            assert_eq!(
                errors.field("amount"),
                [AMOUNT_NOT_POSITIVE.to_string()],
                "amount {amount:?}"
            );
        }
    }

    #[test]
    fn amounts_must_fit_the_column() {
        let errors = parse_invoice(&form("123", "21474836.48", "paid")).unwrap_err();
        assert_eq!(
            errors.field("amount"),
            ["Please enter an amount less than $21,474,836.48.".to_string()]
        );
        assert!(parse_invoice(&form("123", "21474836.47", "paid")).is_ok());
    }

    #[test]
    fn status_must_match_exactly() {
        assert!(parse_invoice(&form("1", "1", "paid")).is_ok());
        for status in ["Paid", "overdue", "", " pending"] {
            let errors = parse_invoice(&form("1", "1", status)).unwrap_err();
            assert_eq!(errors.field("status"), [STATUS_INVALID.to_string()]);
        }
    }

    #[test]
    fn reports_all_fields_at_once() {
        let errors = parse_invoice(&FormData::new()).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, ["amount", "customerId", "status"]);
        assert_eq!(errors.field("customerId"), [CUSTOMER_REQUIRED.to_string()]);
    }

    #[test]
    fn half_cents_round_away_from_zero() {
        for (amount, cents) in [("1.005", 101), ("0.285", 29), ("0.125", 13), ("2.675", 268)] {
            let input = parse_invoice(&form("1", amount, "paid")).unwrap();
            assert_eq!(input.amount_cents, cents, "amount {amount:?}");
        }
    }

    #[test]
    fn submitted_date_is_ignored() {
        let input = parse_invoice(&form("1", "1", "paid").with("date", "1999-01-01")).unwrap();
        assert_eq!(input.amount_cents, 100);
    }
}
