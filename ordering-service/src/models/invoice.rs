//! Invoice model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invoice status. The engine only ever materializes ISSUED invoices;
/// the remaining states belong to downstream payment handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Issued,
    Paid,
    Void,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Issued => "issued",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Void => "void",
            InvoiceStatus::Overdue => "overdue",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "paid" => InvoiceStatus::Paid,
            "void" => InvoiceStatus::Void,
            "overdue" => InvoiceStatus::Overdue,
            _ => InvoiceStatus::Issued,
        }
    }
}

/// Immutable financial record frozen from an accepted quotation.
///
/// Amounts are copied verbatim at acceptance time and never re-derived.
/// Only identifiers reference the source order and quotation, so the
/// invoice survives archival of both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice_id: Uuid,
    pub invoice_number: String,
    pub order_id: Uuid,
    pub quotation_id: Uuid,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub payment_terms_days: i32,
    pub status: InvoiceStatus,
    pub created_utc: DateTime<Utc>,
}
