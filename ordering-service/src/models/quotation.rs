//! Quotation models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::order::validate_percentage;

/// Quotation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    Pending,
    Sent,
    Accepted,
    Rejected,
    Expired,
    Converted,
}

impl QuotationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuotationStatus::Pending => "pending",
            QuotationStatus::Sent => "sent",
            QuotationStatus::Accepted => "accepted",
            QuotationStatus::Rejected => "rejected",
            QuotationStatus::Expired => "expired",
            QuotationStatus::Converted => "converted",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "sent" => QuotationStatus::Sent,
            "accepted" => QuotationStatus::Accepted,
            "rejected" => QuotationStatus::Rejected,
            "expired" => QuotationStatus::Expired,
            "converted" => QuotationStatus::Converted,
            _ => QuotationStatus::Pending,
        }
    }

    /// An active quotation blocks creation of another one for its order.
    pub fn is_active(&self) -> bool {
        matches!(self, QuotationStatus::Pending | QuotationStatus::Sent)
    }
}

/// A priced, time-bounded proposal derived from one order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub quotation_id: Uuid,
    pub order_id: Uuid,
    pub quotation_number: String,
    pub status: QuotationStatus,
    pub quotation_date: NaiveDate,
    pub validity_days: i32,
    pub expiry_date: NaiveDate,
    pub subtotal: Decimal,
    /// Header-level override; when set it supersedes per-line discounts.
    pub discount_percentage: Option<Decimal>,
    pub discount_amount: Decimal,
    pub total_amount: Decimal,
    pub payment_terms_days: i32,
    pub delivery_terms: Option<String>,
    pub staff_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub accepted_utc: Option<DateTime<Utc>>,
    pub rejected_utc: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
}

/// Point-in-time snapshot of an order line at quotation time. Not a live
/// reference: later order line edits do not flow into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotationLine {
    pub quotation_line_id: Uuid,
    pub quotation_id: Uuid,
    pub variant_id: Uuid,
    pub color_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount_percentage: Option<Decimal>,
    pub total_price: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
}

/// Input for generating a quotation from an order.
#[derive(Debug, Clone, Default, Validate)]
pub struct GenerateQuotation {
    pub order_id: Uuid,
    pub staff_id: Option<Uuid>,
    /// Override discount applied to every line and the header subtotal.
    #[validate(custom(function = "validate_percentage"))]
    pub discount_percent: Option<Decimal>,
    #[validate(range(min = 1))]
    pub validity_days: Option<i32>,
    pub notes: Option<String>,
}

/// Input for updating a PENDING quotation.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateQuotation {
    #[validate(custom(function = "validate_percentage"))]
    pub discount_percent: Option<Decimal>,
    #[validate(range(min = 1))]
    pub validity_days: Option<i32>,
    #[validate(range(min = 1))]
    pub payment_terms_days: Option<i32>,
    pub delivery_terms: Option<String>,
    pub notes: Option<String>,
}
