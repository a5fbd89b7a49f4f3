//! Order and order line models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Order line status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderLineStatus {
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
}

impl OrderLineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderLineStatus::Pending => "pending",
            OrderLineStatus::Confirmed => "confirmed",
            OrderLineStatus::Delivered => "delivered",
            OrderLineStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "confirmed" => OrderLineStatus::Confirmed,
            "delivered" => OrderLineStatus::Delivered,
            "cancelled" => OrderLineStatus::Cancelled,
            _ => OrderLineStatus::Pending,
        }
    }

    /// PENDING and CONFIRMED lines count against inventory headroom.
    pub fn holds_inventory(&self) -> bool {
        matches!(self, OrderLineStatus::Pending | OrderLineStatus::Confirmed)
    }
}

/// Dealer order header. Order CRUD itself lives outside the engine; the
/// engine reads the header for dealer reference and commercial terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: Uuid,
    pub order_number: String,
    /// Absent dealer references are an explicit error at quotation time,
    /// never substituted with another dealer record.
    pub dealer_id: Option<Uuid>,
    pub payment_terms_days: Option<i32>,
    pub delivery_terms: Option<String>,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
}

/// One (variant, color, quantity) request within a dealer order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub order_line_id: Uuid,
    pub order_id: Uuid,
    pub variant_id: Uuid,
    pub color_id: Uuid,
    pub quantity: i32,
    pub unit_price: Option<Decimal>,
    pub discount_percentage: Option<Decimal>,
    pub total_price: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
    pub status: OrderLineStatus,
    pub notes: Option<String>,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

/// Input for creating an order line.
#[derive(Debug, Clone, Validate)]
pub struct CreateOrderLine {
    pub order_id: Uuid,
    pub variant_id: Uuid,
    pub color_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(custom(function = "validate_money"))]
    pub unit_price: Option<Decimal>,
    #[validate(custom(function = "validate_percentage"))]
    pub discount_percent: Option<Decimal>,
    pub notes: Option<String>,
}

/// Input for a partial order line update.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateOrderLine {
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    #[validate(custom(function = "validate_money"))]
    pub unit_price: Option<Decimal>,
    #[validate(custom(function = "validate_percentage"))]
    pub discount_percent: Option<Decimal>,
    pub notes: Option<String>,
}

/// Order-level summary over a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub total_amount: Decimal,
    pub total_quantity: i64,
}

pub(crate) fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(ValidationError::new("negative_amount"));
    }
    Ok(())
}

pub(crate) fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || *value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::new("percentage_out_of_range"));
    }
    Ok(())
}
