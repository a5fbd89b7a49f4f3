//! Reference-data views consumed from the vehicle catalog.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A vehicle variant as the catalog exposes it to the ordering engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub variant_id: Uuid,
    pub name: String,
    /// Manufacturer list price, used when an order line carries no price.
    pub base_price: Option<Decimal>,
}
