//! Narrow persistence and reference-data interfaces consumed by the engine.
//!
//! The engine never talks to a concrete database; embedders supply these
//! traits. [`MemoryStore`] implements all of them for tests and for
//! embedders without real persistence.

use async_trait::async_trait;
use chrono::NaiveDate;
use service_core::error::AppError;
use uuid::Uuid;

use crate::models::{
    Invoice, Order, OrderLine, Quotation, QuotationLine, QuotationStatus, Variant,
};

mod memory;

pub use memory::MemoryStore;

/// Read access to vehicle reference data.
#[async_trait]
pub trait VariantCatalog: Send + Sync {
    async fn get_variant(&self, variant_id: Uuid) -> Result<Option<Variant>, AppError>;
    async fn color_exists(&self, color_id: Uuid) -> Result<bool, AppError>;
}

/// Read access to the physical inventory.
#[async_trait]
pub trait InventorySnapshot: Send + Sync {
    /// Count of units in AVAILABLE status for this variant and color.
    async fn count_available(&self, variant_id: Uuid, color_id: Uuid) -> Result<i64, AppError>;
}

/// Order headers and order lines.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_order(&self, order_id: Uuid) -> Result<Option<Order>, AppError>;
    async fn add_line(&self, line: &OrderLine) -> Result<(), AppError>;
    async fn get_line(&self, order_line_id: Uuid) -> Result<Option<OrderLine>, AppError>;
    async fn update_line(&self, line: &OrderLine) -> Result<(), AppError>;
    /// Returns false when the line does not exist.
    async fn remove_line(&self, order_line_id: Uuid) -> Result<bool, AppError>;
    async fn list_lines(&self, order_id: Uuid) -> Result<Vec<OrderLine>, AppError>;
    /// Sum of quantities over PENDING and CONFIRMED lines for a variant,
    /// across all orders and colors.
    async fn pending_quantity(&self, variant_id: Uuid) -> Result<i64, AppError>;
}

/// Quotations and their snapshot lines.
#[async_trait]
pub trait QuotationStore: Send + Sync {
    /// Persist a quotation and its lines as one atomic unit.
    ///
    /// Fails with `Conflict` while another quotation for the same order is
    /// PENDING or SENT, or when the quotation number is already taken.
    async fn create_quotation(
        &self,
        quotation: &Quotation,
        lines: &[QuotationLine],
    ) -> Result<(), AppError>;
    async fn get_quotation(&self, quotation_id: Uuid) -> Result<Option<Quotation>, AppError>;
    async fn list_quotation_lines(
        &self,
        quotation_id: Uuid,
    ) -> Result<Vec<QuotationLine>, AppError>;
    /// Write `quotation` only while its stored status still equals
    /// `expected`; fails with `InvalidState` otherwise, so a concurrent
    /// transition loses instead of clobbering.
    async fn update_if_status(
        &self,
        quotation: &Quotation,
        expected: QuotationStatus,
    ) -> Result<(), AppError>;
    /// Delete a quotation and its lines. Returns false when absent.
    async fn delete_quotation(&self, quotation_id: Uuid) -> Result<bool, AppError>;
    /// SENT quotations whose expiry date lies strictly before `date`.
    async fn list_sent_expiring_before(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Quotation>, AppError>;
}

/// Issued invoices.
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Fails with `Conflict` on a duplicate invoice number or a second
    /// invoice for the same quotation.
    async fn create_invoice(&self, invoice: &Invoice) -> Result<(), AppError>;
    async fn get_invoice(&self, invoice_id: Uuid) -> Result<Option<Invoice>, AppError>;
    async fn get_invoice_by_quotation(
        &self,
        quotation_id: Uuid,
    ) -> Result<Option<Invoice>, AppError>;
}
