//! In-memory store backing tests and persistence-less embedders.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use service_core::error::AppError;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    Invoice, Order, OrderLine, Quotation, QuotationLine, QuotationStatus, Variant,
};
use crate::stores::{
    InventorySnapshot, InvoiceStore, OrderStore, QuotationStore, VariantCatalog,
};

#[derive(Default)]
struct MemoryState {
    variants: HashMap<Uuid, Variant>,
    colors: HashSet<Uuid>,
    // AVAILABLE unit counts keyed by (variant, color).
    inventory: HashMap<(Uuid, Uuid), i64>,
    orders: HashMap<Uuid, Order>,
    order_lines: HashMap<Uuid, OrderLine>,
    quotations: HashMap<Uuid, Quotation>,
    quotation_lines: HashMap<Uuid, Vec<QuotationLine>>,
    invoices: HashMap<Uuid, Invoice>,
}

/// Implements every store interface behind a single lock, so multi-row
/// writes (a quotation with its lines, an invoice with its uniqueness
/// checks) commit or fail as one unit.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Seeding (reference data and order headers are owned by out-of-scope
    // CRUD; tests and embedders install them directly)
    // ---------------------------------------------------------------------

    pub async fn add_variant(&self, variant: Variant) {
        let mut state = self.state.write().await;
        state.variants.insert(variant.variant_id, variant);
    }

    pub async fn add_color(&self, color_id: Uuid) {
        let mut state = self.state.write().await;
        state.colors.insert(color_id);
    }

    /// Set the count of AVAILABLE units for a (variant, color).
    pub async fn set_available(&self, variant_id: Uuid, color_id: Uuid, count: i64) {
        let mut state = self.state.write().await;
        state.inventory.insert((variant_id, color_id), count);
    }

    pub async fn add_order(&self, order: Order) {
        let mut state = self.state.write().await;
        state.orders.insert(order.order_id, order);
    }
}

#[async_trait]
impl VariantCatalog for MemoryStore {
    async fn get_variant(&self, variant_id: Uuid) -> Result<Option<Variant>, AppError> {
        let state = self.state.read().await;
        Ok(state.variants.get(&variant_id).cloned())
    }

    async fn color_exists(&self, color_id: Uuid) -> Result<bool, AppError> {
        let state = self.state.read().await;
        Ok(state.colors.contains(&color_id))
    }
}

#[async_trait]
impl InventorySnapshot for MemoryStore {
    async fn count_available(&self, variant_id: Uuid, color_id: Uuid) -> Result<i64, AppError> {
        let state = self.state.read().await;
        Ok(state
            .inventory
            .get(&(variant_id, color_id))
            .copied()
            .unwrap_or(0))
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn get_order(&self, order_id: Uuid) -> Result<Option<Order>, AppError> {
        let state = self.state.read().await;
        Ok(state.orders.get(&order_id).cloned())
    }

    async fn add_line(&self, line: &OrderLine) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        state.order_lines.insert(line.order_line_id, line.clone());
        Ok(())
    }

    async fn get_line(&self, order_line_id: Uuid) -> Result<Option<OrderLine>, AppError> {
        let state = self.state.read().await;
        Ok(state.order_lines.get(&order_line_id).cloned())
    }

    async fn update_line(&self, line: &OrderLine) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if !state.order_lines.contains_key(&line.order_line_id) {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Order line {} not found",
                line.order_line_id
            )));
        }
        state.order_lines.insert(line.order_line_id, line.clone());
        Ok(())
    }

    async fn remove_line(&self, order_line_id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        Ok(state.order_lines.remove(&order_line_id).is_some())
    }

    async fn list_lines(&self, order_id: Uuid) -> Result<Vec<OrderLine>, AppError> {
        let state = self.state.read().await;
        let mut lines: Vec<OrderLine> = state
            .order_lines
            .values()
            .filter(|line| line.order_id == order_id)
            .cloned()
            .collect();
        lines.sort_by_key(|line| line.created_utc);
        Ok(lines)
    }

    async fn pending_quantity(&self, variant_id: Uuid) -> Result<i64, AppError> {
        let state = self.state.read().await;
        Ok(state
            .order_lines
            .values()
            .filter(|line| line.variant_id == variant_id && line.status.holds_inventory())
            .map(|line| i64::from(line.quantity))
            .sum())
    }
}

#[async_trait]
impl QuotationStore for MemoryStore {
    async fn create_quotation(
        &self,
        quotation: &Quotation,
        lines: &[QuotationLine],
    ) -> Result<(), AppError> {
        let mut state = self.state.write().await;

        if let Some(active) = state
            .quotations
            .values()
            .find(|q| q.order_id == quotation.order_id && q.status.is_active())
        {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Quotation {} is still {} for order {}",
                active.quotation_number,
                active.status.as_str(),
                quotation.order_id
            )));
        }
        if state
            .quotations
            .values()
            .any(|q| q.quotation_number == quotation.quotation_number)
        {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Quotation number {} already exists",
                quotation.quotation_number
            )));
        }

        state
            .quotations
            .insert(quotation.quotation_id, quotation.clone());
        state
            .quotation_lines
            .insert(quotation.quotation_id, lines.to_vec());
        Ok(())
    }

    async fn get_quotation(&self, quotation_id: Uuid) -> Result<Option<Quotation>, AppError> {
        let state = self.state.read().await;
        Ok(state.quotations.get(&quotation_id).cloned())
    }

    async fn list_quotation_lines(
        &self,
        quotation_id: Uuid,
    ) -> Result<Vec<QuotationLine>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .quotation_lines
            .get(&quotation_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_if_status(
        &self,
        quotation: &Quotation,
        expected: QuotationStatus,
    ) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        let stored = state.quotations.get(&quotation.quotation_id).ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!(
                "Quotation {} not found",
                quotation.quotation_id
            ))
        })?;
        if stored.status != expected {
            return Err(AppError::InvalidState(anyhow::anyhow!(
                "Quotation {} is {}, expected {}",
                quotation.quotation_number,
                stored.status.as_str(),
                expected.as_str()
            )));
        }
        state
            .quotations
            .insert(quotation.quotation_id, quotation.clone());
        Ok(())
    }

    async fn delete_quotation(&self, quotation_id: Uuid) -> Result<bool, AppError> {
        let mut state = self.state.write().await;
        state.quotation_lines.remove(&quotation_id);
        Ok(state.quotations.remove(&quotation_id).is_some())
    }

    async fn list_sent_expiring_before(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<Quotation>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .quotations
            .values()
            .filter(|q| q.status == QuotationStatus::Sent && q.expiry_date < date)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl InvoiceStore for MemoryStore {
    async fn create_invoice(&self, invoice: &Invoice) -> Result<(), AppError> {
        let mut state = self.state.write().await;

        if state
            .invoices
            .values()
            .any(|i| i.invoice_number == invoice.invoice_number)
        {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Invoice number {} already exists",
                invoice.invoice_number
            )));
        }
        if state
            .invoices
            .values()
            .any(|i| i.quotation_id == invoice.quotation_id)
        {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Quotation {} already has an invoice",
                invoice.quotation_id
            )));
        }

        state.invoices.insert(invoice.invoice_id, invoice.clone());
        Ok(())
    }

    async fn get_invoice(&self, invoice_id: Uuid) -> Result<Option<Invoice>, AppError> {
        let state = self.state.read().await;
        Ok(state.invoices.get(&invoice_id).cloned())
    }

    async fn get_invoice_by_quotation(
        &self,
        quotation_id: Uuid,
    ) -> Result<Option<Invoice>, AppError> {
        let state = self.state.read().await;
        Ok(state
            .invoices
            .values()
            .find(|i| i.quotation_id == quotation_id)
            .cloned())
    }
}
