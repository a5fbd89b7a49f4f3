//! Order line management.

use std::sync::Arc;

use chrono::Utc;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::models::{CreateOrderLine, OrderLine, OrderLineStatus, OrderTotals, UpdateOrderLine};
use crate::services::inventory::InventoryGuard;
use crate::services::metrics::ORDER_LINES_TOTAL;
use crate::services::pricing;
use crate::stores::{OrderStore, VariantCatalog};

/// Creates, reprices, and removes order lines, gated by admission control.
pub struct OrderLineService {
    catalog: Arc<dyn VariantCatalog>,
    orders: Arc<dyn OrderStore>,
    guard: Arc<InventoryGuard>,
}

impl OrderLineService {
    pub fn new(
        catalog: Arc<dyn VariantCatalog>,
        orders: Arc<dyn OrderStore>,
        guard: Arc<InventoryGuard>,
    ) -> Self {
        Self {
            catalog,
            orders,
            guard,
        }
    }

    /// Create an order line with status PENDING.
    ///
    /// Resolves the variant and color, runs admission control, and computes
    /// all derived prices in one step. The check runs on every line
    /// creation, so stacking lines against one variant progressively
    /// tightens the remaining headroom.
    #[instrument(skip(self, input), fields(order_id = %input.order_id, variant_id = %input.variant_id))]
    pub async fn create(&self, input: CreateOrderLine) -> Result<OrderLine, AppError> {
        input.validate()?;

        self.orders.get_order(input.order_id).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Order {} not found", input.order_id))
        })?;
        self.catalog
            .get_variant(input.variant_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("Variant {} not found", input.variant_id))
            })?;
        if !self.catalog.color_exists(input.color_id).await? {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Color {} not found",
                input.color_id
            )));
        }

        // The availability check and the insert must form one serializable
        // unit; hold the variant's admission lock across both.
        let lock = self.guard.variant_lock(input.variant_id);
        let _admission = lock.lock().await;

        self.guard
            .check_available(input.variant_id, input.color_id, input.quantity)
            .await?;

        let prices = pricing::compute(input.unit_price, input.quantity, input.discount_percent);
        let now = Utc::now();
        let line = OrderLine {
            order_line_id: Uuid::new_v4(),
            order_id: input.order_id,
            variant_id: input.variant_id,
            color_id: input.color_id,
            quantity: input.quantity,
            unit_price: input.unit_price,
            discount_percentage: input.discount_percent,
            total_price: prices.total_price,
            discount_amount: prices.discount_amount,
            final_price: prices.final_price,
            status: OrderLineStatus::Pending,
            notes: input.notes,
            created_utc: now,
            updated_utc: now,
        };
        self.orders.add_line(&line).await?;

        ORDER_LINES_TOTAL.with_label_values(&["created"]).inc();
        info!(
            order_line_id = %line.order_line_id,
            quantity = line.quantity,
            final_price = %line.final_price,
            "Order line created"
        );

        Ok(line)
    }

    /// Apply a partial update; any pricing input change reprices the line.
    ///
    /// The inventory guard is not re-run on quantity changes.
    #[instrument(skip(self, patch), fields(order_line_id = %order_line_id))]
    pub async fn update(
        &self,
        order_line_id: Uuid,
        patch: UpdateOrderLine,
    ) -> Result<OrderLine, AppError> {
        patch.validate()?;

        let mut line = self.orders.get_line(order_line_id).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Order line {} not found", order_line_id))
        })?;

        if matches!(
            line.status,
            OrderLineStatus::Delivered | OrderLineStatus::Cancelled
        ) {
            return Err(AppError::InvalidState(anyhow::anyhow!(
                "Order line {} is {} and cannot be modified",
                order_line_id,
                line.status.as_str()
            )));
        }

        if let Some(quantity) = patch.quantity {
            line.quantity = quantity;
        }
        if let Some(unit_price) = patch.unit_price {
            line.unit_price = Some(unit_price);
        }
        if let Some(discount) = patch.discount_percent {
            line.discount_percentage = Some(discount);
        }
        if let Some(notes) = patch.notes {
            line.notes = Some(notes);
        }

        let prices = pricing::compute(line.unit_price, line.quantity, line.discount_percentage);
        line.total_price = prices.total_price;
        line.discount_amount = prices.discount_amount;
        line.final_price = prices.final_price;
        line.updated_utc = Utc::now();

        self.orders.update_line(&line).await?;

        ORDER_LINES_TOTAL.with_label_values(&["updated"]).inc();
        info!(final_price = %line.final_price, "Order line updated");

        Ok(line)
    }

    /// Delete an order line. CONFIRMED and DELIVERED lines are immutable.
    #[instrument(skip(self), fields(order_line_id = %order_line_id))]
    pub async fn delete(&self, order_line_id: Uuid) -> Result<(), AppError> {
        let line = self.orders.get_line(order_line_id).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Order line {} not found", order_line_id))
        })?;

        if matches!(
            line.status,
            OrderLineStatus::Confirmed | OrderLineStatus::Delivered
        ) {
            return Err(AppError::InvalidState(anyhow::anyhow!(
                "Order line {} is {} and cannot be deleted",
                order_line_id,
                line.status.as_str()
            )));
        }

        self.orders.remove_line(order_line_id).await?;

        ORDER_LINES_TOTAL.with_label_values(&["deleted"]).inc();
        info!("Order line deleted");

        Ok(())
    }

    pub async fn get(&self, order_line_id: Uuid) -> Result<OrderLine, AppError> {
        self.orders.get_line(order_line_id).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Order line {} not found", order_line_id))
        })
    }

    pub async fn list(&self, order_id: Uuid) -> Result<Vec<OrderLine>, AppError> {
        self.orders.list_lines(order_id).await
    }

    /// Order-level summary: sums of final price and quantity.
    pub fn aggregate_totals(lines: &[OrderLine]) -> OrderTotals {
        OrderTotals {
            total_amount: lines.iter().map(|line| line.final_price).sum(),
            total_quantity: lines.iter().map(|line| i64::from(line.quantity)).sum(),
        }
    }
}
