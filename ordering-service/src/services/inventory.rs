//! Inventory admission control for order lines.

use std::sync::Arc;

use dashmap::DashMap;
use service_core::error::AppError;
use tokio::sync::Mutex;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::services::metrics::{ADMISSION_CHECK_DURATION, INVENTORY_REJECTIONS_TOTAL};
use crate::stores::{InventorySnapshot, OrderStore};

/// Decides whether an order line may claim units of a (variant, color).
///
/// Headroom is the count of AVAILABLE units for the variant and color minus
/// the quantity already committed to PENDING or CONFIRMED order lines for
/// the variant. Pending quantity pools across colors.
pub struct InventoryGuard {
    inventory: Arc<dyn InventorySnapshot>,
    orders: Arc<dyn OrderStore>,
    variant_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl InventoryGuard {
    pub fn new(inventory: Arc<dyn InventorySnapshot>, orders: Arc<dyn OrderStore>) -> Self {
        Self {
            inventory,
            orders,
            variant_locks: DashMap::new(),
        }
    }

    /// Admission lock for one variant.
    ///
    /// Callers hold it across the availability check and the line insert so
    /// two concurrent creates cannot both admit against the same headroom.
    pub fn variant_lock(&self, variant_id: Uuid) -> Arc<Mutex<()>> {
        self.variant_locks
            .entry(variant_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Check whether `requested` units of (variant, color) are still
    /// claimable once pending order lines are accounted for.
    #[instrument(skip(self), fields(variant_id = %variant_id, color_id = %color_id))]
    pub async fn check_available(
        &self,
        variant_id: Uuid,
        color_id: Uuid,
        requested: i32,
    ) -> Result<(), AppError> {
        let timer = ADMISSION_CHECK_DURATION
            .with_label_values(&["checked"])
            .start_timer();

        let available = self.inventory.count_available(variant_id, color_id).await?;
        let pending = self.orders.pending_quantity(variant_id).await?;
        let actually_available = available - pending;

        timer.observe_duration();

        if actually_available < i64::from(requested) {
            INVENTORY_REJECTIONS_TOTAL
                .with_label_values(&[variant_id.to_string().as_str()])
                .inc();
            warn!(
                available,
                pending, requested, "Order line rejected: insufficient inventory"
            );
            return Err(AppError::InsufficientInventory {
                available,
                requested: i64::from(requested),
                pending,
            });
        }

        Ok(())
    }
}
