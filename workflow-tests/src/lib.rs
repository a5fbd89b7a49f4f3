//! End-to-end workflow test library.
//!
//! Wires the complete ordering engine against the in-memory store so whole
//! order -> quotation -> invoice journeys run without external services.
//! Configuration and tracing are initialized exactly as an embedding
//! service would do it.

use std::sync::{Arc, Once};

use chrono::Utc;
use ordering_service::config::OrderingConfig;
use ordering_service::models::{Order, Variant};
use ordering_service::services::{
    init_metrics, InventoryGuard, OrderLineService, QuotationService,
};
use ordering_service::stores::MemoryStore;
use rust_decimal::Decimal;
use service_core::observability::init_tracing;
use uuid::Uuid;

static INIT: Once = Once::new();

/// The fully wired engine plus its backing store.
pub struct WorkflowTestContext {
    pub store: Arc<MemoryStore>,
    pub order_lines: Arc<OrderLineService>,
    pub quotations: Arc<QuotationService>,
}

impl WorkflowTestContext {
    pub fn new() -> anyhow::Result<Self> {
        let config = OrderingConfig::load()?;
        INIT.call_once(|| {
            init_tracing(&config.common.service_name, &config.common.log_level);
            init_metrics();
        });

        let store = Arc::new(MemoryStore::new());
        let guard = Arc::new(InventoryGuard::new(store.clone(), store.clone()));
        let order_lines = Arc::new(OrderLineService::new(store.clone(), store.clone(), guard));
        let quotations = Arc::new(QuotationService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            config.settings,
        ));

        Ok(Self {
            store,
            order_lines,
            quotations,
        })
    }

    /// Seed a dealer order plus a variant/color with stock, returning
    /// (order, variant, color) ids.
    pub async fn seed_dealer_order(
        &self,
        base_price: Option<Decimal>,
        stock: i64,
    ) -> (Uuid, Uuid, Uuid) {
        let order_id = Uuid::new_v4();
        self.store
            .add_order(Order {
                order_id,
                order_number: format!("ORD-{}", &order_id.to_string()[..8]),
                dealer_id: Some(Uuid::new_v4()),
                payment_terms_days: None,
                delivery_terms: Some("FOB factory".to_string()),
                notes: None,
                created_utc: Utc::now(),
            })
            .await;

        let variant_id = Uuid::new_v4();
        self.store
            .add_variant(Variant {
                variant_id,
                name: format!("EV-{}", &variant_id.to_string()[..8]),
                base_price,
            })
            .await;

        let color_id = Uuid::new_v4();
        self.store.add_color(color_id).await;
        self.store.set_available(variant_id, color_id, stock).await;

        (order_id, variant_id, color_id)
    }
}
