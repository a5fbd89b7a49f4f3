//! Common test utilities for ordering-service integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use ordering_service::config::OrderingSettings;
use ordering_service::models::{
    CreateOrderLine, Order, OrderLine, OrderLineStatus, Quotation, QuotationStatus, Variant,
};
use ordering_service::services::{init_metrics, InventoryGuard, OrderLineService, QuotationService};
use ordering_service::stores::{MemoryStore, OrderStore, QuotationStore};
use rust_decimal::Decimal;
use uuid::Uuid;

/// The engine wired against a fresh in-memory store.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub order_lines: Arc<OrderLineService>,
    pub quotations: Arc<QuotationService>,
}

impl TestApp {
    pub fn spawn() -> Self {
        init_metrics();

        let store = Arc::new(MemoryStore::new());
        let guard = Arc::new(InventoryGuard::new(store.clone(), store.clone()));
        let order_lines = Arc::new(OrderLineService::new(store.clone(), store.clone(), guard));
        let quotations = Arc::new(QuotationService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            OrderingSettings::default(),
        ));

        Self {
            store,
            order_lines,
            quotations,
        }
    }

    /// Seed a variant, returning its id.
    pub async fn seed_variant(&self, base_price: Option<Decimal>) -> Uuid {
        let variant_id = Uuid::new_v4();
        self.store
            .add_variant(Variant {
                variant_id,
                name: format!("EV-{}", &variant_id.to_string()[..8]),
                base_price,
            })
            .await;
        variant_id
    }

    pub async fn seed_color(&self) -> Uuid {
        let color_id = Uuid::new_v4();
        self.store.add_color(color_id).await;
        color_id
    }

    pub async fn seed_stock(&self, variant_id: Uuid, color_id: Uuid, count: i64) {
        self.store.set_available(variant_id, color_id, count).await;
    }

    /// Seed an order owned by a dealer.
    pub async fn seed_order(&self) -> Uuid {
        self.seed_order_with(Some(Uuid::new_v4()), None).await
    }

    pub async fn seed_order_with(
        &self,
        dealer_id: Option<Uuid>,
        payment_terms_days: Option<i32>,
    ) -> Uuid {
        let order_id = Uuid::new_v4();
        self.store
            .add_order(Order {
                order_id,
                order_number: format!("ORD-{}", &order_id.to_string()[..8]),
                dealer_id,
                payment_terms_days,
                delivery_terms: None,
                notes: None,
                created_utc: Utc::now(),
            })
            .await;
        order_id
    }

    /// Force an order line into a given status through the store.
    pub async fn set_line_status(&self, line: &OrderLine, status: OrderLineStatus) {
        let mut line = line.clone();
        line.status = status;
        OrderStore::update_line(self.store.as_ref(), &line)
            .await
            .expect("Failed to update line status");
    }

    /// Seed a SENT quotation directly, bypassing generation; used to drive
    /// expiry scenarios with a past expiry date.
    pub async fn seed_sent_quotation(&self, order_id: Uuid, expiry_date: NaiveDate) -> Quotation {
        let quotation_id = Uuid::new_v4();
        let quotation = Quotation {
            quotation_id,
            order_id,
            quotation_number: format!("DQ-TEST{}", &quotation_id.to_string()[..8]),
            status: QuotationStatus::Sent,
            quotation_date: expiry_date - chrono::Duration::days(30),
            validity_days: 30,
            expiry_date,
            subtotal: Decimal::new(100, 0),
            discount_percentage: None,
            discount_amount: Decimal::ZERO,
            total_amount: Decimal::new(100, 0),
            payment_terms_days: 30,
            delivery_terms: None,
            staff_id: None,
            notes: None,
            created_utc: Utc::now(),
            accepted_utc: None,
            rejected_utc: None,
            rejection_reason: None,
        };
        QuotationStore::create_quotation(self.store.as_ref(), &quotation, &[])
            .await
            .expect("Failed to seed quotation");
        quotation
    }
}

/// Input for a plain order line without discounts or notes.
pub fn line_input(
    order_id: Uuid,
    variant_id: Uuid,
    color_id: Uuid,
    quantity: i32,
    unit_price: Option<Decimal>,
) -> CreateOrderLine {
    CreateOrderLine {
        order_id,
        variant_id,
        color_id,
        quantity,
        unit_price,
        discount_percent: None,
        notes: None,
    }
}
