//! Quotation generation and lifecycle.
//!
//! States: PENDING -> SENT -> {ACCEPTED, REJECTED, EXPIRED}; acceptance
//! converts to an invoice and lands in CONVERTED within the same operation.
//! REJECTED, EXPIRED, and CONVERTED are terminal.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use service_core::error::AppError;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::OrderingSettings;
use crate::models::{
    GenerateQuotation, Invoice, Quotation, QuotationLine, QuotationStatus, UpdateQuotation,
};
use crate::services::invoices::InvoiceFactory;
use crate::services::metrics::{ERRORS_TOTAL, INVOICES_TOTAL, QUOTATIONS_TOTAL};
use crate::services::numbering::NumberGenerator;
use crate::services::pricing;
use crate::stores::{InvoiceStore, OrderStore, QuotationStore, VariantCatalog};

/// Generates quotations from orders and drives their lifecycle.
pub struct QuotationService {
    catalog: Arc<dyn VariantCatalog>,
    orders: Arc<dyn OrderStore>,
    quotations: Arc<dyn QuotationStore>,
    invoices: Arc<dyn InvoiceStore>,
    numbers: NumberGenerator,
    invoice_factory: InvoiceFactory,
    settings: OrderingSettings,
}

impl QuotationService {
    pub fn new(
        catalog: Arc<dyn VariantCatalog>,
        orders: Arc<dyn OrderStore>,
        quotations: Arc<dyn QuotationStore>,
        invoices: Arc<dyn InvoiceStore>,
        settings: OrderingSettings,
    ) -> Self {
        Self {
            catalog,
            orders,
            quotations,
            invoices,
            numbers: NumberGenerator::new(settings.quotation_number_prefix.clone()),
            invoice_factory: InvoiceFactory::new(settings.invoice_number_prefix.clone()),
            settings,
        }
    }

    /// Build and persist a PENDING quotation from an order's current lines.
    ///
    /// Each line is snapshotted with its effective unit price (the order
    /// line's, else the variant's list price, else zero) and effective
    /// discount (the override when positive, else the line's own), priced in
    /// a single computation. At most one PENDING/SENT quotation may exist
    /// per order; the store enforces this atomically.
    #[instrument(skip(self, input), fields(order_id = %input.order_id))]
    pub async fn generate(&self, input: GenerateQuotation) -> Result<Quotation, AppError> {
        input.validate()?;

        let order = self.orders.get_order(input.order_id).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Order {} not found", input.order_id))
        })?;
        if order.dealer_id.is_none() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Order {} has no dealer reference",
                order.order_number
            )));
        }

        let order_lines = self.orders.list_lines(input.order_id).await?;
        if order_lines.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Cannot generate a quotation for order {} without line items",
                order.order_number
            )));
        }

        let override_discount = input.discount_percent.filter(|d| *d > Decimal::ZERO);

        let quotation_id = Uuid::new_v4();
        let quotation_date = Utc::now().date_naive();
        let validity_days = input
            .validity_days
            .unwrap_or(self.settings.quotation_validity_days);

        let mut lines = Vec::with_capacity(order_lines.len());
        let mut subtotal = Decimal::ZERO;
        for order_line in &order_lines {
            let unit_price = match order_line.unit_price {
                Some(price) => Some(price),
                None => self
                    .catalog
                    .get_variant(order_line.variant_id)
                    .await?
                    .and_then(|variant| variant.base_price),
            };
            let discount_percent = override_discount.or(order_line.discount_percentage);
            let prices = pricing::compute(unit_price, order_line.quantity, discount_percent);
            subtotal += prices.total_price;

            lines.push(QuotationLine {
                quotation_line_id: Uuid::new_v4(),
                quotation_id,
                variant_id: order_line.variant_id,
                color_id: order_line.color_id,
                quantity: order_line.quantity,
                unit_price: unit_price.unwrap_or(Decimal::ZERO),
                discount_percentage: discount_percent,
                total_price: prices.total_price,
                discount_amount: prices.discount_amount,
                final_price: prices.final_price,
            });
        }

        // Per-line discounts already live inside each line's final price;
        // only the header override is subtracted from the subtotal.
        let discount_amount = match override_discount {
            Some(percent) => pricing::discount(subtotal, percent),
            None => Decimal::ZERO,
        };
        let total_amount = subtotal - discount_amount;

        let quotation = Quotation {
            quotation_id,
            order_id: order.order_id,
            quotation_number: self.numbers.next(),
            status: QuotationStatus::Pending,
            quotation_date,
            validity_days,
            expiry_date: quotation_date + Duration::days(i64::from(validity_days)),
            subtotal,
            discount_percentage: override_discount,
            discount_amount,
            total_amount,
            payment_terms_days: order
                .payment_terms_days
                .unwrap_or(self.settings.payment_terms_days),
            delivery_terms: order.delivery_terms.clone(),
            staff_id: input.staff_id,
            notes: input.notes,
            created_utc: Utc::now(),
            accepted_utc: None,
            rejected_utc: None,
            rejection_reason: None,
        };

        self.quotations.create_quotation(&quotation, &lines).await?;

        QUOTATIONS_TOTAL.with_label_values(&["pending"]).inc();
        info!(
            quotation_id = %quotation.quotation_id,
            quotation_number = %quotation.quotation_number,
            lines = lines.len(),
            subtotal = %subtotal,
            total_amount = %total_amount,
            "Quotation generated"
        );

        Ok(quotation)
    }

    pub async fn get(&self, quotation_id: Uuid) -> Result<Quotation, AppError> {
        self.quotations
            .get_quotation(quotation_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("Quotation {} not found", quotation_id))
            })
    }

    pub async fn lines(&self, quotation_id: Uuid) -> Result<Vec<QuotationLine>, AppError> {
        self.quotations.list_quotation_lines(quotation_id).await
    }

    /// Send a PENDING quotation to the dealer.
    #[instrument(skip(self), fields(quotation_id = %quotation_id))]
    pub async fn send(&self, quotation_id: Uuid) -> Result<Quotation, AppError> {
        let mut quotation = self.get(quotation_id).await?;
        if quotation.status != QuotationStatus::Pending {
            return Err(self.invalid_transition(&quotation, "sent"));
        }

        quotation.status = QuotationStatus::Sent;
        self.quotations
            .update_if_status(&quotation, QuotationStatus::Pending)
            .await?;

        QUOTATIONS_TOTAL.with_label_values(&["sent"]).inc();
        info!(quotation_number = %quotation.quotation_number, "Quotation sent");

        Ok(quotation)
    }

    /// Accept a SENT quotation: freeze it into an invoice and convert.
    ///
    /// A quotation past its expiry date is moved to EXPIRED and the call
    /// fails with `Expired`; no invoice is produced. The invoice is
    /// persisted before the quotation's transition commits, so a failed
    /// invoice write leaves the quotation SENT, never accepted without an
    /// invoice.
    #[instrument(skip(self), fields(quotation_id = %quotation_id))]
    pub async fn accept(&self, quotation_id: Uuid) -> Result<Invoice, AppError> {
        let mut quotation = self.get(quotation_id).await?;
        if quotation.status != QuotationStatus::Sent {
            return Err(self.invalid_transition(&quotation, "accepted"));
        }

        let today = Utc::now().date_naive();
        if quotation.expiry_date < today {
            let mut expired = quotation.clone();
            expired.status = QuotationStatus::Expired;
            self.quotations
                .update_if_status(&expired, QuotationStatus::Sent)
                .await?;

            QUOTATIONS_TOTAL.with_label_values(&["expired"]).inc();
            ERRORS_TOTAL.with_label_values(&["expired"]).inc();
            warn!(
                quotation_number = %quotation.quotation_number,
                expiry_date = %quotation.expiry_date,
                "Quotation expired before acceptance"
            );
            return Err(AppError::Expired(anyhow::anyhow!(
                "Quotation {} expired on {}",
                quotation.quotation_number,
                quotation.expiry_date
            )));
        }

        let invoice = self.invoice_factory.from_quotation(&quotation);
        self.invoices.create_invoice(&invoice).await?;

        quotation.status = QuotationStatus::Converted;
        quotation.accepted_utc = Some(Utc::now());
        self.quotations
            .update_if_status(&quotation, QuotationStatus::Sent)
            .await?;

        QUOTATIONS_TOTAL.with_label_values(&["converted"]).inc();
        INVOICES_TOTAL.with_label_values(&["issued"]).inc();
        info!(
            quotation_number = %quotation.quotation_number,
            invoice_number = %invoice.invoice_number,
            total_amount = %invoice.total_amount,
            "Quotation accepted and converted to invoice"
        );

        Ok(invoice)
    }

    /// Reject a SENT quotation with a reason.
    #[instrument(skip(self, reason), fields(quotation_id = %quotation_id))]
    pub async fn reject(
        &self,
        quotation_id: Uuid,
        reason: impl Into<String>,
    ) -> Result<Quotation, AppError> {
        let mut quotation = self.get(quotation_id).await?;
        if quotation.status != QuotationStatus::Sent {
            return Err(self.invalid_transition(&quotation, "rejected"));
        }

        quotation.status = QuotationStatus::Rejected;
        quotation.rejected_utc = Some(Utc::now());
        quotation.rejection_reason = Some(reason.into());
        self.quotations
            .update_if_status(&quotation, QuotationStatus::Sent)
            .await?;

        QUOTATIONS_TOTAL.with_label_values(&["rejected"]).inc();
        info!(quotation_number = %quotation.quotation_number, "Quotation rejected");

        Ok(quotation)
    }

    /// Update a quotation's terms. Only permitted while PENDING.
    ///
    /// Changing the override discount reprices the header against the
    /// existing subtotal; the snapshot lines are immutable.
    #[instrument(skip(self, patch), fields(quotation_id = %quotation_id))]
    pub async fn update(
        &self,
        quotation_id: Uuid,
        patch: UpdateQuotation,
    ) -> Result<Quotation, AppError> {
        patch.validate()?;

        let mut quotation = self.get(quotation_id).await?;
        if quotation.status != QuotationStatus::Pending {
            return Err(self.invalid_transition(&quotation, "updated"));
        }

        if let Some(days) = patch.validity_days {
            quotation.validity_days = days;
            quotation.expiry_date = quotation.quotation_date + Duration::days(i64::from(days));
        }
        if let Some(terms) = patch.payment_terms_days {
            quotation.payment_terms_days = terms;
        }
        if let Some(delivery) = patch.delivery_terms {
            quotation.delivery_terms = Some(delivery);
        }
        if let Some(notes) = patch.notes {
            quotation.notes = Some(notes);
        }
        if let Some(discount) = patch.discount_percent {
            let override_discount = Some(discount).filter(|d| *d > Decimal::ZERO);
            quotation.discount_percentage = override_discount;
            quotation.discount_amount = match override_discount {
                Some(percent) => pricing::discount(quotation.subtotal, percent),
                None => Decimal::ZERO,
            };
            quotation.total_amount = quotation.subtotal - quotation.discount_amount;
        }

        self.quotations
            .update_if_status(&quotation, QuotationStatus::Pending)
            .await?;

        info!(quotation_number = %quotation.quotation_number, "Quotation updated");

        Ok(quotation)
    }

    /// Delete a quotation and its lines. Only permitted while PENDING.
    #[instrument(skip(self), fields(quotation_id = %quotation_id))]
    pub async fn delete(&self, quotation_id: Uuid) -> Result<(), AppError> {
        let quotation = self.get(quotation_id).await?;
        if quotation.status != QuotationStatus::Pending {
            return Err(self.invalid_transition(&quotation, "deleted"));
        }

        self.quotations.delete_quotation(quotation_id).await?;
        info!(quotation_number = %quotation.quotation_number, "Quotation deleted");

        Ok(())
    }

    /// Sweep every SENT quotation past its expiry date to EXPIRED.
    #[instrument(skip(self))]
    pub async fn expire_overdue(&self) -> Result<Vec<Quotation>, AppError> {
        let today = Utc::now().date_naive();
        let stale = self.quotations.list_sent_expiring_before(today).await?;

        let mut expired = Vec::with_capacity(stale.len());
        for mut quotation in stale {
            quotation.status = QuotationStatus::Expired;
            match self
                .quotations
                .update_if_status(&quotation, QuotationStatus::Sent)
                .await
            {
                Ok(()) => {
                    QUOTATIONS_TOTAL.with_label_values(&["expired"]).inc();
                    info!(
                        quotation_number = %quotation.quotation_number,
                        expiry_date = %quotation.expiry_date,
                        "Quotation expired"
                    );
                    expired.push(quotation);
                }
                // Lost a race against another transition; leave it be.
                Err(AppError::InvalidState(_)) => {}
                Err(err) => return Err(err),
            }
        }

        Ok(expired)
    }

    fn invalid_transition(&self, quotation: &Quotation, attempted: &str) -> AppError {
        ERRORS_TOTAL.with_label_values(&["invalid_state"]).inc();
        AppError::InvalidState(anyhow::anyhow!(
            "Quotation {} is {} and cannot be {}",
            quotation.quotation_number,
            quotation.status.as_str(),
            attempted
        ))
    }
}
