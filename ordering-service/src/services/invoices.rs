//! Invoice materialization from accepted quotations.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Invoice, InvoiceStatus, Quotation};
use crate::services::numbering::NumberGenerator;

/// Freezes an accepted quotation into an immutable invoice snapshot.
pub struct InvoiceFactory {
    numbers: NumberGenerator,
}

impl InvoiceFactory {
    pub fn new(number_prefix: impl Into<String>) -> Self {
        Self {
            numbers: NumberGenerator::new(number_prefix),
        }
    }

    /// Copy the quotation's amounts verbatim into a new ISSUED invoice.
    ///
    /// Nothing is recomputed here; the quotation's subtotal, discount, and
    /// total are frozen as accepted. The quotation carries no tax, so the
    /// tax amount is zero. Due date is the invoice date plus the
    /// quotation's payment terms.
    pub fn from_quotation(&self, quotation: &Quotation) -> Invoice {
        let invoice_date = Utc::now().date_naive();
        Invoice {
            invoice_id: Uuid::new_v4(),
            invoice_number: self.numbers.next(),
            order_id: quotation.order_id,
            quotation_id: quotation.quotation_id,
            subtotal: quotation.subtotal,
            tax_amount: Decimal::ZERO,
            discount_amount: quotation.discount_amount,
            total_amount: quotation.total_amount,
            invoice_date,
            due_date: invoice_date + Duration::days(i64::from(quotation.payment_terms_days)),
            payment_terms_days: quotation.payment_terms_days,
            status: InvoiceStatus::Issued,
            created_utc: Utc::now(),
        }
    }
}
