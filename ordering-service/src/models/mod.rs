//! Domain models for ordering-service.

mod catalog;
mod invoice;
mod order;
mod quotation;

pub use catalog::Variant;
pub use invoice::{Invoice, InvoiceStatus};
pub use order::{
    CreateOrderLine, Order, OrderLine, OrderLineStatus, OrderTotals, UpdateOrderLine,
};
pub use quotation::{
    GenerateQuotation, Quotation, QuotationLine, QuotationStatus, UpdateQuotation,
};
