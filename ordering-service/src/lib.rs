//! ordering-service: the order-to-invoice workflow engine for EV wholesale.
//!
//! A dealer places a bulk order for vehicle variants and colors; manufacturer
//! staff converts the order into a priced quotation; the dealer accepts or
//! rejects it; an accepted quotation is frozen into an invoice. Order-line
//! creation is gated by an inventory admission check so a line can never
//! claim more vehicles than remain once other pending orders are counted.
//!
//! Persistence and transport are supplied by the embedder through the narrow
//! interfaces in [`stores`]; an in-memory implementation backs the tests.
pub mod config;
pub mod models;
pub mod services;
pub mod stores;
