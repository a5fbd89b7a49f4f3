//! service-core: Shared infrastructure for the EV wholesale ordering platform.
pub mod config;
pub mod error;
pub mod observability;

pub use anyhow;
pub use serde;
pub use tracing;
pub use validator;
