//! Quotation and invoice number generation.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Generates document numbers of the form `<prefix>-<UTC timestamp><seq>`.
///
/// The format is a human convention, not a contract other systems parse.
/// The process-wide sequence keeps numbers generated within the same second
/// distinct; the stores additionally reject duplicates with `Conflict`.
pub struct NumberGenerator {
    prefix: String,
    sequence: AtomicU64,
}

impl NumberGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn next(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!(
            "{}-{}{:04}",
            self.prefix,
            Utc::now().format("%Y%m%d%H%M%S"),
            seq
        )
    }
}
