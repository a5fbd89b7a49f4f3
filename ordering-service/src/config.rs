//! Configuration for ordering-service.

use config::{Config as Cfg, File};
use serde::Deserialize;
use service_core::config::CommonConfig;
use service_core::error::AppError;

/// Engine settings consumed by the ordering services.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderingSettings {
    /// Days a generated quotation stays valid before it expires.
    #[serde(default = "default_validity_days")]
    pub quotation_validity_days: i32,
    /// Payment terms applied when the order does not carry its own.
    #[serde(default = "default_payment_terms_days")]
    pub payment_terms_days: i32,
    #[serde(default = "default_quotation_prefix")]
    pub quotation_number_prefix: String,
    #[serde(default = "default_invoice_prefix")]
    pub invoice_number_prefix: String,
}

impl Default for OrderingSettings {
    fn default() -> Self {
        Self {
            quotation_validity_days: default_validity_days(),
            payment_terms_days: default_payment_terms_days(),
            quotation_number_prefix: default_quotation_prefix(),
            invoice_number_prefix: default_invoice_prefix(),
        }
    }
}

fn default_validity_days() -> i32 {
    30
}

fn default_payment_terms_days() -> i32 {
    30
}

fn default_quotation_prefix() -> String {
    "DQ".to_string()
}

fn default_invoice_prefix() -> String {
    "INV".to_string()
}

/// Full service configuration: shared settings plus the engine's own.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderingConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub settings: OrderingSettings,
}

impl OrderingConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
