//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the portal.
//! All types derive Serde traits for deserialization from config files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Root configuration for the rental portal.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Application mode and deployment base path.
    pub app: AppSection,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request hardening.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Invoice generation settings.
    pub invoices: InvoiceConfig,

    /// Route table, in registration order.
    pub routes: Vec<RouteConfig>,

    /// Records loaded into the store at startup.
    pub seed: SeedConfig,
}

/// Controls how much diagnostic detail reaches the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    Development,
    #[default]
    Production,
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppSection {
    /// Display name, used in logs and the dashboard.
    pub name: String,

    pub mode: AppMode,

    /// Deployment prefix stripped before routing (e.g. "/rental").
    /// Empty when served from the root.
    pub base_path: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "shopfront".to_string(),
            mode: AppMode::Production,
            base_path: String::new(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 256 * 1024, // 256KB, forms only
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InvoiceConfig {
    /// Day of the billing month an invoice falls due (1..=28).
    pub due_day: u32,

    /// Months of rent held as deposit on new leases.
    pub deposit_months: u32,

    /// Lease term offered on approval, in months.
    pub lease_term_months: u32,
}

impl Default for InvoiceConfig {
    fn default() -> Self {
        Self {
            due_day: 10,
            deposit_months: 2,
            lease_term_months: 12,
        }
    }
}

/// One route table entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Composite key, e.g. "GET /shops/{id}".
    pub route: String,

    /// Handler reference, e.g. "ShopController.show".
    pub handler: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SeedConfig {
    pub shops: Vec<ShopSeed>,
}

/// A shop loaded into the catalog at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShopSeed {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub floor: i32,
    pub area_sqm: u32,
    pub monthly_rent_cents: i64,
}
