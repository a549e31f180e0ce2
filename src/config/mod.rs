//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → route table, store seed, server settings built from it once
//! ```
//!
//! # Design Decisions
//! - Config is loaded once per process; there is no runtime reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::AppConfig;
pub use schema::AppMode;
pub use schema::InvoiceConfig;
pub use schema::ObservabilityConfig;
pub use schema::RouteConfig;
pub use schema::SeedConfig;
pub use schema::ShopSeed;
