//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Front controller, dispatcher, store:
//!     → logging.rs (structured tracing events with request_id)
//!     → metrics.rs (request counters, latency histogram)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the request-id layer into every log line
//! - Route misses are counted, never logged above debug

pub mod logging;
pub mod metrics;
