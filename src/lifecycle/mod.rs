//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build route table → Seed store
//!         → Resolve every handler → HttpServer
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → Trigger broadcast → Stop accepting → Drain in-flight → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, reported in full
//! - Listeners start last (traffic only when every handler resolved)

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build_dispatcher, build_server, StartupError};
