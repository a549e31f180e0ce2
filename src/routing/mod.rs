//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (method, path without base prefix or query)
//!     → router.rs (exact lookup, then ordered pattern scan)
//!     → matcher.rs (anchored one-segment-per-placeholder match)
//!     → Return: ResolvedMatch { handler, params } or NotFound
//!
//! Route compilation (at startup):
//!     [[routes]] from config
//!     → parse "<METHOD> <pattern>" + "Target.operation"
//!     → compile patterns, reject duplicates
//!     → freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Exact routes beat patterns; among patterns, first registered wins
//! - Deterministic: same input always matches same route

pub mod matcher;
pub mod router;

pub use matcher::{PatternError, RoutePattern};
pub use router::{HandlerRef, InvalidHandlerRef, NotFound, PathParams, ResolvedMatch, Route, RouteTable, RouteTableError};
