//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     RouteTable + HandlerRegistry (controllers::registry)
//!     → dispatcher.rs resolves every HandlerRef eagerly
//!     → any miss: Vec<HandlerResolutionError>, process refuses to start
//!
//! Per request:
//!     ResolvedMatch { handler, params }
//!     → registry.rs lookup (Target → operation → Arc<dyn Handler>)
//!     → handler.rs Handler::handle(app, request, params)
//!     → Outcome or AppError
//! ```
//!
//! # Design Decisions
//! - Handlers are typed function references, never looked up by reflection
//! - The dispatcher is immutable and shared via Arc; no locks
//! - A miss at dispatch time is still reported, never swallowed

pub mod dispatcher;
pub mod handler;
pub mod registry;

pub use dispatcher::Dispatcher;
pub use handler::{AppContext, Handler, HandlerResult};
pub use registry::{HandlerRegistry, HandlerResolutionError};
