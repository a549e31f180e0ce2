//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, front controller)
//!     → request.rs (strip base path, decode query/body, request ID)
//!     → [routing resolves, dispatch invokes the handler]
//!     → response.rs (Outcome → view envelope, JSON, redirect)
//!     → error.rs (404 / 500 / handler errors)
//!     → Send to client
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::AppError;
pub use request::{RequestContext, X_REQUEST_ID};
pub use response::Outcome;
pub use server::HttpServer;
