//! Typed handler registry.
//!
//! # Responsibilities
//! - Map `Target` → `operation` → handler function
//! - Resolve a `HandlerRef` to an invocable handler
//!
//! # Design Decisions
//! - Built in code, so every registered handler is type-checked
//! - Misses are reported as `HandlerResolutionError`, never as NotFound

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::dispatch::handler::Handler;
use crate::routing::HandlerRef;

/// A route references a handler the registry does not know.
///
/// This is a configuration defect, not a request error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerResolutionError {
    #[error("handler `{handler}` names unknown target `{target}`")]
    UnknownTarget { handler: String, target: String },

    #[error("handler `{handler}`: target `{target}` has no operation `{operation}`")]
    UnknownOperation {
        handler: String,
        target: String,
        operation: String,
    },
}

#[derive(Default)]
pub struct HandlerRegistry {
    targets: HashMap<String, HashMap<String, Arc<dyn Handler>>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` as `target.operation`, replacing any previous one.
    pub fn register<H>(&mut self, target: &str, operation: &str, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        self.targets
            .entry(target.to_string())
            .or_default()
            .insert(operation.to_string(), Arc::new(handler));
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<H>(mut self, target: &str, operation: &str, handler: H) -> Self
    where
        H: Handler + 'static,
    {
        self.register(target, operation, handler);
        self
    }

    pub fn lookup(&self, handler: &HandlerRef) -> Result<Arc<dyn Handler>, HandlerResolutionError> {
        let operations =
            self.targets
                .get(handler.target())
                .ok_or_else(|| HandlerResolutionError::UnknownTarget {
                    handler: handler.to_string(),
                    target: handler.target().to_string(),
                })?;

        operations
            .get(handler.operation())
            .cloned()
            .ok_or_else(|| HandlerResolutionError::UnknownOperation {
                handler: handler.to_string(),
                target: handler.target().to_string(),
                operation: handler.operation().to_string(),
            })
    }

    /// Number of registered operations across all targets.
    pub fn len(&self) -> usize {
        self.targets.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self
            .targets
            .iter()
            .flat_map(|(t, ops)| ops.keys().map(move |op| format!("{t}.{op}")))
            .collect();
        names.sort();
        f.debug_struct("HandlerRegistry").field("handlers", &names).finish()
    }
}
