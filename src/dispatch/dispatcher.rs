//! Route resolution plus handler invocation.

use std::sync::Arc;

use crate::dispatch::handler::{AppContext, HandlerResult};
use crate::dispatch::registry::{HandlerRegistry, HandlerResolutionError};
use crate::http::request::RequestContext;
use crate::routing::{NotFound, ResolvedMatch, RouteTable};

/// Owns the route table, the handler registry and the handler collaborators.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
    registry: Arc<HandlerRegistry>,
    app: AppContext,
}

impl Dispatcher {
    /// Build a dispatcher, resolving every route's handler up front.
    ///
    /// All unresolvable references are returned together so a bad table is
    /// reported in one pass.
    pub fn new(
        table: RouteTable,
        registry: HandlerRegistry,
        app: AppContext,
    ) -> Result<Self, Vec<HandlerResolutionError>> {
        let errors: Vec<HandlerResolutionError> = table
            .routes()
            .iter()
            .filter_map(|route| registry.lookup(&route.handler).err())
            .collect();

        if !errors.is_empty() {
            return Err(errors);
        }

        tracing::debug!(
            routes = table.len(),
            handlers = registry.len(),
            "Dispatcher ready"
        );

        Ok(Self {
            table: Arc::new(table),
            registry: Arc::new(registry),
            app,
        })
    }

    pub fn resolve(&self, method: &str, raw_path: &str) -> Result<ResolvedMatch, NotFound> {
        self.table.resolve(method, raw_path)
    }

    /// Invoke the handler named by `matched`.
    ///
    /// The outer error is a misconfiguration; the inner result is whatever
    /// the handler returned.
    pub fn dispatch(
        &self,
        matched: &ResolvedMatch,
        request: &RequestContext,
    ) -> Result<HandlerResult, HandlerResolutionError> {
        let handler = self.registry.lookup(&matched.handler)?;
        Ok(handler.handle(&self.app, request, &matched.params))
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }
}
