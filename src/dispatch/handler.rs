//! The single capability every route handler provides.

use crate::config::InvoiceConfig;
use crate::http::error::AppError;
use crate::http::request::RequestContext;
use crate::http::response::Outcome;
use crate::routing::PathParams;
use crate::store::Store;

pub type HandlerResult = Result<Outcome, AppError>;

/// Collaborators shared by every handler for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    pub store: Store,
    pub terms: InvoiceConfig,
}

impl AppContext {
    pub fn new(store: Store, terms: InvoiceConfig) -> Self {
        Self { store, terms }
    }
}

/// Serves one route operation.
///
/// Path parameters arrive as captured strings in placeholder order; parsing
/// them is the handler's job.
pub trait Handler: Send + Sync {
    fn handle(&self, app: &AppContext, request: &RequestContext, params: &PathParams) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&AppContext, &RequestContext, &PathParams) -> HandlerResult + Send + Sync,
{
    fn handle(&self, app: &AppContext, request: &RequestContext, params: &PathParams) -> HandlerResult {
        self(app, request, params)
    }
}
