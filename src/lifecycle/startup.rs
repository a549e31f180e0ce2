//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the route table from `[[routes]]`
//! - Seed the store
//! - Resolve every handler reference before any traffic is accepted
//!
//! # Design Decisions
//! - Every unresolvable handler is reported, not just the first
//! - The config is assumed validated (`load_config` does this)

use thiserror::Error;

use crate::config::AppConfig;
use crate::controllers;
use crate::dispatch::{AppContext, Dispatcher, HandlerResolutionError};
use crate::http::HttpServer;
use crate::routing::{RouteTable, RouteTableError};
use crate::store::Store;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("route table rejected: {0}")]
    RouteTable(#[from] RouteTableError),

    #[error("unresolvable handlers: {}", join(.0))]
    Handlers(Vec<HandlerResolutionError>),
}

fn join(errors: &[HandlerResolutionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Route table, seeded store and handler registry, wired together.
pub fn build_dispatcher(config: &AppConfig) -> Result<Dispatcher, StartupError> {
    let table = RouteTable::from_pairs(
        config
            .routes
            .iter()
            .map(|r| (r.route.as_str(), r.handler.as_str())),
    )?;

    let store = Store::from_seed(&config.seed);
    let app = AppContext::new(store, config.invoices.clone());

    let dispatcher =
        Dispatcher::new(table, controllers::registry(), app).map_err(StartupError::Handlers)?;

    tracing::info!(
        routes = dispatcher.table().len(),
        shops = config.seed.shops.len(),
        "Routes resolved, store seeded"
    );
    Ok(dispatcher)
}

pub fn build_server(config: AppConfig) -> Result<HttpServer, StartupError> {
    let dispatcher = build_dispatcher(&config)?;
    Ok(HttpServer::new(config, dispatcher))
}
