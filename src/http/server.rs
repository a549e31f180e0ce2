//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the front controller as its only handler
//! - Wire up middleware (tracing, request ID, timeout, body limit)
//! - Bind server to listener and stop on the shutdown signal
//! - Resolve and dispatch every request through the route table
//! - Map NotFound / resolution failures / handler errors to responses

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, AppMode};
use crate::dispatch::Dispatcher;
use crate::http::error::{self, AppError};
use crate::http::request::{strip_base_path, RequestContext, X_REQUEST_ID};
use crate::observability::metrics;

/// Application state injected into the front controller.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub mode: AppMode,
    pub base_path: Arc<str>,
    pub body_limit: usize,
}

/// HTTP server for the rental portal.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server around an already-built dispatcher.
    pub fn new(config: AppConfig, dispatcher: Dispatcher) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
            mode: config.app.mode,
            base_path: Arc::from(config.app.base_path.as_str()),
            body_limit: config.security.max_body_size,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .fallback(front_controller)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = %self.config.app.mode,
            base_path = %self.config.app.base_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Front controller: every request lands here.
async fn front_controller(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let method = request.method().as_str().to_string();
    let uri_path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or_default().to_string();
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let Some(path) = strip_base_path(&state.base_path, &uri_path).map(str::to_string) else {
        tracing::debug!(request_id = %request_id, path = %uri_path, "Outside base path");
        metrics::record_request(&method, StatusCode::NOT_FOUND.as_u16(), "none", start_time);
        return error::not_found();
    };

    let body = match axum::body::to_bytes(request.into_body(), state.body_limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Request body rejected");
            metrics::record_request(&method, StatusCode::PAYLOAD_TOO_LARGE.as_u16(), "none", start_time);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let context = match RequestContext::new(method.clone(), path)
        .with_request_id(request_id.clone())
        .with_query(&query)
        .with_body(content_type.as_deref(), &body)
    {
        Ok(context) => context,
        Err(e) => {
            metrics::record_request(&method, e.status().as_u16(), "none", start_time);
            return e.into_response();
        }
    };

    // 1. Resolve
    let matched = match state.dispatcher.resolve(&context.method, &context.path) {
        Ok(m) => m,
        Err(not_found) => {
            tracing::debug!(request_id = %request_id, error = %not_found, "No route matched");
            metrics::record_request(&method, StatusCode::NOT_FOUND.as_u16(), "none", start_time);
            return error::not_found();
        }
    };
    let handler = matched.handler.to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %context.method,
        path = %context.path,
        handler = %handler,
        "Dispatching"
    );

    // 2. Dispatch
    let response = match state.dispatcher.dispatch(&matched, &context) {
        Ok(Ok(outcome)) => {
            tracing::debug!(request_id = %request_id, outcome = outcome.kind(), "Handler finished");
            outcome.into_http(&state.base_path)
        }
        Ok(Err(app_error)) => handler_failure(app_error, &request_id, &handler),
        Err(resolution) => error::resolution_failure(&resolution, state.mode, &request_id),
    };

    metrics::record_request(&method, response.status().as_u16(), &handler, start_time);
    response
}

fn handler_failure(err: AppError, request_id: &str, handler: &str) -> Response {
    tracing::info!(
        request_id = %request_id,
        handler = %handler,
        status = err.status().as_u16(),
        error = %err,
        "Handler rejected request"
    );
    err.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{AppContext, HandlerRegistry, HandlerResult};
    use crate::http::response::Outcome;
    use crate::routing::{PathParams, RouteTable};
    use axum::body::to_bytes;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn show(_: &AppContext, _: &RequestContext, params: &PathParams) -> HandlerResult {
        Ok(Outcome::Json(json!({ "id": params.get("id") })))
    }

    fn server(mode: AppMode, base_path: &str) -> HttpServer {
        let mut config = AppConfig::default();
        config.app.mode = mode;
        config.app.base_path = base_path.to_string();

        let table = RouteTable::from_pairs([("GET /shops/{id}", "ShopController.show")]).unwrap();
        let registry = HandlerRegistry::new().with("ShopController", "show", show);
        let dispatcher = Dispatcher::new(table, registry, AppContext::default()).unwrap();
        HttpServer::new(config, dispatcher)
    }

    async fn get(server: &HttpServer, uri: &str) -> (StatusCode, Value) {
        let response = server
            .router()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_dispatches_through_base_path() {
        let server = server(AppMode::Production, "/rental");
        let (status, body) = get(&server, "/rental/shops/7?x=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": "7" }));
    }

    #[tokio::test]
    async fn test_outside_base_path_is_not_found() {
        let server = server(AppMode::Production, "/rental");
        let (status, _) = get(&server, "/shops/7").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unmatched_route_is_not_found() {
        let server = server(AppMode::Production, "");
        let (status, body) = get(&server, "/shops/7/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Page not found");
    }

    #[tokio::test]
    async fn test_request_id_is_propagated() {
        let server = server(AppMode::Production, "");
        let response = server
            .router()
            .oneshot(Request::get("/shops/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key(X_REQUEST_ID));
    }
}
