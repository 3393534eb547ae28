//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with a single dispatch handler
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener and shut down gracefully
//! - Hand every request to the compiled route table
//! - Observability (metrics, correlation IDs)

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::request::{request_context, request_id, MakeRequestUuidV4};
use crate::http::response::{error_status, status_response};
use crate::lifecycle::shutdown_signal;
use crate::observability::metrics::{self, NO_ROUTE};
use crate::routing::{Dispatched, ResolveError, RouterTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouterTable>,
    pub max_body_bytes: usize,
}

/// HTTP server for a compiled route table.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `table` with the given configuration.
    pub fn new(config: AppConfig, table: Arc<RouterTable>) -> Self {
        let state = AppState {
            table,
            max_body_bytes: config.limits.max_body_bytes,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id(request.headers()).unwrap_or("unknown"),
                    )
                }),
            )
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for serving without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until SIGINT or SIGTERM.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Run the server until `shutdown` completes, then drain in-flight requests.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Buffer the body, build the handler context and dispatch through the route table.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();

    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, limit = state.max_body_bytes, "Request body rejected");
            metrics::record_request(NO_ROUTE, StatusCode::PAYLOAD_TOO_LARGE.as_u16(), start);
            return status_response(StatusCode::PAYLOAD_TOO_LARGE);
        }
    };

    let ctx = request_context(&parts, &body, Arc::clone(&state.table));
    let table = Arc::clone(&state.table);

    // Handlers are synchronous and may block on their store.
    match tokio::task::spawn_blocking(move || table.dispatch(&ctx)).await {
        Ok(Ok(Dispatched { route, response })) => {
            metrics::record_request(&route, response.status().as_u16(), start);
            response.into_response()
        }
        Ok(Err(err)) => {
            let status = error_status(&err);
            let route = match &err {
                ResolveError::Handler { route, .. } => route.as_str(),
                _ => NO_ROUTE,
            };
            if status.is_server_error() {
                tracing::error!(error = %err, route = %route, "Request failed");
            } else {
                tracing::debug!(error = %err, route = %route, status = %status, "Request rejected");
            }
            metrics::record_request(route, status.as_u16(), start);
            status_response(status)
        }
        Err(e) => {
            tracing::error!(error = %e, "Dispatch task failed");
            metrics::record_request(NO_ROUTE, 500, start);
            status_response(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use tower::ServiceExt;

    use super::*;
    use crate::routing::{LeafResult, RouteCompiler, RouteNode};

    fn server(max_body_bytes: usize) -> HttpServer {
        let root = RouteNode::root()
            .child(RouteNode::new("hello").view(|_, _| Ok(LeafResult::content("hi"))));
        let table = RouteCompiler::default().compile(&root).unwrap();
        let mut config = AppConfig::default();
        config.limits.max_body_bytes = max_body_bytes;
        HttpServer::new(config, Arc::new(table))
    }

    #[tokio::test]
    async fn test_dispatches_and_sets_request_id() {
        let response = server(1024)
            .router()
            .oneshot(Request::get("/hello").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"hi");
    }

    #[tokio::test]
    async fn test_unknown_path_is_404() {
        let response = server(1024)
            .router()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let response = server(4)
            .router()
            .oneshot(
                Request::post("/hello")
                    .body(Body::from("0123456789"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
