//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the JSON-RPC and health handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Serve until the shutdown coordinator fires

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::Request,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::NodeConfig;
use crate::http::request::{request_id_of, UuidRequestId, X_REQUEST_ID};
use crate::http::rpc::{self, RpcError, RpcRequest, RpcResponse};
use crate::service::Service;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Service,
}

/// HTTP server exposing the service over JSON-RPC.
pub struct HttpServer {
    router: Router,
    config: NodeConfig,
}

impl HttpServer {
    pub fn new(config: NodeConfig, service: Service) -> Self {
        let state = AppState { service };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &NodeConfig, state: AppState) -> Router {
        Router::new()
            .route(&config.rpc.endpoint, post(rpc_handler))
            .route("/health", get(health_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.rpc.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.rpc.request_timeout_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id_of(request),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            endpoint = %self.config.rpc.endpoint,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
}

/// JSON-RPC entry point. Always answers 200 with a JSON-RPC envelope.
async fn rpc_handler(State(state): State<AppState>, body: Bytes) -> Json<RpcResponse> {
    let value: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => return Json(RpcResponse::failure(Value::Null, RpcError::parse_error(e))),
    };
    let id = value.get("id").cloned().unwrap_or(Value::Null);
    let request: RpcRequest = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => return Json(RpcResponse::failure(id, RpcError::invalid_request(e))),
    };

    tracing::debug!(method = %request.method, "Dispatching RPC call");
    Json(rpc::dispatch(&state.service, request))
}

async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "pendingTxs": state.service.pool().len(),
    }))
}
