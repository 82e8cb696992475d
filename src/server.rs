// ABOUTME: HTTP server assembly: merges domain routers and applies the tower-http layers
// ABOUTME: Serves until Ctrl-C and drains in-flight requests before returning
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Courtside Coaching

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderName, HeaderValue, Method, Request},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::{info, info_span, warn, Level};

use crate::config::CorsConfig;
use crate::errors::{AppError, AppResult};
use crate::resources::ServerResources;
use crate::routes::{
    ActivityRoutes, CoachRoutes, HealthRoutes, ObservationRoutes, OrganizationRoutes, PdpRoutes,
    PlayerRoutes, SessionRoutes, TeamRoutes,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the complete application router with middleware applied
pub fn build_router(resources: &Arc<ServerResources>) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let trace = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        })
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    // Layers run top to bottom on the request
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(cors_layer(&resources.config.cors));

    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(SessionRoutes::routes(resources.clone()))
        .merge(OrganizationRoutes::routes(resources.clone()))
        .merge(CoachRoutes::routes(resources.clone()))
        .merge(TeamRoutes::routes(resources.clone()))
        .merge(PlayerRoutes::routes(resources.clone()))
        .merge(PdpRoutes::routes(resources.clone()))
        .merge(ObservationRoutes::routes(resources.clone()))
        .merge(ActivityRoutes::routes(resources.clone()))
        .layer(middleware)
}

/// Build the CORS layer from configuration
///
/// `*` allows any origin without credentials. An explicit list allows the
/// auth cookie to be sent. An empty list permits no cross-origin requests.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if config.allows_any() {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return base;
    }
    base.allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
}

/// Bind and serve until Ctrl-C
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
pub async fn serve(resources: Arc<ServerResources>) -> AppResult<()> {
    let address = resources.config.bind_address();
    let app = build_router(&resources);

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {address}: {e}")))?;
    info!("Courtside server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    info!("Courtside server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, draining connections"),
        Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
    }
}
