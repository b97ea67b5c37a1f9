// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::handlers;
use crate::middleware::AuthLayer;
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a new API server with the given state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Creates the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let cors = create_cors_layer(&self.config);
        let auth = AuthLayer::new(
            self.state.token_authority.clone(),
            self.state.access_policy.clone(),
        )
        .with_audit(self.state.audit.clone())
        .with_public_paths(vec![
            "/health".to_string(),
            "/ready".to_string(),
            "/login".to_string(),
            "/users".to_string(),
            "/auctions".to_string(),
            "/auctions/*".to_string(),
        ]);

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::new(self.config.request_timeout))
            .layer(cors)
            .layer(auth);

        Router::new()
            // Health endpoints (public)
            .route("/health", get(handlers::health))
            .route("/ready", get(handlers::ready))
            // Auth endpoints
            .route("/login", post(handlers::login))
            .route("/me", get(handlers::me))
            // Vehicle endpoints
            .route(
                "/vehicles",
                get(handlers::list_vehicles).post(handlers::create_vehicle),
            )
            .route("/vehicles/register", post(handlers::register_vehicle))
            .route("/vehicles/assign", post(handlers::assign_vehicle))
            .route("/vehicles/unassign", post(handlers::unassign_vehicle))
            .route(
                "/vehicles/{id}",
                get(handlers::get_vehicle)
                    .put(handlers::update_vehicle)
                    .delete(handlers::delete_vehicle),
            )
            .route("/vehicles/{id}/activate", post(handlers::activate_vehicle))
            .route(
                "/vehicles/{id}/maintenance",
                get(handlers::list_vehicle_maintenance),
            )
            .route("/vehicles/{id}/fueling", get(handlers::list_vehicle_fueling))
            // User endpoints (creation is public for bootstrap)
            .route(
                "/users",
                get(handlers::list_users).post(handlers::create_user),
            )
            .route(
                "/users/{id}",
                get(handlers::get_user)
                    .put(handlers::update_user)
                    .delete(handlers::delete_user),
            )
            .route(
                "/users/{id}/maintenance",
                get(handlers::list_user_maintenance),
            )
            .route("/users/{id}/fueling", get(handlers::list_user_fueling))
            // Task endpoints
            .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
            .route(
                "/tasks/{id}",
                get(handlers::get_task)
                    .put(handlers::update_task)
                    .delete(handlers::delete_task),
            )
            // Maintenance endpoints
            .route(
                "/maintenance",
                get(handlers::list_maintenance).post(handlers::create_maintenance),
            )
            .route(
                "/maintenance/{id}",
                get(handlers::get_maintenance)
                    .put(handlers::update_maintenance)
                    .delete(handlers::delete_maintenance),
            )
            // Fueling endpoints
            .route(
                "/fueling",
                get(handlers::list_fueling).post(handlers::create_fueling),
            )
            .route(
                "/fueling/{id}",
                get(handlers::get_fueling).delete(handlers::delete_fueling),
            )
            // Auction endpoints (browsing is public)
            .route(
                "/auctions",
                get(handlers::list_listings).post(handlers::create_listing),
            )
            .route(
                "/auctions/{id}",
                get(handlers::get_listing).delete(handlers::delete_listing),
            )
            // Report endpoints
            .route("/reports/vehicles/{id}", get(handlers::vehicle_report))
            // Apply middleware and state
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server.
    pub async fn run(self) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("failed to bind: {}", e)))?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(|e| crate::error::ApiError::internal(format!("server error: {}", e)))?;

        Ok(())
    }

    /// Runs the server with graceful shutdown.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::ApiError::internal(format!("failed to bind: {}", e)))?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| crate::error::ApiError::internal(format!("server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = &config.cors;

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    CorsLayer::new()
        .max_age(Duration::from_secs(cors.max_age))
        .allow_origin(Any)
        .allow_methods(methods)
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_key, TokenConfig};

    fn test_state() -> AppState {
        let config = ApiConfig::default().with_token(TokenConfig::new(generate_key()));
        AppState::builder().config(config).build().unwrap()
    }

    #[test]
    fn test_router_creation() {
        let server = ApiServer::new(test_state());
        let _router = server.router();
    }

    #[test]
    fn test_server_addr() {
        let server = ApiServer::new(test_state());
        assert_eq!(server.addr().port(), 8080);
    }
}
