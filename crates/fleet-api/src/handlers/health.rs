// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health check handlers.

use axum::{response::IntoResponse, Json};

use crate::response::HealthResponse;

/// GET /health
///
/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

/// GET /ready
///
/// Readiness probe. The store and policy table are in-process, so readiness
/// coincides with liveness.
pub async fn ready() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_ok() {
        let response = HealthResponse::healthy();
        assert_eq!(response.status, "ok");
        assert_eq!(response.version, crate::VERSION);
    }
}
