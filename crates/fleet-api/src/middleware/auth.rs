// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer-token authentication middleware.
//!
//! Verifies the `Authorization: Bearer <token>` header on every request and
//! injects an [`AuthContext`] into request extensions. The request state
//! machine is: unauthenticated → (verify) → authenticated → (per-handler
//! policy check) → authorized or forbidden. Verification failures are
//! terminal for the request; nothing is retried.

use std::collections::HashSet;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use uuid::Uuid;

use fleet_core::audit::{AuditAction, AuditEvent, AuditSink, NoOpAuditSink};

use crate::auth::{AccessPolicy, AuthContext, TokenAuthority};
use crate::error::ApiError;

// =============================================================================
// Header Parsing
// =============================================================================

/// Extracts the token from an `Authorization` header value.
///
/// The header must contain at least two whitespace-separated fields and the
/// first must equal `bearer` case-insensitively.
pub(crate) fn parse_bearer(value: &str) -> Result<&str, ApiError> {
    let mut fields = value.split_whitespace();
    let scheme = fields
        .next()
        .ok_or_else(|| ApiError::unauthorized("malformed authorization header"))?;
    let token = fields
        .next()
        .ok_or_else(|| ApiError::unauthorized("malformed authorization header"))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ApiError::unauthorized("authorization scheme must be bearer"));
    }

    Ok(token)
}

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer wrapping services with bearer-token verification.
#[derive(Clone)]
pub struct AuthLayer {
    authority: Arc<TokenAuthority>,
    policy: Arc<AccessPolicy>,
    audit: Arc<dyn AuditSink>,
    public_paths: Arc<HashSet<String>>,
}

impl AuthLayer {
    /// Creates a new auth layer.
    pub fn new(authority: Arc<TokenAuthority>, policy: Arc<AccessPolicy>) -> Self {
        Self {
            authority,
            policy,
            audit: Arc::new(NoOpAuditSink),
            public_paths: Arc::new(HashSet::new()),
        }
    }

    /// Sets the audit sink.
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Sets paths that do not require a credential. A trailing `*` matches
    /// by prefix.
    pub fn with_public_paths(mut self, paths: Vec<String>) -> Self {
        self.public_paths = Arc::new(paths.into_iter().collect());
        self
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            authority: self.authority.clone(),
            policy: self.policy.clone(),
            audit: self.audit.clone(),
            public_paths: self.public_paths.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware performing bearer-token verification.
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    authority: Arc<TokenAuthority>,
    policy: Arc<AccessPolicy>,
    audit: Arc<dyn AuditSink>,
    public_paths: Arc<HashSet<String>>,
}

impl<S> AuthMiddleware<S> {
    fn is_public_path(&self, path: &str) -> bool {
        if self.public_paths.contains(path) {
            return true;
        }
        for public in self.public_paths.iter() {
            if let Some(prefix) = public.strip_suffix('*') {
                if path.starts_with(prefix) {
                    return true;
                }
            }
        }
        false
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let authority = self.authority.clone();
        let policy = self.policy.clone();
        let audit = self.audit.clone();
        let is_public = self.is_public_path(req.uri().path());
        let path = req.uri().path().to_string();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let request_id = Uuid::now_v7();
            let client_ip = req
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip());

            let header_value = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            let verified = match header_value {
                Some(value) => match parse_bearer(&value) {
                    Ok(token) => match authority.verify(token) {
                        Ok(credential) => Ok(credential),
                        Err(e) => Err(ApiError::from(e)),
                    },
                    Err(e) => Err(e),
                },
                None => Err(ApiError::unauthorized("authorization header is required")),
            };

            match verified {
                Ok(credential) => {
                    let capabilities = policy.capabilities(credential.role);
                    let mut ctx = AuthContext::new(credential, capabilities)
                        .with_request_id(request_id);
                    if let Some(ip) = client_ip {
                        ctx = ctx.with_client_ip(ip);
                    }
                    req.extensions_mut().insert(ctx);
                }
                Err(e) if is_public => {
                    // Public paths accept anonymous requests; a broken header
                    // is logged but not fatal here.
                    tracing::debug!(%path, error = %e, "anonymous request on public path");
                }
                Err(e) => {
                    tracing::debug!(%path, error = %e, "authentication failed");
                    let mut event = AuditEvent::new(AuditAction::AuthenticationFailed)
                        .with_resource(path)
                        .with_detail(e.to_string());
                    if let Some(ip) = client_ip {
                        event = event.with_client_ip(ip);
                    }
                    tokio::spawn(async move { audit.record(event).await });
                    return Ok(e.into_response());
                }
            }

            inner.call(req).await
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
