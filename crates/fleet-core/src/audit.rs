// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Security audit events and sinks.
//!
//! Authentication attempts, authorization denials, and mutating operations
//! emit [`AuditEvent`]s into an [`AuditSink`]. The sink is injected at
//! startup; the default deployment uses [`TracingAuditSink`] which writes
//! events into the structured log stream.

use std::net::IpAddr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Audit Event
// =============================================================================

/// Audited action categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Successful login.
    Login,
    /// Failed login attempt.
    LoginFailed,
    /// Request rejected during token verification.
    AuthenticationFailed,
    /// Request rejected by the access policy.
    AuthorizationDenied,
    /// A record was created.
    RecordCreated,
    /// A record was updated.
    RecordUpdated,
    /// A record was deleted.
    RecordDeleted,
}

impl AuditAction {
    /// Returns the action as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Login => "login",
            AuditAction::LoginFailed => "login_failed",
            AuditAction::AuthenticationFailed => "authentication_failed",
            AuditAction::AuthorizationDenied => "authorization_denied",
            AuditAction::RecordCreated => "record_created",
            AuditAction::RecordUpdated => "record_updated",
            AuditAction::RecordDeleted => "record_deleted",
        }
    }
}

/// A single audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub id: Uuid,
    /// Event time.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub action: AuditAction,
    /// Acting identity, when known.
    pub actor: Option<String>,
    /// Affected resource, e.g. `vehicle/12`.
    pub resource: Option<String>,
    /// Client address, when known.
    pub client_ip: Option<IpAddr>,
    /// Additional detail.
    pub detail: Option<String>,
}

impl AuditEvent {
    /// Creates a new event for the given action.
    pub fn new(action: AuditAction) -> Self {
        Self {
            id: Uuid::now_v7(),
            timestamp: Utc::now(),
            action,
            actor: None,
            resource: None,
            client_ip: None,
            detail: None,
        }
    }

    /// Sets the acting identity.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Sets the affected resource.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Sets the client address.
    pub fn with_client_ip(mut self, ip: IpAddr) -> Self {
        self.client_ip = Some(ip);
        self
    }

    /// Sets additional detail.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// =============================================================================
// Audit Sink
// =============================================================================

/// Destination for audit events.
///
/// Implementations must be cheap enough to call on the request path; anything
/// slow should buffer internally.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Records a single event.
    async fn record(&self, event: AuditEvent);
}

/// Sink that discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAuditSink;

#[async_trait]
impl AuditSink for NoOpAuditSink {
    async fn record(&self, _event: AuditEvent) {}
}

/// Sink that emits events as structured tracing records.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) {
        tracing::info!(
            target: "fleet::audit",
            event_id = %event.id,
            action = event.action.as_str(),
            actor = event.actor.as_deref().unwrap_or("-"),
            resource = event.resource.as_deref().unwrap_or("-"),
            client_ip = ?event.client_ip,
            detail = event.detail.as_deref().unwrap_or(""),
            "audit"
        );
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let event = AuditEvent::new(AuditAction::AuthorizationDenied)
            .with_actor("alice")
            .with_resource("vehicle/3")
            .with_detail("missing capability");

        assert_eq!(event.action, AuditAction::AuthorizationDenied);
        assert_eq!(event.actor.as_deref(), Some("alice"));
        assert_eq!(event.resource.as_deref(), Some("vehicle/3"));
    }

    #[tokio::test]
    async fn test_noop_sink() {
        let sink = NoOpAuditSink;
        sink.record(AuditEvent::new(AuditAction::Login)).await;
    }
}
