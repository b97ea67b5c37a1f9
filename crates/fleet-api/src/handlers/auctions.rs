// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Auction listing handlers.
//!
//! Browsing is public; creating and removing listings is gated.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;

use fleet_core::{AuctionListing, ListingId, VehicleId};

use crate::auth::Capability;
use crate::error::ApiResult;
use crate::extractors::{Auth, IdPath, ValidatedJson};
use crate::state::AppState;

// =============================================================================
// Payloads
// =============================================================================

/// Listing creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateListingRequest {
    /// Vehicle being auctioned.
    pub vehicle_id: VehicleId,
    /// Listing description.
    pub details: Option<String>,
    /// Image URL references.
    #[serde(default)]
    pub images: Vec<String>,
}

// =============================================================================
// Create
// =============================================================================

/// POST /auctions
pub async fn create_listing(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    ValidatedJson(request): ValidatedJson<CreateListingRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::AuctionManage)?;

    let mut listing = AuctionListing::new(ListingId::new(0), request.vehicle_id);
    listing.details = request.details;
    listing.images = request.images;

    let listing = state.store().create_listing(listing).await?;

    tracing::info!(listing_id = %listing.id, actor = %ctx.subject(), "auction listing created");

    Ok(Json(listing))
}

// =============================================================================
// Browse (public)
// =============================================================================

/// GET /auctions
pub async fn list_listings(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store().list_listings().await))
}

/// GET /auctions/{id}
pub async fn get_listing(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    let listing = state.store().get_listing(ListingId::new(id)).await?;
    Ok(Json(listing))
}

// =============================================================================
// Delete
// =============================================================================

/// DELETE /auctions/{id}
pub async fn delete_listing(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    IdPath(id): IdPath,
) -> ApiResult<impl IntoResponse> {
    state
        .policy()
        .authorize(&ctx.credential, Capability::AuctionManage)?;

    state.store().delete_listing(ListingId::new(id)).await?;

    tracing::info!(listing_id = %id, actor = %ctx.subject(), "auction listing deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
