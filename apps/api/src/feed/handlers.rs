//! Axum route handlers for the opportunity catalog, inbox and saved list.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feed::state::{InboxView, SavedOpportunity, SwipeDirection};
use crate::models::opportunity::{FeedFilter, Opportunity};
use crate::session::SessionSnapshot;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub filter: FeedFilter,
}

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub direction: SwipeDirection,
    #[serde(default)]
    pub filter: FeedFilter,
}

#[derive(Debug, Serialize)]
pub struct SwipeResponse {
    pub swiped: Opportunity,
    pub saved: bool,
    pub inbox: InboxView,
}

#[derive(Debug, Serialize)]
pub struct OpportunityDetails {
    pub opportunity: Opportunity,
    pub is_saved: bool,
    pub is_applied: bool,
}

/// GET /api/opportunities?filter=
pub async fn handle_list_opportunities(
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> Json<Vec<Opportunity>> {
    Json(state.catalog.filtered(query.filter).cloned().collect())
}

/// GET /api/sessions/:id/inbox?filter=
pub async fn handle_get_inbox(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> Result<Json<InboxView>, AppError> {
    let catalog = &state.catalog;
    let view = state
        .sessions
        .read(id, |s| s.feed.inbox(catalog, query.filter))
        .await?;
    Ok(Json(view))
}

/// POST /api/sessions/:id/inbox/swipe
///
/// Left skips the current card, right saves it. Either way the next card
/// matching the filter becomes current.
pub async fn handle_swipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>, AppError> {
    let catalog = &state.catalog;
    let response = state
        .sessions
        .update(id, |s| {
            let swiped = s.feed.swipe(catalog, request.filter, request.direction)?;
            Ok(SwipeResponse {
                saved: s.feed.is_saved(&swiped.id),
                swiped,
                inbox: s.feed.inbox(catalog, request.filter),
            })
        })
        .await?;
    Ok(Json(response))
}

/// GET /api/sessions/:id/saved
pub async fn handle_list_saved(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<SavedOpportunity>>, AppError> {
    Ok(Json(state.sessions.read(id, |s| s.feed.saved()).await?))
}

/// POST /api/sessions/:id/saved/:opportunity_id
pub async fn handle_save(
    State(state): State<AppState>,
    Path((id, opportunity_id)): Path<(Uuid, String)>,
) -> Result<Json<Vec<SavedOpportunity>>, AppError> {
    let catalog = &state.catalog;
    let saved = state
        .sessions
        .update(id, |s| {
            s.feed.save(catalog, &opportunity_id)?;
            Ok(s.feed.saved())
        })
        .await?;
    Ok(Json(saved))
}

/// DELETE /api/sessions/:id/saved/:opportunity_id
pub async fn handle_remove_saved(
    State(state): State<AppState>,
    Path((id, opportunity_id)): Path<(Uuid, String)>,
) -> Result<Json<Vec<SavedOpportunity>>, AppError> {
    let saved = state
        .sessions
        .update(id, |s| {
            s.feed.remove(&opportunity_id)?;
            Ok(s.feed.saved())
        })
        .await?;
    Ok(Json(saved))
}

/// POST /api/sessions/:id/applied/:opportunity_id
pub async fn handle_mark_applied(
    State(state): State<AppState>,
    Path((id, opportunity_id)): Path<(Uuid, String)>,
) -> Result<Json<Vec<SavedOpportunity>>, AppError> {
    let catalog = &state.catalog;
    let saved = state
        .sessions
        .update(id, |s| {
            s.feed.mark_applied(catalog, &opportunity_id)?;
            Ok(s.feed.saved())
        })
        .await?;
    Ok(Json(saved))
}

/// POST /api/sessions/:id/details/:opportunity_id
///
/// Selects a listing and moves the session to its details screen.
pub async fn handle_open_details(
    State(state): State<AppState>,
    Path((id, opportunity_id)): Path<(Uuid, String)>,
) -> Result<Json<OpportunityDetails>, AppError> {
    let opportunity = state
        .catalog
        .get(&opportunity_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Opportunity {opportunity_id} not found")))?;

    let details = state
        .sessions
        .update(id, |s| {
            s.navigator.open_details(&opportunity.id)?;
            Ok(OpportunityDetails {
                is_saved: s.feed.is_saved(&opportunity.id),
                is_applied: s.feed.is_applied(&opportunity.id),
                opportunity,
            })
        })
        .await?;
    Ok(Json(details))
}

/// POST /api/sessions/:id/back
///
/// Leaves the details screen for the inbox.
pub async fn handle_close_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .update(id, |s| {
            s.navigator.back()?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}
