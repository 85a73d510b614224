//! Axum route handlers for sessions, onboarding navigation and the profile.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::opportunity::FeedFilter;
use crate::models::profile::{ProfileUpdate, UserProfile};
use crate::onboarding::flow::Screen;
use crate::session::SessionSnapshot;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub screen: Screen,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub display_name: String,
    pub avatar: Option<String>,
    pub saved_count: usize,
    pub applied_count: usize,
    pub inbox_remaining: usize,
}

/// POST /api/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    (StatusCode::CREATED, Json(state.sessions.create().await))
}

/// GET /api/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.sessions.read(id, |s| s.snapshot()).await?))
}

/// DELETE /api/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/sessions/:id/advance
///
/// Moves to the next onboarding screen.
pub async fn handle_advance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .update(id, |s| {
            s.navigator.advance()?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// POST /api/sessions/:id/navigate
pub async fn handle_navigate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<NavigateRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let snapshot = state
        .sessions
        .update(id, |s| {
            s.navigator.navigate(request.screen)?;
            Ok(s.snapshot())
        })
        .await?;
    Ok(Json(snapshot))
}

/// GET /api/sessions/:id/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.sessions.read(id, |s| s.profile.clone()).await?))
}

/// PATCH /api/sessions/:id/profile
///
/// Merges the given fields into the profile; absent fields are kept.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state
        .sessions
        .update(id, |s| {
            s.profile.apply(update);
            Ok(s.profile.clone())
        })
        .await?;
    Ok(Json(profile))
}

/// GET /api/sessions/:id/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DashboardSummary>, AppError> {
    let catalog = &state.catalog;
    let summary = state
        .sessions
        .read(id, |s| DashboardSummary {
            display_name: s.profile.display_name().to_string(),
            avatar: s.profile.avatar_source().map(str::to_string),
            saved_count: s.feed.saved().len(),
            applied_count: s.feed.applied_ids().len(),
            inbox_remaining: s.feed.inbox(catalog, FeedFilter::All).remaining,
        })
        .await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::routes::testing::{app, call};

    #[tokio::test]
    async fn test_full_onboarding_walkthrough() {
        let app = app();
        let (status, session) = call(&app, "POST", "/api/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(session["screen"], "welcome");
        let id = session["id"].as_str().unwrap().to_string();

        let expected = [
            "upload-photo",
            "basic-info",
            "goals-interests",
            "profile-summary",
            "agent-activation",
            "dashboard",
        ];
        for screen in expected {
            let (status, snapshot) =
                call(&app, "POST", &format!("/api/sessions/{id}/advance"), None).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(snapshot["screen"], screen);
        }

        let (_, snapshot) = call(&app, "GET", &format!("/api/sessions/{id}"), None).await;
        assert_eq!(snapshot["onboarded"], true);

        let (status, _) = call(&app, "POST", &format!("/api/sessions/{id}/advance"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_deleted_session_returns_404() {
        let app = app();
        let (_, session) = call(&app, "POST", "/api/sessions", None).await;
        let id = session["id"].as_str().unwrap();

        let (status, body) = call(&app, "DELETE", &format!("/api/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, serde_json::Value::Null);

        let (status, body) = call(&app, "GET", &format!("/api/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": format!("Session {id} not found") }));

        let (status, _) = call(&app, "DELETE", &format!("/api/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_navigate_rejects_locked_tab() {
        let app = app();
        let (_, session) = call(&app, "POST", "/api/sessions", None).await;
        let id = session["id"].as_str().unwrap();

        let (status, body) = call(
            &app,
            "POST",
            &format!("/api/sessions/{id}/navigate"),
            Some(json!({ "screen": "inbox" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("Inbox"));
    }

    #[tokio::test]
    async fn test_profile_patch_merges_and_feeds_dashboard() {
        let app = app();
        let (_, session) = call(&app, "POST", "/api/sessions", None).await;
        let id = session["id"].as_str().unwrap();

        call(
            &app,
            "PATCH",
            &format!("/api/sessions/{id}/profile"),
            Some(json!({ "name": "Ada Lovelace", "photo_url": "data:image/png;base64,AA==" })),
        )
        .await;
        let (status, profile) = call(
            &app,
            "PATCH",
            &format!("/api/sessions/{id}/profile"),
            Some(json!({ "avatar": "https://host/img.png", "skills": ["Python"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["name"], "Ada Lovelace");
        assert_eq!(profile["skills"], json!(["Python"]));
        assert_eq!(profile["locations"], json!(["Remote"]));

        let (status, dashboard) =
            call(&app, "GET", &format!("/api/sessions/{id}/dashboard"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dashboard["display_name"], "Ada");
        assert_eq!(dashboard["avatar"], "https://host/img.png");
        assert_eq!(dashboard["saved_count"], 0);
        assert_eq!(dashboard["inbox_remaining"], 4);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = app();
        let (status, body) = call(
            &app,
            "GET",
            &format!("/api/sessions/{}", Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().starts_with("Session"));
    }
}
