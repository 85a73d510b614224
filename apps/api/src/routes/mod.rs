pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::avatar;
use crate::feed;
use crate::onboarding;
use crate::state::AppState;

/// Upper bound for a single photo upload.
const AVATAR_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Avatar proxy
        .route(
            "/api/generate-avatar",
            post(avatar::handlers::handle_generate_avatar)
                .layer(DefaultBodyLimit::max(AVATAR_BODY_LIMIT)),
        )
        // Opportunity catalog
        .route(
            "/api/opportunities",
            get(feed::handlers::handle_list_opportunities),
        )
        // Sessions and onboarding
        .route(
            "/api/sessions",
            post(onboarding::handlers::handle_create_session),
        )
        .route(
            "/api/sessions/:id",
            get(onboarding::handlers::handle_get_session)
                .delete(onboarding::handlers::handle_delete_session),
        )
        .route(
            "/api/sessions/:id/advance",
            post(onboarding::handlers::handle_advance),
        )
        .route(
            "/api/sessions/:id/navigate",
            post(onboarding::handlers::handle_navigate),
        )
        .route(
            "/api/sessions/:id/profile",
            get(onboarding::handlers::handle_get_profile)
                .patch(onboarding::handlers::handle_update_profile),
        )
        .route(
            "/api/sessions/:id/dashboard",
            get(onboarding::handlers::handle_dashboard),
        )
        // Inbox, saved and applied
        .route(
            "/api/sessions/:id/inbox",
            get(feed::handlers::handle_get_inbox),
        )
        .route(
            "/api/sessions/:id/inbox/swipe",
            post(feed::handlers::handle_swipe),
        )
        .route(
            "/api/sessions/:id/saved",
            get(feed::handlers::handle_list_saved),
        )
        .route(
            "/api/sessions/:id/saved/:opportunity_id",
            post(feed::handlers::handle_save).delete(feed::handlers::handle_remove_saved),
        )
        .route(
            "/api/sessions/:id/applied/:opportunity_id",
            post(feed::handlers::handle_mark_applied),
        )
        .route(
            "/api/sessions/:id/details/:opportunity_id",
            post(feed::handlers::handle_open_details),
        )
        .route(
            "/api/sessions/:id/back",
            post(feed::handlers::handle_close_details),
        )
        .with_state(state)
}

#[cfg(test)]
pub mod testing {
    //! Request helpers for router-level tests.

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::build_router;
    use crate::avatar::testing::CannedGenerator;
    use crate::state::AppState;

    pub fn app() -> Router {
        build_router(AppState::for_tests(Arc::new(CannedGenerator::returning(
            json!("https://host/img.png"),
        ))))
    }

    /// Sends one request. An empty body comes back as `null`, a non-JSON body
    /// as a string.
    pub async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    /// Creates a session and walks it through onboarding to the dashboard.
    pub async fn onboarded_session(app: &Router) -> String {
        let (_, session) = call(app, "POST", "/api/sessions", None).await;
        let id = session["id"].as_str().unwrap().to_string();
        loop {
            let (status, snapshot) =
                call(app, "POST", &format!("/api/sessions/{id}/advance"), None).await;
            assert_eq!(status, StatusCode::OK);
            if snapshot["onboarded"] == true {
                return id;
            }
        }
    }
}
