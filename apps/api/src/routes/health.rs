use axum::Json;
use serde_json::{json, Value};

/// GET /api/health
/// Liveness probe only.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Avatar generation API is running"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_reports_ok() {
        let Json(body) = health_handler().await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["message"], "Avatar generation API is running");
    }
}
