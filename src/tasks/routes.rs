//! HTTP endpoints for task admission and progress polling.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use tracing::{debug, info};

use super::TaskContext;
use super::model::{TaskParams, TaskRecord};
use crate::error::ValidationError;

/// Build the Axum router with the task routes.
pub fn task_routes(ctx: Arc<TaskContext>) -> Router {
    Router::new()
        .route("/create_task", get(create_task))
        .route("/states", get(list_states))
        .route("/health", get(health))
        .with_state(ctx)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health(State(ctx): State<Arc<TaskContext>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "seqtask",
        "queued": ctx.queue.len().await,
        "tracked": ctx.store.len().await,
    }))
}

// ── Tasks ───────────────────────────────────────────────────────────────

async fn create_task(
    State(ctx): State<Arc<TaskContext>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<TaskRecord>, ValidationError> {
    let params = TaskParams::from_query(&query).inspect_err(|e| {
        info!(errors = e.fields.len(), "Rejected task creation request");
    })?;
    let record = ctx.admit(params).await;
    Ok(Json(record))
}

async fn list_states(State(ctx): State<Arc<TaskContext>>) -> impl IntoResponse {
    let states = ctx.store.snapshot().await;
    debug!(tracked = states.len(), "States requested");
    Json(states)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;

    async fn fetch(ctx: &Arc<TaskContext>, uri: &str) -> (StatusCode, String) {
        let resp = task_routes(Arc::clone(ctx))
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn create_task_returns_record() {
        let ctx = TaskContext::new();
        let (status, body) = fetch(
            &ctx,
            "/create_task?count=3&delta=2&start=10&interval=0.01",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["number_in_queue"], 1);
        assert_eq!(json["status"], "In queue");
        assert_eq!(json["count"], 3);
        assert_eq!(json["delta"], 2.0);
        assert_eq!(json["start"], 10);
        assert_eq!(json["interval"], 0.01);
        assert!(json["current_value"].is_null());
        assert!(json["date"].is_null());
    }

    #[tokio::test]
    async fn create_task_rejects_bad_params() {
        let ctx = TaskContext::new();
        let (status, body) = fetch(&ctx, "/create_task?delta=abc&start=1&interval=1").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("count: field required"));
        assert!(body.contains("delta: value is not a valid float"));

        // Nothing created, no id consumed.
        assert!(ctx.store.is_empty().await);
        assert!(ctx.queue.is_empty().await);
        assert_eq!(ctx.ids.peek(), 1);
    }

    #[tokio::test]
    async fn states_sorted_by_id() {
        let ctx = TaskContext::new();
        for _ in 0..3 {
            fetch(&ctx, "/create_task?count=1&delta=1&start=0&interval=1").await;
        }

        let (status, body) = fetch(&ctx, "/states").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        let ids: Vec<u64> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn states_empty_is_empty_array() {
        let ctx = TaskContext::new();
        let (status, body) = fetch(&ctx, "/states").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn health_reports_counts() {
        let ctx = TaskContext::new();
        fetch(&ctx, "/create_task?count=1&delta=1&start=0&interval=1").await;

        let (status, body) = fetch(&ctx, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["queued"], 1);
        assert_eq!(json["tracked"], 1);
    }
}
