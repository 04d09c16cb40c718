pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::interview::handlers;
use crate::results::handlers as results;
use crate::state::AppState;

/// Headroom for multipart framing around the resume bytes.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_resume_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/health", get(health::health_handler))
        // Session API
        .route("/api/v1/session", get(handlers::handle_get_session))
        .route("/api/v1/session/recovery", get(handlers::handle_get_recovery))
        .route("/api/v1/session/resume", post(handlers::handle_upload_resume))
        .route("/api/v1/session/profile", post(handlers::handle_submit_profile))
        .route("/api/v1/session/draft", put(handlers::handle_stage_draft))
        .route("/api/v1/session/answer", post(handlers::handle_submit_answer))
        .route("/api/v1/session/pause", post(handlers::handle_pause))
        .route("/api/v1/session/continue", post(handlers::handle_continue))
        .route("/api/v1/session/restart", post(handlers::handle_restart))
        // Reviewer API
        .route("/api/v1/results", get(results::handle_list_results))
        .route("/api/v1/results/:id", get(results::handle_get_result))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::interview::questions::QuestionBank;
    use crate::interview::scoring::HeuristicScorer;
    use crate::interview::service::SessionService;
    use crate::store::MemoryStore;

    async fn app() -> Router {
        let config = Config::from_source(|_| None).unwrap();
        let sessions = Arc::new(
            SessionService::open(
                Arc::new(MemoryStore::new()),
                Arc::new(HeuristicScorer::deterministic()),
                Arc::new(QuestionBank::full_stack()),
                config.max_resume_bytes,
            )
            .await,
        );
        build_router(AppState { sessions, config })
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().await.oneshot(empty_request(Method::GET, "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_fresh_session_view() {
        let response = app()
            .await
            .oneshot(empty_request(Method::GET, "/api/v1/session"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["step"], "resume_upload");
        assert_eq!(body["timer"], Value::Null);
    }

    #[tokio::test]
    async fn test_profile_then_answer_flow() {
        let app = app().await;
        let profile = json!({"name": "Jane Doe", "email": "jane@site.org", "phone": "5551234567"});
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/v1/session/profile", profile))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["step"], "interview");
        assert_eq!(body["question_number"], 1);
        assert_eq!(body["total_questions"], 6);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/session/answer",
                json!({"text": "A library for building user interfaces."}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["outcome"], "next");
        assert_eq!(body["index"], 1);
    }

    #[tokio::test]
    async fn test_invalid_profile_is_bad_request() {
        let profile = json!({"name": "Jane Doe", "email": "not-an-email", "phone": "5551234567"});
        let response = app()
            .await
            .oneshot(json_request(Method::POST, "/api/v1/session/profile", profile))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_pause_before_interview_conflicts() {
        let response = app()
            .await
            .oneshot(empty_request(Method::POST, "/api/v1/session/pause"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_resume_upload_multipart() {
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"jane.pdf\"\r\n\
             Content-Type: application/pdf\r\n\r\n\
             Name: Jane Doe\nEmail: jane.doe@example.org\nPhone: (555) 123-4567\n\r\n\
             --{boundary}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/session/resume")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = app().await.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["fields"]["name"], "Jane Doe");
        assert_eq!(body["fields"]["phone"], "(555) 123-4567");
        assert_eq!(body["degraded"], false);
    }

    #[tokio::test]
    async fn test_results_listing_and_missing_result() {
        let app = app().await;
        let response = app
            .clone()
            .oneshot(empty_request(Method::GET, "/api/v1/results?sort_by=name&sort_order=asc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));

        let uri = format!("/api/v1/results/{}", uuid::Uuid::new_v4());
        let response = app.oneshot(empty_request(Method::GET, &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
