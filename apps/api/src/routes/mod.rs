pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/api/v1/interviews", post(handlers::handle_start))
        .route(
            "/api/v1/interviews/:id",
            get(handlers::handle_get).delete(handlers::handle_abandon),
        )
        .route(
            "/api/v1/interviews/:id/answers",
            post(handlers::handle_answer),
        )
        .route(
            "/api/v1/interviews/:id/auto-answer",
            post(handlers::handle_auto_answer),
        )
        .route(
            "/api/v1/interviews/:id/auto-exercise",
            post(handlers::handle_auto_exercise),
        )
        .route(
            "/api/v1/interviews/:id/finish",
            post(handlers::handle_finish),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::interview::flow::tests::{matrix, plan_reply, settings};
    use crate::interview::store::{InMemorySessionStore, SessionStore};
    use crate::llm_client::testing::{fast_client, ScriptedChat};

    fn app(chat: Arc<ScriptedChat>) -> (Router, Arc<InMemorySessionStore>) {
        let store = Arc::new(InMemorySessionStore::new());
        let state = AppState {
            llm: fast_client(chat),
            sessions: store.clone(),
            matrix: Arc::new(matrix()),
            settings: Arc::new(settings(1)),
        };
        (build_router(state), store)
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_reports_sessions() {
        let (router, _) = app(Arc::new(ScriptedChat::default()));
        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_sessions"], 0);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404_with_error_body() {
        let (router, _) = app(Arc::new(ScriptedChat::default()));
        let uri = format!("/api/v1/interviews/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_interview_over_http() {
        let chat = Arc::new(ScriptedChat::with_json(vec![plan_reply()]));
        let (router, store) = app(chat.clone());

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/interviews",
            Some(json!({"candidate_name": "Ada"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["skill"], "A");
        assert_eq!(body["phase"], "questioning");
        let id = body["session_id"].as_str().unwrap().to_string();

        let answers = format!("/api/v1/interviews/{id}/answers");
        let skip = Some(json!({"skip": true}));
        let (status, body) = send(&router, Method::POST, &answers, skip).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skill"], "B");

        let (status, body) = send(&router, Method::POST, &answers, Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        chat.push(Ok("A simulated answer".to_string()));
        let (status, body) = send(
            &router,
            Method::POST,
            &format!("/api/v1/interviews/{id}/auto-answer"),
            Some(json!({"level": 7})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "A simulated answer");
        assert_eq!(body["level"], 7);

        let (status, _) = send(
            &router,
            Method::DELETE,
            &format!("/api/v1/interviews/{id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(store.is_empty());
    }
}
