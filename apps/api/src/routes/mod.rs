pub mod health;
pub mod page;

use axum::{
    routing::{get, post},
    Router,
};

use crate::planning::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index_handler))
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/methodologies",
            get(handlers::handle_list_methodologies),
        )
        .route("/api/v1/plans", post(handlers::handle_generate_plan))
        .route("/api/v1/plans/stream", post(handlers::handle_stream_plan))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::{Brand, Config};
    use crate::errors::MISSING_FIELDS_MESSAGE;
    use crate::planning::aggregator::tests::{MockBackend, MockReply};

    fn app(backend: Arc<MockBackend>) -> Router {
        build_router(AppState {
            completion: backend,
            config: Config {
                groq_api_key: "test".to_string(),
                groq_api_url: "http://localhost:0".to_string(),
                brand: Brand::default(),
                port: 0,
                rust_log: "debug".to_string(),
            },
        })
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn robotic_arm(methodology: &str) -> Value {
        json!({
            "title": "Robotic Arm",
            "objective": "Automate sorting",
            "materials": "servo, Arduino",
            "methodology": methodology
        })
    }

    #[tokio::test]
    async fn test_health() {
        let backend = Arc::new(MockBackend::new(vec![MockReply::Fragments(vec![])]));
        let response = app(backend)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["brand"], "Faísca");
    }

    #[tokio::test]
    async fn test_index_page_renders() {
        let backend = Arc::new(MockBackend::new(vec![MockReply::Fragments(vec![])]));
        let response = app(backend)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Gerar Ideias de Projetos"));
    }

    #[tokio::test]
    async fn test_list_methodologies() {
        let backend = Arc::new(MockBackend::new(vec![MockReply::Fragments(vec![])]));
        let response = app(backend)
            .oneshot(
                Request::get("/api/v1/methodologies")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body[0]["value"], "Científica");
        assert_eq!(body[0]["sections"].as_array().unwrap().len(), 8);
        assert_eq!(body[1]["value"], "Engenharia");
        assert_eq!(body[1]["sections"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_generate_plan_success() {
        let backend = Arc::new(MockBackend::new(vec![MockReply::Fragments(vec![
            "\n#Propósito",
            "",
            " de Trabalho\n",
        ])]));
        let response = app(backend.clone())
            .oneshot(post_json("/api/v1/plans", robotic_arm("Engenharia")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["plan"], "#Propósito de Trabalho");
        assert_eq!(body["methodology"], "Engenharia");
        assert_eq!(backend.call_count(), 1);

        let request = backend.last_request.lock().unwrap().clone().unwrap();
        assert!(request.user_message.contains("Robotic Arm"));
        assert!(!request.user_message.contains("Hipótese"));
    }

    #[tokio::test]
    async fn test_blank_methodology_never_calls_backend() {
        let backend = Arc::new(MockBackend::new(vec![MockReply::Fragments(vec!["x"])]));
        let response = app(backend.clone())
            .oneshot(post_json("/api/v1/plans", robotic_arm("")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], MISSING_FIELDS_MESSAGE);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_field_never_calls_backend() {
        let backend = Arc::new(MockBackend::new(vec![MockReply::Fragments(vec!["x"])]));
        let response = app(backend.clone())
            .oneshot(post_json(
                "/api/v1/plans/stream",
                json!({"title": "T", "objective": "", "materials": "M", "methodology": "Científica"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_completion_returns_null_plan() {
        let backend = Arc::new(MockBackend::new(vec![MockReply::Fragments(vec!["", "  "])]));
        let response = app(backend)
            .oneshot(post_json("/api/v1/plans", robotic_arm("Científica")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert!(body["plan"].is_null());
    }

    #[tokio::test]
    async fn test_completion_failure_surfaces_error_then_recovers() {
        let backend = Arc::new(MockBackend::new(vec![
            MockReply::Rejects { status: 401 },
            MockReply::Fragments(vec!["Plano"]),
        ]));
        let router = app(backend.clone());

        let failed = router
            .clone()
            .oneshot(post_json("/api/v1/plans", robotic_arm("Engenharia")))
            .await
            .unwrap();
        assert_eq!(failed.status(), StatusCode::BAD_GATEWAY);
        let body: Value = serde_json::from_str(&body_text(failed).await).unwrap();
        assert_eq!(body["error"]["code"], "LLM_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Erro ao tentar gerar ideias:"));
        assert!(body.get("plan").is_none());

        let next = router
            .oneshot(post_json("/api/v1/plans", robotic_arm("Engenharia")))
            .await
            .unwrap();
        assert_eq!(next.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(next).await).unwrap();
        assert_eq!(body["plan"], "Plano");
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_stream_forwards_fragments_then_done() {
        let backend = Arc::new(MockBackend::new(vec![MockReply::Fragments(vec![
            "Olá", "", " mundo",
        ])]));
        let response = app(backend)
            .oneshot(post_json("/api/v1/plans/stream", robotic_arm("Científica")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/event-stream"
        );
        let text = body_text(response).await;
        assert!(text.contains("event: fragment\ndata: Olá\n\n"));
        assert!(text.contains("event: fragment\ndata:  mundo\n\n"));
        assert_eq!(text.matches("event: fragment").count(), 2);
        assert!(text
            .trim_end()
            .ends_with(r#"event: done
data: {"plan":"Olá mundo"}"#));
        assert!(!text.contains("event: error"));
    }

    #[tokio::test]
    async fn test_stream_done_carries_trimmed_plan() {
        let backend = Arc::new(MockBackend::new(vec![MockReply::Fragments(vec![
            "\n\n  ",
            "Plano  \n",
        ])]));
        let response = app(backend)
            .oneshot(post_json("/api/v1/plans/stream", robotic_arm("Científica")))
            .await
            .unwrap();

        let text = body_text(response).await;
        assert!(text.contains("event: fragment\ndata: Plano  \n"));
        assert!(text.contains("event: done\ndata: {\"plan\":\"Plano\"}\n\n"));
    }

    #[tokio::test]
    async fn test_stream_whitespace_only_completion_is_null_plan() {
        let backend = Arc::new(MockBackend::new(vec![MockReply::Fragments(vec!["", "  "])]));
        let response = app(backend)
            .oneshot(post_json("/api/v1/plans/stream", robotic_arm("Engenharia")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains("event: fragment\ndata:   \n\n"));
        assert!(text.contains("event: done\ndata: {\"plan\":null}\n\n"));
        assert!(!text.contains("event: error"));
    }

    #[tokio::test]
    async fn test_stream_mid_failure_ends_with_error_event() {
        let backend = Arc::new(MockBackend::new(vec![MockReply::BreaksAfter(vec!["parcial"])]));
        let response = app(backend)
            .oneshot(post_json("/api/v1/plans/stream", robotic_arm("Engenharia")))
            .await
            .unwrap();

        let text = body_text(response).await;
        assert!(text.contains("event: error\ndata: Erro ao tentar gerar ideias:"));
        assert!(!text.contains("event: done"));
    }

    #[tokio::test]
    async fn test_stream_rejected_request_is_json_error() {
        let backend = Arc::new(MockBackend::new(vec![MockReply::Rejects { status: 429 }]));
        let response = app(backend)
            .oneshot(post_json("/api/v1/plans/stream", robotic_arm("Engenharia")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
