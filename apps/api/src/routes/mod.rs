pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

/// Request bodies may carry a base64 screenshot.
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route(
            "/api/generate",
            post(handlers::handle_generate).fallback(handlers::handle_method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::{Config, FallbackPolicy, DEFAULT_OPENAI_BASE_URL};
    use crate::generation::fallback::{split_sentences, CLOSING_ASKS};
    use crate::llm_client::LlmClient;

    fn config(fallback: FallbackPolicy) -> Config {
        Config {
            openai_api_key: Some("sk-test".to_string()),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            port: 8787,
            rust_log: "info".to_string(),
            fallback,
        }
    }

    fn app_against(server: &MockServer, fallback: FallbackPolicy) -> Router {
        let llm = LlmClient::new("sk-test".to_string(), server.uri()).unwrap();
        build_router(AppState {
            config: config(fallback),
            model: Some(Arc::new(llm)),
        })
    }

    fn app_without_model() -> Router {
        build_router(AppState {
            config: config(FallbackPolicy::Server),
            model: None,
        })
    }

    fn model_reply(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
    }

    async fn post_generate(app: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn invoice_request() -> Value {
        json!({
            "feature": "bulk invoice export",
            "problem": "users must export invoices one at a time",
            "outcome": "speed",
            "length": "standard"
        })
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app_without_model().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_get_on_generate_is_405_with_allow_header() {
        let request = Request::builder()
            .method("GET")
            .uri("/api/generate")
            .body(Body::empty())
            .unwrap();
        let response = app_without_model().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
    }

    #[tokio::test]
    async fn test_short_feature_is_400_without_upstream_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(model_reply(r#"{"variants": ["unused"]}"#))
            .expect(0)
            .mount(&server)
            .await;

        for feature in [json!("ab"), json!("   x  "), json!(null)] {
            let app = app_against(&server, FallbackPolicy::Server);
            let (status, body) = post_generate(app, json!({ "feature": feature })).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Feature is required.");
        }
    }

    async fn send_raw(app: Router, content_type: Option<&str>, body: &str) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri("/api/generate");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_body_is_400_feature_required() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(model_reply(r#"{"variants": ["unused"]}"#))
            .expect(0)
            .mount(&server)
            .await;

        let cases = [
            (None, ""),
            (Some("application/json"), ""),
            (Some("text/plain"), ""),
            (Some("application/json"), "null"),
        ];
        for (content_type, body) in cases {
            let app = app_against(&server, FallbackPolicy::Server);
            let (status, json) = send_raw(app, content_type, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{content_type:?} {body:?}");
            assert_eq!(json["error"], "Feature is required.");
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_400_json_error() {
        for body in [r#"{"feature": 123}"#, "{not json"] {
            let (status, json) =
                send_raw(app_without_model(), Some("application/json"), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(json["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request body"));
        }
    }

    #[tokio::test]
    async fn test_body_without_content_type_is_still_parsed() {
        let (status, json) = send_raw(
            app_without_model(),
            None,
            r#"{"feature": "bulk invoice export"}"#,
        )
        .await;
        // Past validation, so the missing key is what stops it.
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "Missing OPENAI_API_KEY in environment.");
    }

    #[tokio::test]
    async fn test_missing_credential_is_500() {
        let (status, body) = post_generate(app_without_model(), invoice_request()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Missing OPENAI_API_KEY in environment.");
    }

    #[tokio::test]
    async fn test_successful_generation_returns_first_variant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(model_reply(
                r#"{"variants": ["Feature Idea: Bulk invoice export for finance teams.", "extra"]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_against(&server, FallbackPolicy::Server);
        let (status, body) = post_generate(app, invoice_request()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["variants"],
            json!(["Feature Idea: Bulk invoice export for finance teams."])
        );
        assert_eq!(body["fallback"], false);
        assert!(body.get("notice").is_none());
    }

    #[tokio::test]
    async fn test_unavailable_service_falls_back_to_local_copy() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .expect(1)
            .mount(&server)
            .await;

        let app = app_against(&server, FallbackPolicy::Server);
        let (status, body) = post_generate(app, invoice_request()).await;

        assert_eq!(status, StatusCode::OK);
        let text = body["variants"][0].as_str().unwrap();
        assert!(text.contains("bulk invoice export"));
        assert!(text.contains("close more deals"));
        assert!(CLOSING_ASKS.iter().any(|ask| text.ends_with(ask)));
        assert_eq!(body["fallback"], true);
        assert_eq!(body["notice"], "LLM unavailable. Showing local fallback copy.");
    }

    #[tokio::test]
    async fn test_non_json_model_content_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(model_reply("Here is a great argument, no JSON though."))
            .mount(&server)
            .await;

        let app = app_against(&server, FallbackPolicy::Server);
        let mut request = invoice_request();
        request["length"] = json!("ultra");
        let (status, body) = post_generate(app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fallback"], true);
        let text = body["variants"][0].as_str().unwrap();
        assert_eq!(split_sentences(text).len(), 2, "ultra fallback: {text}");
    }

    #[tokio::test]
    async fn test_empty_variants_is_500_when_fallback_is_off() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(model_reply(r#"{"variants": []}"#))
            .mount(&server)
            .await;

        let app = app_against(&server, FallbackPolicy::Off);
        let (status, body) = post_generate(app, invoice_request()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "No variants returned.");
    }

    #[tokio::test]
    async fn test_outage_is_500_when_fallback_is_off() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let app = app_against(&server, FallbackPolicy::Off);
        let (status, body) = post_generate(app, invoice_request()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate argument.");
    }

    #[tokio::test]
    async fn test_non_image_data_url_matches_no_image_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(model_reply(r#"{"variants": ["Feature Idea: ok"]}"#))
            .expect(2)
            .mount(&server)
            .await;

        let plain = invoice_request();
        let mut with_url = invoice_request();
        with_url["imageDataUrl"] = json!("https://example.com/screenshot.png");

        post_generate(app_against(&server, FallbackPolicy::Server), plain).await;
        post_generate(app_against(&server, FallbackPolicy::Server), with_url).await;

        let requests = server.received_requests().await.unwrap();
        let bodies: Vec<Value> = requests
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect();
        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[1]["messages"][1]["content"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_image_data_url_is_forwarded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(model_reply(r#"{"variants": ["Feature Idea: ok"]}"#))
            .mount(&server)
            .await;

        let mut request = invoice_request();
        request["imageDataUrl"] = json!("data:image/png;base64,iVBORw0KGgo=");
        post_generate(app_against(&server, FallbackPolicy::Server), request).await;

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        let parts = body["messages"][1]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,iVBORw0KGgo=");
    }
}
