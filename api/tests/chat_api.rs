//! Integration tests — real router, mock OpenAI-compatible upstream on an
//! ephemeral port, requests driven through `tower::ServiceExt::oneshot`.

use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use ai_llm_service::{LlmModelConfig, LlmProvider};
use api::{AppState, router, with_middleware};
use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use wellness_relay::{FALLBACK_INSIGHT, FALLBACK_REPLY, Relay, WELLNESS_KEYS};

const EXAMPLE_CONTENT: &str = r#"{"reply": "Great job on the 7 hours of sleep and healthy breakfast! Consistency with sleep and nutrition is key for energy levels throughout the day.", "data": {"goal": "", "diet": "Healthy", "time": "Morning routine", "energy": "Medium", "consistency": "Regular", "insights": "Maintain consistent sleep schedule"}}"#;

/// Bodies received by the mock upstream, in arrival order.
type Received = Arc<Mutex<Vec<Value>>>;

fn completion(content: &str) -> Response {
    Json(json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    }))
    .into_response()
}

async fn mock_completions(
    State(received): State<Received>,
    Path(scenario): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    received.lock().unwrap().push(body);
    match scenario.as_str() {
        "example" => completion(EXAMPLE_CONTENT),
        "partial" => completion(r#"{"reply": "Balanced meals help!", "data": {"diet": "Balanced", "mood": "upbeat"}}"#),
        "garbage" => completion("Sure! Here is how you are doing today."),
        "ratelimit" => (
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"Rate limit reached for model"}}"#,
        )
            .into_response(),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response(),
        "envelope" => Json(json!({"unexpected": true})).into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            completion(EXAMPLE_CONTENT)
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Starts the mock upstream and returns its base URL plus the request log.
async fn spawn_upstream() -> (String, Received) {
    let received: Received = Arc::default();
    let app = Router::new()
        .route("/{scenario}/v1/chat/completions", post(mock_completions))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), received)
}

fn llm_config(endpoint: String, api_key: Option<&str>) -> LlmModelConfig {
    LlmModelConfig {
        provider: LlmProvider::Groq,
        model: "llama-3.3-70b-versatile".into(),
        endpoint,
        api_key: api_key.map(str::to_string),
        max_tokens: Some(500),
        temperature: Some(0.7),
        json_mode: true,
        timeout_secs: Some(1),
    }
}

fn app_for(endpoint: String) -> Router {
    let relay = Relay::from_config(llm_config(endpoint, Some("gsk-test"))).unwrap();
    router(Arc::new(AppState::new(relay)))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.expect("request");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn post_chat(app: Router, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, req).await
}

fn assert_schema_complete(body: &Value) {
    assert!(body["reply"].is_string(), "reply missing in {body}");
    for key in WELLNESS_KEYS {
        assert!(body["data"][key].is_string(), "data.{key} missing in {body}");
    }
}

#[tokio::test]
async fn status_endpoints_report_healthy() {
    let app = router(Arc::new(AppState::new(Relay::unconfigured("Groq"))));

    let (status, body) = send(
        app.clone(),
        Request::builder().uri("/").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "service": "AroMi AI Agent Backend"}));

    let (status, body) = send(
        app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn example_message_returns_the_model_payload_exactly() {
    let (base, received) = spawn_upstream().await;
    let (status, body) = post_chat(
        app_for(format!("{base}/example")),
        json!({"message": "I slept for 7 hours last night and ate a healthy breakfast"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let expected: Value = serde_json::from_str(EXAMPLE_CONTENT).unwrap();
    assert_eq!(body, expected);

    let sent = received.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["model"], "llama-3.3-70b-versatile");
    assert_eq!(sent[0]["max_tokens"], 500);
    assert_eq!(sent[0]["response_format"], json!({"type": "json_object"}));
    assert_eq!(sent[0]["messages"][0]["role"], "system");
    assert_eq!(
        sent[0]["messages"][1],
        json!({"role": "user", "content": "I slept for 7 hours last night and ate a healthy breakfast"})
    );
}

#[tokio::test]
async fn partial_data_is_completed_and_extras_kept() {
    let (base, _) = spawn_upstream().await;
    let (status, body) = post_chat(
        app_for(format!("{base}/partial")),
        json!({"message": "I mostly eat balanced meals"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_schema_complete(&body);
    assert_eq!(body["reply"], "Balanced meals help!");
    assert_eq!(body["data"]["diet"], "Balanced");
    assert_eq!(body["data"]["mood"], "upbeat");
    for key in ["goal", "time", "energy", "consistency", "insights"] {
        assert_eq!(body["data"][key], "", "data.{key}");
    }
}

#[tokio::test]
async fn malformed_model_content_yields_fallback() {
    let (base, _) = spawn_upstream().await;
    let (status, body) = post_chat(
        app_for(format!("{base}/garbage")),
        json!({"message": "How am I doing?"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "reply": FALLBACK_REPLY,
            "data": {
                "goal": "", "diet": "", "time": "", "energy": "", "consistency": "",
                "insights": FALLBACK_INSIGHT
            }
        })
    );
}

#[tokio::test]
async fn upstream_rate_limit_is_passed_through() {
    let (base, _) = spawn_upstream().await;
    let (status, body) = post_chat(
        app_for(format!("{base}/ratelimit")),
        json!({"message": "hello"}),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "UPSTREAM_ERROR");
    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Groq API error:"), "{message}");
    assert!(message.contains("Rate limit reached for model"), "{message}");
}

#[tokio::test]
async fn upstream_server_error_is_passed_through() {
    let (base, _) = spawn_upstream().await;
    let (status, body) = post_chat(app_for(format!("{base}/boom")), json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "UPSTREAM_ERROR");
    assert_eq!(body["message"], "Groq API error: upstream exploded");
}

#[tokio::test]
async fn invalid_completion_envelope_is_an_internal_error() {
    let (base, _) = spawn_upstream().await;
    let (status, body) =
        post_chat(app_for(format!("{base}/envelope")), json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn slow_upstream_times_out_with_504() {
    let (base, _) = spawn_upstream().await;
    let started = Instant::now();
    let (status, body) = post_chat(app_for(format!("{base}/slow")), json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "UPSTREAM_TIMEOUT");
    assert_eq!(body["message"], "AI service timeout");
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn unreachable_upstream_is_503() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (status, body) = post_chat(app_for(format!("http://{addr}")), json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "UPSTREAM_UNAVAILABLE");
    assert_eq!(body["message"], "Service temporarily unavailable");
}

#[tokio::test]
async fn missing_credential_reports_not_configured_without_calling_out() {
    let (base, received) = spawn_upstream().await;
    let relay = Relay::from_config(llm_config(format!("{base}/example"), None)).unwrap();
    let app = router(Arc::new(AppState::new(relay)));

    let (status, body) = post_chat(app, json!({"message": "hello"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "SERVICE_NOT_CONFIGURED");
    assert!(!body["message"].as_str().unwrap().is_empty());
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn only_five_most_recent_history_turns_are_forwarded() {
    let (base, received) = spawn_upstream().await;
    let history: Vec<Value> = (0..7)
        .map(|i| {
            let role = if i % 2 == 0 { "user" } else { "assistant" };
            json!({"role": role, "content": format!("turn {i}")})
        })
        .collect();

    let (status, body) = post_chat(
        app_for(format!("{base}/example")),
        json!({"message": "and today?", "conversation_history": history}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_schema_complete(&body);

    let sent = received.lock().unwrap().clone();
    let messages = sent[0]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 7);
    assert_eq!(messages[0]["role"], "system");
    let contents: Vec<&str> = messages[1..6]
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, ["turn 2", "turn 3", "turn 4", "turn 5", "turn 6"]);
    assert_eq!(messages[6], json!({"role": "user", "content": "and today?"}));
}

#[tokio::test]
async fn blank_message_is_a_bad_request() {
    let (base, received) = spawn_upstream().await;
    let (status, body) = post_chat(app_for(format!("{base}/example")), json!({"message": "  "})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn undecodable_bodies_are_reshaped_into_json_errors() {
    let (base, _) = spawn_upstream().await;

    let (status, body) = post_chat(
        app_for(format!("{base}/example")),
        json!({"message": "hi", "conversation_history": [{"role": "tool", "content": "x"}]}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "UNPROCESSABLE_ENTITY");
    assert_eq!(body["details"][0]["path"], "conversation_history[0].role");

    let (status, body) = post_chat(app_for(format!("{base}/example")), json!({"history": []})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["path"], "message");

    let req = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app_for(format!("{base}/example")).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn cors_allows_any_origin() {
    let app = router(Arc::new(AppState::new(Relay::unconfigured("Groq"))));
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/chat")
        .header("origin", "https://aromi.example")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

async fn panicking_handler() -> &'static str {
    panic!("relay state poisoned")
}

#[tokio::test]
async fn handler_panic_becomes_generic_internal_error() {
    let app = with_middleware(Router::new().route("/panic", get(panicking_handler)));

    let req = Request::builder().uri("/panic").body(Body::empty()).unwrap();
    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "INTERNAL_ERROR", "message": "Internal server error"})
    );
}
