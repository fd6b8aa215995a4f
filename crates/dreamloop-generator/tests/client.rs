//! Integration tests for `OpenRouterClient` using wiremock HTTP mocks.

use dreamloop_core::{Category, TemperatureUnit};
use dreamloop_generator::{GenerationInput, GeneratorError, OpenRouterClient};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> OpenRouterClient {
    OpenRouterClient::with_base_url("test-key", "openai/gpt-4o-mini", 30, base_url)
        .expect("client construction should not fail")
}

fn input() -> GenerationInput {
    GenerationInput {
        goals: vec!["focus at work".to_string()],
        tone: "warm".to_string(),
        language: "en".to_string(),
        weekday: "Monday".to_string(),
        weather_summary: Some("Overcast".to_string()),
        temperature: Some(9.0),
        unit: Some(TemperatureUnit::Celsius),
    }
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "gen-1",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content } }
        ]
    })
}

#[tokio::test]
async fn generate_two_lines_parses_model_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("x-title", "DreamLoop"))
        .and(body_partial_json(serde_json::json!({
            "model": "openai/gpt-4o-mini",
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"lines":["You can do one thing well.","Your pace is enough."],"category":"Focus","visual_theme":"desk lamp at dawn"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let content = test_client(&server.uri())
        .generate_two_lines(&input())
        .await
        .expect("generation should succeed");

    assert_eq!(content.lines[0], "You can do one thing well.");
    assert_eq!(content.category, Category::Focus);
    assert_eq!(content.visual_theme, "desk lamp at dawn");
}

#[tokio::test]
async fn prompt_carries_weekday_and_weather() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .mount(&server)
        .await;

    test_client(&server.uri())
        .generate_two_lines(&input())
        .await
        .expect("call succeeds");

    let requests = server.received_requests().await.expect("recorded");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
    let user = body["messages"][1]["content"].as_str().expect("user message");
    assert!(user.contains("Today: Monday"));
    assert!(user.contains("Weather: Overcast, 9°C"));
}

#[tokio::test]
async fn prose_reply_still_extracts_embedded_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"Here it is: {"lines":["a","b"],"category":"calm","visual_theme":"x"} enjoy"#,
        )))
        .mount(&server)
        .await;

    let content = test_client(&server.uri())
        .generate_two_lines(&input())
        .await
        .expect("generation should succeed");

    assert_eq!(content.lines, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(content.category, Category::Calm);
}

#[tokio::test]
async fn missing_content_decodes_to_empty_lines() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
        )
        .mount(&server)
        .await;

    let content = test_client(&server.uri())
        .generate_two_lines(&input())
        .await
        .expect("empty reply is not a transport error");

    assert!(content.lines.is_empty());
    assert_eq!(content.category, Category::Focus);
    assert_eq!(content.visual_theme, "soft gradient waves");
}

#[tokio::test]
async fn server_error_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .generate_two_lines(&input())
        .await
        .expect_err("502 must fail");

    assert!(
        matches!(err, GeneratorError::UnexpectedStatus { status: 502, ref body } if body == "upstream unavailable"),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn non_json_envelope_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .generate_two_lines(&input())
        .await
        .expect_err("html envelope must fail");

    assert!(matches!(err, GeneratorError::Deserialize { .. }), "got: {err:?}");
}
