use logsentinel_core::llm::GenerationConfig;
use logsentinel_core::{
    AnalysisClient, GeminiClient, GenerateRequest, LlmClient, RepoContext, ReplyStatus, Turn,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn client(server: &MockServer) -> GeminiClient {
    GeminiClient::new("test-key")
        .with_model("gemini-test")
        .with_base_url(format!("{}/", server.uri()))
}

fn request() -> GenerateRequest {
    GenerateRequest {
        system_instruction: "You are LogSentinel.".into(),
        contents: vec![Turn::model("welcome"), Turn::user("why?")],
        config: GenerationConfig::default(),
    }
}

#[tokio::test]
async fn test_generate_posts_expected_body_and_reads_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "You are LogSentinel." }] },
            "contents": [
                { "role": "model", "parts": [{ "text": "welcome" }] },
                { "role": "user", "parts": [{ "text": "why?" }] }
            ],
            "generationConfig": { "thinkingConfig": { "thinkingBudget": 4096 } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "weighing options", "thought": true },
                        { "text": "DIAGNOSIS: BUG" }
                    ]
                }
            }],
            "usageMetadata": { "promptTokenCount": 42, "candidatesTokenCount": 7 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server).generate(&request()).await.unwrap();
    assert_eq!(response.text.as_deref(), Some("DIAGNOSIS: BUG"));
    let usage = response.usage.unwrap();
    assert_eq!(usage.input_tokens, 42);
    assert_eq!(usage.output_tokens, 7);
}

#[tokio::test]
async fn test_api_error_surfaces_in_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted",
                "status": "RESOURCE_EXHAUSTED"
            }
        })))
        .mount(&server)
        .await;

    let analysis = AnalysisClient::new(Box::new(client(&server)));
    let reply = analysis
        .analyze("why?", &[], &[], &RepoContext::default())
        .await;
    assert_eq!(reply.status, ReplyStatus::Failed);
    assert!(reply.text.starts_with("Error analyzing logs:"));
    assert!(reply.text.contains("RESOURCE_EXHAUSTED"));
    assert!(reply.text.contains("Resource has been exhausted"));
}

#[tokio::test]
async fn test_missing_candidates_yield_fallback_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let analysis = AnalysisClient::new(Box::new(client(&server)));
    let reply = analysis
        .analyze("why?", &[], &[], &RepoContext::default())
        .await;
    assert_eq!(reply.status, ReplyStatus::Empty);
    assert_eq!(reply.text, "Analysis failed. No text returned.");
}

#[tokio::test]
async fn test_timeout_becomes_error_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "candidates": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let llm = client(&server)
        .with_timeout(Duration::from_millis(200))
        .unwrap();
    let analysis = AnalysisClient::new(Box::new(llm));
    let reply = analysis
        .analyze("why?", &[], &[], &RepoContext::default())
        .await;
    assert_eq!(reply.status, ReplyStatus::Failed);
    assert!(reply.text.starts_with("Error analyzing logs: HTTP error"));
    assert!(reply.text.contains("timed out"), "{}", reply.text);
}
