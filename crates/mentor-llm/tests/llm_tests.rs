//! Tests for mentor-llm: request types, both HTTP providers against mock servers, factory

use mentor_core::{Backend, MentorConfig, Message};
use mentor_llm::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ===========================================================================
// LlmRequest / LlmReply
// ===========================================================================

#[test]
fn llm_request_defaults_to_fresh() {
    let req = LlmRequest::new("m", "sys", "hi");
    assert_eq!(req.continuity, Continuity::Fresh);
    assert!(req.temperature.is_none());
    assert!(req.reasoning.is_none());
}

#[test]
fn continuity_previous_id_only_for_chained() {
    assert_eq!(Continuity::Previous("r1".into()).previous_response_id(), Some("r1"));
    assert_eq!(Continuity::Fresh.previous_response_id(), None);
    assert_eq!(Continuity::Transcript(vec![]).previous_response_id(), None);
}

#[test]
fn llm_reply_text_or_empty() {
    assert_eq!(LlmReply::default().text_or_empty(), "");
    assert_eq!(LlmReply::text("hi").text_or_empty(), "hi");
}

// ===========================================================================
// OpenAiProvider (server-retained)
// ===========================================================================

#[tokio::test]
async fn openai_provider_sends_chain_and_parses_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/responses"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-5-nano",
            "instructions": "You are a tutor.",
            "input": "What is recursion?",
            "previous_response_id": "resp_prev",
            "temperature": 1.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "resp_next",
            "model": "gpt-5-nano",
            "output": [
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": "A function calling itself."}
                ]}
            ],
            "usage": {"input_tokens": 20, "output_tokens": 6}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("sk-test").with_base_url(format!("{}/v1", server.uri()));
    assert_eq!(provider.name(), "openai");
    assert_eq!(provider.continuity(), ContinuityMode::Chained);

    let request = LlmRequest::new("gpt-5-nano", "You are a tutor.", "What is recursion?")
        .with_continuity(Continuity::Previous("resp_prev".into()))
        .with_temperature(1.0);
    let reply = provider.complete(request).await.expect("call should succeed");

    assert_eq!(reply.id.as_deref(), Some("resp_next"));
    assert_eq!(reply.text.as_deref(), Some("A function calling itself."));
    assert_eq!(reply.usage.map(|u| u.output_tokens), Some(6));
}

#[tokio::test]
async fn openai_provider_unauthorized_maps_to_auth_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/responses"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":{"message":"bad key"}}"#))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("sk-bad").with_base_url(server.uri());
    let err = provider
        .complete(LlmRequest::new("gpt-5-nano", "sys", "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::AuthFailed(ref body) if body.contains("bad key")), "got {:?}", err);
}

#[tokio::test]
async fn openai_provider_rate_limit_and_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"input": "slow down"})))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"input": "boom"})))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("sk").with_base_url(server.uri());

    let err = provider.complete(LlmRequest::new("m", "s", "slow down")).await.unwrap_err();
    assert!(matches!(err, LlmError::RateLimited { .. }));

    let err = provider.complete(LlmRequest::new("m", "s", "boom")).await.unwrap_err();
    match err {
        LlmError::RequestFailed(msg) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("upstream exploded"));
        }
        other => panic!("Expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn openai_provider_garbage_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("sk").with_base_url(server.uri());
    let err = provider.complete(LlmRequest::new("m", "s", "hi")).await.unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponse(_)));
}

// ===========================================================================
// OllamaProvider (client-retained)
// ===========================================================================

#[tokio::test]
async fn ollama_provider_sends_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "phi4",
            "stream": false,
            "messages": [
                {"role": "system", "content": "You are a tutor."},
                {"role": "user", "content": "first"},
                {"role": "assistant", "content": "answer"},
                {"role": "user", "content": "second"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "phi4",
            "message": {"role": "assistant", "content": "Second answer."},
            "done": true,
            "prompt_eval_count": 40,
            "eval_count": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OllamaProvider::new().with_base_url(server.uri());
    assert_eq!(provider.continuity(), ContinuityMode::Transcript);

    let request = LlmRequest::new("phi4", "You are a tutor.", "second").with_continuity(
        Continuity::Transcript(vec![
            Message::system("You are a tutor."),
            Message::user("first"),
            Message::assistant("answer"),
        ]),
    );
    let reply = provider.complete(request).await.expect("call should succeed");
    assert!(reply.id.is_none());
    assert_eq!(reply.text.as_deref(), Some("Second answer."));
    assert_eq!(reply.usage, Some(Usage { input_tokens: 40, output_tokens: 3 }));
}

#[tokio::test]
async fn ollama_provider_empty_content_is_no_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "phi4",
            "message": {"role": "assistant", "content": ""},
            "done": true
        })))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new().with_base_url(server.uri());
    let reply = provider.complete(LlmRequest::new("phi4", "s", "hi")).await.unwrap();
    assert!(reply.text.is_none());
    assert!(reply.usage.is_none());
}

#[tokio::test]
async fn ollama_provider_model_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"error":"model 'nope' not found"}"#))
        .mount(&server)
        .await;

    let provider = OllamaProvider::new().with_base_url(server.uri());
    let err = provider.complete(LlmRequest::new("nope", "s", "hi")).await.unwrap_err();
    assert!(err.to_string().contains("not found"));
}

// ===========================================================================
// ScriptedProvider
// ===========================================================================

#[tokio::test]
async fn scripted_provider_replays_in_order_and_records() {
    let provider = ScriptedProvider::chained(vec![
        MockReply::text("one"),
        MockReply::Empty,
        MockReply::Error("down".into()),
    ]);

    let first = provider.complete(LlmRequest::new("m", "s", "a")).await.unwrap();
    assert_eq!(first.text.as_deref(), Some("one"));
    assert_eq!(first.id.as_deref(), Some("resp_1"));

    let second = provider.complete(LlmRequest::new("m", "s", "b")).await.unwrap();
    assert!(second.text.is_none());

    assert!(provider.complete(LlmRequest::new("m", "s", "c")).await.is_err());

    let inputs: Vec<String> = provider.requests().await.into_iter().map(|r| r.input).collect();
    assert_eq!(inputs, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn scripted_transcript_provider_has_no_ids() {
    let provider = ScriptedProvider::transcript(vec![MockReply::text("x")]);
    let reply = provider.complete(LlmRequest::new("m", "s", "a")).await.unwrap();
    assert!(reply.id.is_none());
}

// ===========================================================================
// provider_from_config
// ===========================================================================

fn config(backend: Backend, api_key: Option<&str>) -> MentorConfig {
    MentorConfig {
        backend,
        model_id: "model".into(),
        api_key: api_key.map(String::from),
        temperature: 0.5,
        amount_before_summarizing: 0,
        base_url: None,
    }
}

#[test]
fn factory_builds_matching_backend() {
    let openai = provider_from_config(&config(Backend::OpenAi, Some("sk"))).unwrap();
    assert_eq!(openai.name(), "openai");
    assert_eq!(openai.continuity(), ContinuityMode::Chained);

    let ollama = provider_from_config(&config(Backend::Ollama, None)).unwrap();
    assert_eq!(ollama.name(), "ollama");
    assert_eq!(ollama.continuity(), ContinuityMode::Transcript);
}

#[test]
fn factory_rejects_openai_without_key() {
    let err = provider_from_config(&config(Backend::OpenAi, None)).err().unwrap();
    assert!(err.is_configuration());
}
