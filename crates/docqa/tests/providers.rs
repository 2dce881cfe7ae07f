//! HTTP client tests against mock Ollama, chat and speech servers

use bytes::Bytes;
use futures_util::StreamExt;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use docqa::config::{EmbeddingConfig, LlmConfig, TtsConfig};
use docqa::providers::{
    ChatMessage, ChatProvider, ChatRequest, EmbeddingProvider, OllamaEmbedder, OpenAiChatClient,
    OpenAiSpeechEngine, SpeechEngine,
};
use docqa::speech::SpeechSynthesizer;
use docqa::Error;

fn embedding_config(server: &MockServer, dimensions: usize) -> EmbeddingConfig {
    EmbeddingConfig {
        base_url: server.uri(),
        dimensions,
        ..EmbeddingConfig::default()
    }
}

fn tts_config(server: &MockServer) -> TtsConfig {
    TtsConfig {
        base_url: format!("{}/v1", server.uri()),
        ..TtsConfig::default()
    }
}

#[tokio::test]
async fn test_ollama_embedding_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .and(body_partial_json(json!({"model": "all-minilm", "prompt": "revenue"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embedding": [0.1, 0.2, 0.3]})))
        .expect(1)
        .mount(&server)
        .await;

    let embedder = OllamaEmbedder::new(&embedding_config(&server, 3)).unwrap();
    let vector = embedder.embed("revenue").await.unwrap();
    assert_eq!(vector, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn test_ollama_dimension_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embedding": [0.1, 0.2]})))
        .mount(&server)
        .await;

    let embedder = OllamaEmbedder::new(&embedding_config(&server, 384)).unwrap();
    assert!(matches!(embedder.embed("x").await, Err(Error::Embedding(_))));
}

#[tokio::test]
async fn test_ollama_health_check() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"models": []})))
        .mount(&server)
        .await;

    let embedder = OllamaEmbedder::new(&embedding_config(&server, 384)).unwrap();
    assert!(embedder.health_check().await.unwrap());
}

#[tokio::test]
async fn test_chat_completion_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer gsk_test"))
        .and(body_partial_json(json!({
            "model": "llama-3.1-70b-versatile",
            "max_tokens": 1000,
            "messages": [
                {"role": "system", "content": "You are helpful. Provide clear, accurate answers."},
                {"role": "user", "content": "What was revenue?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Ten million."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiChatClient::new(&LlmConfig {
        base_url: server.uri(),
        api_key: "gsk_test".to_string(),
        ..LlmConfig::default()
    })
    .unwrap();

    let answer = client
        .complete(ChatRequest {
            model: "llama-3.1-70b-versatile".to_string(),
            messages: vec![
                ChatMessage::system("You are helpful. Provide clear, accurate answers."),
                ChatMessage::user("What was revenue?"),
            ],
            max_tokens: 1000,
            temperature: 0.7,
        })
        .await
        .unwrap();
    assert_eq!(answer, "Ten million.");
}

#[tokio::test]
async fn test_chat_error_status_is_llm_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = OpenAiChatClient::new(&LlmConfig {
        base_url: server.uri(),
        api_key: "gsk_test".to_string(),
        ..LlmConfig::default()
    })
    .unwrap();

    let err = client
        .complete(ChatRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::user("hi")],
            max_tokens: 10,
            temperature: 0.0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Llm(message) if message.contains("429")));
}

#[tokio::test]
async fn test_speech_engine_streams_audio() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_partial_json(json!({
            "input": "Hello",
            "voice": "en-US-AriaNeural",
            "response_format": "mp3"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(b"ID3audio".to_vec()),
        )
        .mount(&server)
        .await;

    let engine = OpenAiSpeechEngine::new(&tts_config(&server)).unwrap();
    let mut stream = engine.stream("Hello", "en-US-AriaNeural").await.unwrap();

    let mut audio = Vec::new();
    while let Some(chunk) = stream.next().await {
        audio.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(audio, b"ID3audio");
}

#[tokio::test]
async fn test_synthesizer_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .and(body_partial_json(json!({"voice": "en-IN-NeerjaNeural"})))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3tamil".to_vec()))
        .mount(&server)
        .await;

    let config = tts_config(&server);
    let engine = Arc::new(OpenAiSpeechEngine::new(&config).unwrap());
    let synthesizer = SpeechSynthesizer::new(engine, config);

    let result = synthesizer.synthesize("Vanakkam", "ta").await.unwrap();
    assert_eq!(result.audio, Bytes::from_static(b"ID3tamil"));
}

#[tokio::test]
async fn test_synthesizer_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(ResponseTemplate::new(500).set_body_string("engine down"))
        .mount(&server)
        .await;

    let config = tts_config(&server);
    let synthesizer = SpeechSynthesizer::new(Arc::new(OpenAiSpeechEngine::new(&config).unwrap()), config);

    assert!(matches!(
        synthesizer.synthesize("Hello", "en").await,
        Err(Error::SynthesisFailed(_))
    ));

    // empty body is a failure too
    server.reset().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/speech"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    assert!(matches!(
        synthesizer.synthesize("Hello", "en").await,
        Err(Error::SynthesisFailed(_))
    ));
}
