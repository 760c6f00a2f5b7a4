//! Gemini client tests against a local stand-in for the API.
//!
//! Run with: `cargo test -p tannoy-providers --test gemini`

use std::sync::{Arc, Mutex};

use axum::extract::{RawQuery, State};
use axum::http::{StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::{Value, json};

use tannoy_core::types::Language;
use tannoy_providers::{
    GeminiClient, GeminiSpeech, GeminiTranslator, MissingAudio, ProviderError, SpeechSynthesizer,
    Translator,
};

#[derive(Debug, Clone)]
struct Captured {
    path: String,
    query: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    reply: Value,
    captured: Arc<Mutex<Vec<Captured>>>,
}

async fn mock_handler(
    State(state): State<MockState>,
    uri: Uri,
    RawQuery(query): RawQuery,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.captured.lock().unwrap().push(Captured {
        path: uri.path().to_string(),
        query,
        body,
    });
    (state.status, Json(state.reply.clone()))
}

/// Start a mock Gemini server answering every request with `reply`.
async fn start_mock(status: StatusCode, reply: Value) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status,
        reply,
        captured: captured.clone(),
    };
    let app = Router::new().fallback(mock_handler).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), captured)
}

fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn audio_reply(data: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{ "inlineData": { "mimeType": "audio/L16;codec=pcm;rate=24000", "data": data } }]
            },
            "finishReason": "STOP"
        }]
    })
}

#[tokio::test]
async fn test_translate_sends_prompt_and_trims_reply() {
    let (base, captured) = start_mock(StatusCode::OK, text_reply("  The store will close.\n")).await;
    let client = GeminiClient::new(Some(&base), Some("test-key".into()));
    let translator = GeminiTranslator::new(client, "gemini-2.5-flash");

    let out = translator
        .translate("Toko akan tutup", Language::English)
        .await
        .unwrap();
    assert_eq!(out, "The store will close.");

    let captured = captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].path, "/v1beta/models/gemini-2.5-flash:generateContent");
    assert_eq!(captured[0].query.as_deref(), Some("key=test-key"));
    let prompt = captured[0].body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap();
    assert!(prompt.contains("Toko akan tutup"));
    assert!(prompt.contains("English"));
}

#[tokio::test]
async fn test_translate_empty_reply_is_error() {
    let (base, _) = start_mock(StatusCode::OK, text_reply("   ")).await;
    let translator = GeminiTranslator::new(GeminiClient::new(Some(&base), None), "m");

    let err = translator
        .translate("Toko akan tutup", Language::Mandarin)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::EmptyText), "got {err:?}");
}

#[tokio::test]
async fn test_missing_key_omits_query_and_surfaces_api_error() {
    let (base, captured) = start_mock(
        StatusCode::FORBIDDEN,
        json!({ "error": { "code": 403, "message": "API key missing" } }),
    )
    .await;
    let translator = GeminiTranslator::new(GeminiClient::new(Some(&base), None), "m");

    let err = translator
        .translate("Toko akan tutup", Language::English)
        .await
        .unwrap_err();
    match err {
        ProviderError::Api { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("API key missing"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(captured.lock().unwrap()[0].query.is_none());
}

#[tokio::test]
async fn test_synthesize_requests_audio_in_voice() {
    let (base, captured) = start_mock(StatusCode::OK, audio_reply("AEAAwA==")).await;
    let speech = GeminiSpeech::new(
        GeminiClient::new(Some(&base), Some("k".into())),
        "gemini-2.5-flash-preview-tts",
        "Kore",
    );

    let audio = speech.synthesize("Toko akan tutup").await.unwrap();
    assert_eq!(audio.data, "AEAAwA==");
    assert_eq!(audio.mime_type.as_deref(), Some("audio/L16;codec=pcm;rate=24000"));

    let captured = captured.lock().unwrap();
    assert_eq!(
        captured[0].path,
        "/v1beta/models/gemini-2.5-flash-preview-tts:generateContent"
    );
    let body = &captured[0].body;
    assert_eq!(body["contents"][0]["parts"][0]["text"], "Toko akan tutup");
    assert_eq!(body["generationConfig"]["responseModalities"], json!(["AUDIO"]));
    assert_eq!(
        body["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
        "Kore"
    );
}

#[tokio::test]
async fn test_synthesize_without_audio_is_missing_audio() {
    let (base, _) = start_mock(StatusCode::OK, text_reply("I cannot speak")).await;
    let speech = GeminiSpeech::new(GeminiClient::new(Some(&base), None), "m", "Kore");

    let err = speech.synthesize("Toko akan tutup").await.unwrap_err();
    assert!(
        matches!(err, ProviderError::MissingAudio(MissingAudio::NoInlineData)),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    // Bind and drop to get a port nothing listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let speech = GeminiSpeech::new(
        GeminiClient::new(Some(&format!("http://127.0.0.1:{port}")), None),
        "m",
        "Kore",
    );

    let err = speech.synthesize("Toko akan tutup").await.unwrap_err();
    assert!(matches!(err, ProviderError::Http(_)), "got {err:?}");
}
