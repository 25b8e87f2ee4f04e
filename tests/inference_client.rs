//! HttpInferenceClient 对接本地 stub 端点的集成测试

use axum::{body::Body, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
use futures_util::stream;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use voxsync::application::{InferenceEnginePort, InferenceError};
use voxsync::domain::audio;
use voxsync::domain::inference::{build_payload, InferenceRequest, ParameterSet};
use voxsync::domain::voice::{NewVoiceRecord, VoiceId};
use voxsync::infrastructure::adapters::{HttpInferenceClient, HttpInferenceClientConfig};

type Captured = Arc<Mutex<Option<(HeaderMap, Value)>>>;

async fn spawn_endpoint(captured: Captured) -> String {
    let app = Router::new()
        .route(
            "/ok",
            post(move |headers: HeaderMap, Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some((headers, body));
                    Json(json!({
                        "id": "sync-job-1",
                        "status": "COMPLETED",
                        "executionTime": 1830,
                        "output": { "audio_base64": audio::encode(b"RIFF generated") }
                    }))
                }
            }),
        )
        .route(
            "/missing",
            post(|| async { Json(json!({ "status": "COMPLETED", "output": {} })) }),
        )
        .route(
            "/error",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "GPU exploded") }),
        )
        .route(
            "/stalled-error",
            post(|| async {
                // 先返回状态行，错误体迟迟不到
                let body = stream::once(async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    Ok::<_, std::io::Error>("late detail")
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Body::from_stream(body))
            }),
        )
        .route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "output": { "audio_base64": "" } }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(url: String) -> HttpInferenceClient {
    HttpInferenceClient::new(HttpInferenceClientConfig::new(url, "gpu-key")).unwrap()
}

fn request() -> InferenceRequest {
    let voice =
        NewVoiceRecord::from_audio_bytes("male_voice", "", Some("wav"), b"RIFF sample", 24000)
            .into_record(VoiceId::new("1"), None);
    build_payload("Hello world. This is a short test.", &voice, &ParameterSet::default())
}

#[tokio::test]
async fn test_submit_decodes_audio_and_keeps_metadata() {
    let captured: Captured = Arc::default();
    let base_url = spawn_endpoint(captured.clone()).await;

    let result = client(format!("{}/ok", base_url))
        .submit(&request(), Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(result.audio, b"RIFF generated");
    assert_eq!(result.metadata["status"], "COMPLETED");
    assert_eq!(result.metadata["executionTime"], 1830);

    let (headers, body) = captured.lock().unwrap().take().unwrap();
    assert_eq!(headers["authorization"], "Bearer gpu-key");
    assert_eq!(body["input"]["text"], "Hello world. This is a short test.");
    assert_eq!(body["input"]["voice_file"], audio::encode(b"RIFF sample"));
    assert_eq!(body["input"]["settings"]["cfg_weight"], 0.5);
}

#[tokio::test]
async fn test_missing_audio_is_malformed() {
    let base_url = spawn_endpoint(Arc::default()).await;

    let err = client(format!("{}/missing", base_url))
        .submit(&request(), Duration::from_secs(5))
        .await
        .unwrap_err();

    assert!(matches!(err, InferenceError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_error_status_carries_body() {
    let base_url = spawn_endpoint(Arc::default()).await;

    let err = client(format!("{}/error", base_url))
        .submit(&request(), Duration::from_secs(5))
        .await
        .unwrap_err();

    match err {
        InferenceError::Endpoint { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "GPU exploded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_slow_endpoint_times_out() {
    let base_url = spawn_endpoint(Arc::default()).await;

    let started = Instant::now();
    let err = client(format!("{}/slow", base_url))
        .submit(&request(), Duration::from_secs(1))
        .await
        .unwrap_err();

    assert!(matches!(err, InferenceError::Timeout(t) if t == Duration::from_secs(1)));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_stalled_error_body_times_out() {
    let base_url = spawn_endpoint(Arc::default()).await;

    let started = Instant::now();
    let err = client(format!("{}/stalled-error", base_url))
        .submit(&request(), Duration::from_secs(1))
        .await
        .unwrap_err();

    assert!(matches!(err, InferenceError::Timeout(t) if t == Duration::from_secs(1)));
    assert!(started.elapsed() < Duration::from_secs(3));
}
