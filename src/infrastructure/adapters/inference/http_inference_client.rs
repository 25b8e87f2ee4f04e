//! HTTP Inference Client - 调用远端 TTS 推理端点
//!
//! 实现 InferenceEnginePort trait
//!
//! 端点 API（runsync 风格）:
//! POST {endpoint_url}
//! Request: {"input": {"text": "...", "voice_file": "<base64>", "settings": {...}}}
//! Response: {"id": "...", "status": "COMPLETED", "output": {"audio_base64": "..."}}

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::application::ports::{InferenceEnginePort, InferenceError};
use crate::domain::audio;
use crate::domain::inference::{InferenceRequest, InferenceResult};

/// HTTP 推理客户端配置
#[derive(Debug, Clone)]
pub struct HttpInferenceClientConfig {
    /// 推理端点完整 URL
    pub endpoint_url: String,
    /// Bearer token，空字符串表示不带认证头
    pub api_key: String,
    /// 默认超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpInferenceClientConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "http://localhost:8000/runsync".to_string(),
            api_key: String::new(),
            timeout_secs: 300,
        }
    }
}

impl HttpInferenceClientConfig {
    pub fn new(endpoint_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 推理客户端
///
/// 每次提交都是一次独立的 HTTP 调用，超时由调用方按请求指定
pub struct HttpInferenceClient {
    client: Client,
    config: HttpInferenceClientConfig,
}

impl HttpInferenceClient {
    /// 创建新的推理客户端
    pub fn new(config: HttpInferenceClientConfig) -> Result<Self, InferenceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn endpoint_url(&self) -> &str {
        &self.config.endpoint_url
    }
}

/// 从成功响应体中取出音频与元数据
///
/// 元数据为去掉 `output.audio_base64` 后的完整响应对象
fn extract_result(body: &[u8]) -> Result<InferenceResult, InferenceError> {
    let mut response: Map<String, Value> = serde_json::from_slice(body).map_err(|e| {
        InferenceError::MalformedResponse(format!("body is not a JSON object: {}", e))
    })?;

    let output = response
        .get_mut("output")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| InferenceError::MalformedResponse("missing 'output' object".to_string()))?;

    if let Some(error) = output.get("error").and_then(Value::as_str) {
        return Err(InferenceError::MalformedResponse(format!(
            "endpoint reported error: {}",
            error
        )));
    }

    let encoded = match output.remove("audio_base64") {
        Some(Value::String(encoded)) => encoded,
        Some(_) => {
            return Err(InferenceError::MalformedResponse(
                "'output.audio_base64' is not a string".to_string(),
            ))
        }
        None => {
            return Err(InferenceError::MalformedResponse(
                "missing 'output.audio_base64'".to_string(),
            ))
        }
    };

    let audio = audio::decode(&encoded)?;

    Ok(InferenceResult {
        audio,
        metadata: response,
    })
}

#[async_trait]
impl InferenceEnginePort for HttpInferenceClient {
    async fn submit(
        &self,
        request: &InferenceRequest,
        timeout: Duration,
    ) -> Result<InferenceResult, InferenceError> {
        tracing::debug!(
            url = %self.config.endpoint_url,
            text_len = request.text().len(),
            voice_sample_len = request.voice_sample().len(),
            timeout_secs = timeout.as_secs(),
            "Sending inference request"
        );

        let mut builder = self
            .client
            .post(&self.config.endpoint_url)
            .timeout(timeout)
            .json(request);
        if !self.config.api_key.is_empty() {
            builder = builder.bearer_auth(&self.config.api_key);
        }

        let map_transport = |e: reqwest::Error| {
            if e.is_timeout() {
                InferenceError::Timeout(timeout)
            } else if e.is_connect() {
                InferenceError::Network(format!("Cannot connect to inference endpoint: {}", e))
            } else {
                InferenceError::Network(e.to_string())
            }
        };

        let response = builder.send().await.map_err(map_transport)?;

        let status = response.status();
        if !status.is_success() {
            // 错误体读取同样受请求超时约束
            let body = response.text().await.map_err(map_transport)?;
            return Err(InferenceError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        // 请求超时覆盖到响应体读取结束，超时后已收到的数据直接丢弃
        let body = response.bytes().await.map_err(map_transport)?;
        let result = extract_result(&body)?;

        tracing::info!(
            audio_size = result.audio.len(),
            status = ?result.metadata.get("status"),
            "Inference completed"
        );

        Ok(result)
    }

    fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }
}
