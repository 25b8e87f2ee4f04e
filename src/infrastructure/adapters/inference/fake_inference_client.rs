//! Fake Inference Client - 不调用推理端点的本地实现
//!
//! 将请求中的参考音频原样作为结果返回，用于在没有 GPU 端点时打通整条流程

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;

use crate::application::ports::{InferenceEnginePort, InferenceError};
use crate::domain::audio;
use crate::domain::inference::{InferenceRequest, InferenceResult};

/// Fake Inference Client
pub struct FakeInferenceClient {
    /// 模拟推理延迟
    delay: Duration,
    default_timeout: Duration,
}

impl FakeInferenceClient {
    pub fn new(delay: Duration) -> Self {
        tracing::info!(delay_ms = delay.as_millis() as u64, "FakeInferenceClient initialized");
        Self {
            delay,
            default_timeout: Duration::from_secs(300),
        }
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }
}

#[async_trait]
impl InferenceEnginePort for FakeInferenceClient {
    async fn submit(
        &self,
        request: &InferenceRequest,
        timeout: Duration,
    ) -> Result<InferenceResult, InferenceError> {
        tracing::debug!(
            text_len = request.text().len(),
            voice_sample_len = request.voice_sample().len(),
            "FakeInferenceClient: echoing voice sample"
        );

        tokio::time::timeout(timeout, tokio::time::sleep(self.delay))
            .await
            .map_err(|_| InferenceError::Timeout(timeout))?;

        let audio = audio::decode(request.voice_sample())?;

        let mut metadata = Map::new();
        metadata.insert(
            "id".to_string(),
            Value::String(format!("fake-{}", uuid::Uuid::new_v4())),
        );
        metadata.insert("status".to_string(), Value::String("COMPLETED".to_string()));

        Ok(InferenceResult { audio, metadata })
    }

    fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}
