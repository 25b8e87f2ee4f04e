//! Inference Engine Port - TTS 推理端点抽象
//!
//! 定义推理提交的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::domain::audio::CodecError;
use crate::domain::inference::{InferenceRequest, InferenceResult};

/// 推理错误
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Inference request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Inference endpoint returned HTTP {status}: {body}")]
    Endpoint { status: u16, body: String },

    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("Inference audio could not be decoded: {0}")]
    MalformedEncoding(#[from] CodecError),

    #[error("Network error: {0}")]
    Network(String),
}

/// Inference Engine Port
#[async_trait]
pub trait InferenceEnginePort: Send + Sync {
    /// 提交推理请求
    ///
    /// 单次 HTTP 调用，超时后丢弃已接收的部分数据；不做重试
    async fn submit(
        &self,
        request: &InferenceRequest,
        timeout: Duration,
    ) -> Result<InferenceResult, InferenceError>;

    /// 配置的默认超时
    fn default_timeout(&self) -> Duration;
}
