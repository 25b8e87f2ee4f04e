//! 应用层错误定义
//!
//! 统一的命令/查询错误类型，失败时总是带上音色名称或 id

use thiserror::Error;

use crate::application::ports::{CatalogError, InferenceError, StorageError};
use crate::domain::audio::CodecError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 音色未找到（按名称与 id 均未命中）
    #[error("Voice not found: {0}")]
    VoiceNotFound(String),

    /// 目录错误（已包含操作名与键）
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// 推理失败
    #[error("Inference with voice '{voice}' failed: {source}")]
    Inference {
        voice: String,
        #[source]
        source: InferenceError,
    },

    /// 音频编解码失败
    #[error("Audio of voice '{voice}' is invalid: {source}")]
    Codec {
        voice: String,
        #[source]
        source: CodecError,
    },

    /// 本地存储错误
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ApplicationError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建推理错误
    pub fn inference(voice: impl Into<String>, source: InferenceError) -> Self {
        Self::Inference {
            voice: voice.into(),
            source,
        }
    }

    /// 创建编解码错误
    pub fn codec(voice: impl Into<String>, source: CodecError) -> Self {
        Self::Codec {
            voice: voice.into(),
            source,
        }
    }
}
