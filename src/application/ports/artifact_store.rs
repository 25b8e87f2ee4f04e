//! Artifact Store Port - 本地产物存储抽象
//!
//! 编码后的音色文本、推理载荷、目录导出与输出音频，文件名均由音色名称确定

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::inference::InferenceRequest;
use crate::domain::voice::VoiceProjection;

/// 存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// 目录导出结果
#[derive(Debug, Clone)]
pub struct CatalogExport {
    pub info_path: PathBuf,
    pub ids_path: PathBuf,
    pub voice_count: usize,
}

/// Artifact Store Port
#[async_trait]
pub trait ArtifactStorePort: Send + Sync {
    /// 保存 base64 编码的音色文本
    async fn save_encoded_voice(&self, name: &str, encoded: &str) -> Result<PathBuf, StorageError>;

    /// 保存解码后的音色音频
    async fn save_voice_audio(
        &self,
        name: &str,
        extension: &str,
        data: &[u8],
    ) -> Result<PathBuf, StorageError>;

    /// 保存推理载荷（JSON）
    async fn save_payload(
        &self,
        name: &str,
        request: &InferenceRequest,
    ) -> Result<PathBuf, StorageError>;

    /// 导出目录信息与 id 映射
    async fn save_catalog_export(
        &self,
        voices: &[VoiceProjection],
    ) -> Result<CatalogExport, StorageError>;

    /// 保存推理输出音频
    async fn save_output_audio(&self, name: &str, data: &[u8]) -> Result<PathBuf, StorageError>;
}
