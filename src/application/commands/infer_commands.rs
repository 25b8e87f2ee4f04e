//! Inference Commands - 推理相关命令

use std::path::PathBuf;
use std::time::Duration;

use crate::application::commands::VoiceLookup;
use crate::domain::inference::ParameterSet;

/// 生成载荷命令（不发送）
#[derive(Debug, Clone)]
pub struct BuildPayload {
    pub identifier: String,
    pub lookup: VoiceLookup,
    pub text: String,
    pub parameters: ParameterSet,
}

/// 生成载荷响应
#[derive(Debug, Clone)]
pub struct BuildPayloadResponse {
    pub voice_name: String,
    pub payload_path: PathBuf,
}

/// 为目录中所有音色生成冒烟测试载荷
#[derive(Debug, Clone)]
pub struct ExportAllPayloads {
    pub text: String,
}

/// 批量载荷结果
#[derive(Debug, Clone, Default)]
pub struct ExportAllPayloadsResponse {
    pub written: Vec<PathBuf>,
    /// (音色, 错误)
    pub failed: Vec<(String, String)>,
}

/// 语音合成命令
#[derive(Debug, Clone)]
pub struct GenerateSpeech {
    pub identifier: String,
    pub lookup: VoiceLookup,
    pub text: String,
    pub parameters: ParameterSet,
    /// None 表示使用推理客户端的默认超时
    pub timeout: Option<Duration>,
    /// 同时保存载荷文件
    pub save_payload: bool,
}

/// 语音合成响应
#[derive(Debug, Clone)]
pub struct GenerateSpeechResponse {
    pub voice_name: String,
    pub output_path: PathBuf,
    pub payload_path: Option<PathBuf>,
    pub audio_size: usize,
    pub elapsed: Duration,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}
