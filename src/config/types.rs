//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::voice::DEFAULT_SAMPLE_RATE;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 音色目录（远端表格存储）配置
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// 推理端点配置
    #[serde(default)]
    pub inference: InferenceConfig,

    /// 同步配置
    #[serde(default)]
    pub sync: SyncConfig,

    /// 本地产物存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 音色目录配置
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// 存储服务基础 URL（如 https://xxx.supabase.co）
    #[serde(default = "default_catalog_url")]
    pub base_url: String,

    /// API key
    #[serde(default)]
    pub api_key: String,

    /// 音色表名
    #[serde(default = "default_catalog_table")]
    pub table: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

fn default_catalog_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_catalog_table() -> String {
    "voice_files".to_string()
}

fn default_catalog_timeout() -> u64 {
    30
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            api_key: String::new(),
            table: default_catalog_table(),
            timeout_secs: default_catalog_timeout(),
        }
    }
}

/// 推理端点配置
#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// 推理端点完整 URL
    #[serde(default = "default_inference_url")]
    pub endpoint_url: String,

    /// Bearer token
    #[serde(default)]
    pub api_key: String,

    /// 默认超时时间（秒）
    #[serde(default = "default_inference_timeout")]
    pub timeout_secs: u64,

    /// 使用本地回显客户端代替远端端点
    #[serde(default)]
    pub fake: bool,
}

fn default_inference_url() -> String {
    "http://localhost:8000/runsync".to_string()
}

fn default_inference_timeout() -> u64 {
    300
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_inference_url(),
            api_key: String::new(),
            timeout_secs: default_inference_timeout(),
            fake: false,
        }
    }
}

/// 同步配置
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// 并发上传数（1 表示顺序上传）
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// 无法探测 WAV 头时使用的采样率
    #[serde(default = "default_sample_rate")]
    pub default_sample_rate: u32,
}

fn default_max_concurrent() -> usize {
    1
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            default_sample_rate: default_sample_rate(),
        }
    }
}

/// 本地产物存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别（trace/debug/info/warn/error）
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// 日志中显示的 key：只保留前 4 个字符
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "<unset>".to_string();
    }
    let prefix: String = secret.chars().take(4).collect();
    format!("{}****", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.catalog.table, "voice_files");
        assert_eq!(config.catalog.timeout_secs, 30);
        assert_eq!(config.inference.timeout_secs, 300);
        assert!(!config.inference.fake);
        assert_eq!(config.sync.max_concurrent, 1);
        assert_eq!(config.sync.default_sample_rate, 24000);
        assert_eq!(config.storage.output_dir, PathBuf::from("output"));
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "<unset>");
        assert_eq!(mask_secret("eyJhbGciOiJIUzI1NiJ9"), "eyJh****");
        assert_eq!(mask_secret("ab"), "ab****");
    }
}
