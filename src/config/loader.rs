//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（voxsync.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{mask_secret, AppConfig};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["voxsync", "voxsync.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `VOXSYNC_`，层级分隔符 `__`）
/// 2. 配置文件（voxsync.toml 或 voxsync.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `VOXSYNC_CATALOG__BASE_URL=https://xxx.supabase.co`
/// - `VOXSYNC_CATALOG__API_KEY=...`
/// - `VOXSYNC_INFERENCE__ENDPOINT_URL=https://api.runpod.ai/v2/<id>/runsync`
/// - `VOXSYNC_SYNC__MAX_CONCURRENT=4`
///
/// `config_path` 为 None 时使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("catalog.base_url", "http://localhost:54321")?
        .set_default("catalog.api_key", "")?
        .set_default("catalog.table", "voice_files")?
        .set_default("catalog.timeout_secs", 30)?
        .set_default("inference.endpoint_url", "http://localhost:8000/runsync")?
        .set_default("inference.api_key", "")?
        .set_default("inference.timeout_secs", 300)?
        .set_default("inference.fake", false)?
        .set_default("sync.max_concurrent", 1)?
        .set_default("sync.default_sample_rate", 24000)?
        .set_default("storage.output_dir", "output")?
        .set_default("log.level", "info")?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: VOXSYNC_CATALOG__API_KEY=...
    builder = builder.add_source(
        Environment::with_prefix("VOXSYNC")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.catalog.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Catalog base URL cannot be empty".to_string(),
        ));
    }

    if config.catalog.table.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Catalog table cannot be empty".to_string(),
        ));
    }

    if config.catalog.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Catalog timeout cannot be 0".to_string(),
        ));
    }

    if !config.inference.fake && config.inference.endpoint_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Inference endpoint URL cannot be empty".to_string(),
        ));
    }

    if config.inference.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Inference timeout cannot be 0".to_string(),
        ));
    }

    if config.sync.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "Sync max_concurrent cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（key 打码）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Catalog URL: {}", config.catalog.base_url);
    tracing::info!("Catalog Table: {}", config.catalog.table);
    tracing::info!("Catalog Key: {}", mask_secret(&config.catalog.api_key));
    tracing::info!("Catalog Timeout: {}s", config.catalog.timeout_secs);
    if config.inference.fake {
        tracing::info!("Inference: fake (echo voice sample)");
    } else {
        tracing::info!("Inference URL: {}", config.inference.endpoint_url);
        tracing::info!("Inference Key: {}", mask_secret(&config.inference.api_key));
    }
    tracing::info!("Inference Timeout: {}s", config.inference.timeout_secs);
    tracing::info!("Sync Max Concurrent: {}", config.sync.max_concurrent);
    tracing::info!("Output Directory: {:?}", config.storage.output_dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_empty_catalog_url() {
        let mut config = AppConfig::default();
        config.catalog.base_url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.inference.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_concurrency() {
        let mut config = AppConfig::default();
        config.sync.max_concurrent = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_fake_inference_needs_no_endpoint() {
        let mut config = AppConfig::default();
        config.inference.endpoint_url = String::new();
        assert!(validate_config(&config).is_err());

        config.inference.fake = true;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[catalog]
base_url = "https://abc.supabase.co"
api_key = "secret"

[sync]
max_concurrent = 3
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.catalog.base_url, "https://abc.supabase.co");
        assert_eq!(config.catalog.api_key, "secret");
        assert_eq!(config.catalog.table, "voice_files");
        assert_eq!(config.sync.max_concurrent, 3);
        assert_eq!(config.inference.timeout_secs, 300);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = load_config_from_path(Some(Path::new("/nonexistent/voxsync.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
