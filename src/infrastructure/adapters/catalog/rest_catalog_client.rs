//! REST Catalog Client - 调用远端表格存储（PostgREST 风格）
//!
//! 实现 CatalogPort trait
//!
//! 远端 API:
//! GET  {base_url}/rest/v1/{table}?select=id,name&name=eq.male_voice
//! POST {base_url}/rest/v1/{table}   (JSON, Prefer: return=representation)
//! 认证: `apikey` + `Authorization: Bearer` 两个静态请求头

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::application::ports::{first_match, CatalogError, CatalogOperation, CatalogPort};
use crate::domain::voice::{NewVoiceRecord, VoiceField, VoiceId, VoiceProjection, VoiceRecord};

/// PostgreSQL 唯一约束冲突错误码
const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL 类型转换失败错误码（如非数字字符串比较 bigint 列）
const INVALID_TEXT_REPRESENTATION: &str = "22P02";

/// 读取 PostgREST 错误体中的 `code` 字段
fn error_code(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("code")?
        .as_str()
        .map(str::to_string)
}

/// REST 目录客户端配置
#[derive(Debug, Clone)]
pub struct RestCatalogClientConfig {
    /// 存储服务基础 URL
    pub base_url: String,
    /// API key（同时用作 Bearer token）
    pub api_key: String,
    /// 音色表名
    pub table: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for RestCatalogClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            api_key: String::new(),
            table: "voice_files".to_string(),
            timeout_secs: 30,
        }
    }
}

impl RestCatalogClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// REST 目录客户端
pub struct RestCatalogClient {
    client: Client,
    config: RestCatalogClientConfig,
}

impl RestCatalogClient {
    /// 创建新的目录客户端
    pub fn new(config: RestCatalogClientConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 表 URL
    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.table
        )
    }

    /// 带认证头的请求
    fn request(&self, method: Method) -> RequestBuilder {
        let builder = self.client.request(method, self.table_url());
        if self.config.api_key.is_empty() {
            return builder;
        }
        builder
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    fn transport_error(e: reqwest::Error, operation: CatalogOperation, key: &str) -> CatalogError {
        if e.is_timeout() {
            CatalogError::Timeout {
                operation,
                key: key.to_string(),
            }
        } else if e.is_connect() {
            CatalogError::Network {
                operation,
                key: key.to_string(),
                message: format!("Cannot connect to catalog: {}", e),
            }
        } else {
            CatalogError::Network {
                operation,
                key: key.to_string(),
                message: e.to_string(),
            }
        }
    }

    fn parse_rows<T: DeserializeOwned>(
        body: &str,
        operation: CatalogOperation,
        key: &str,
    ) -> Result<Vec<T>, CatalogError> {
        serde_json::from_str(body).map_err(|e| CatalogError::InvalidResponse {
            operation,
            key: key.to_string(),
            message: e.to_string(),
        })
    }

    /// GET 读取行
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        operation: CatalogOperation,
        key: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, CatalogError> {
        tracing::debug!(
            url = %self.table_url(),
            operation = %operation,
            key = %key,
            "Sending catalog read"
        );

        let response = self
            .request(Method::GET)
            .query(query)
            .send()
            .await
            .map_err(|e| Self::transport_error(e, operation, key))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(e, operation, key))?;

        if status != StatusCode::OK {
            return Err(CatalogError::Unavailable {
                operation,
                key: key.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Self::parse_rows(&body, operation, key)
    }

    /// 按单列等值过滤读取完整记录
    async fn fetch_one(
        &self,
        operation: CatalogOperation,
        column: &str,
        key: &str,
    ) -> Result<Option<VoiceRecord>, CatalogError> {
        let query = [
            (column, format!("eq.{}", key)),
            ("select", "*".to_string()),
        ];
        let rows: Vec<VoiceRecord> = match self.fetch_rows(operation, key, &query).await {
            Ok(rows) => rows,
            // id 列是强类型时，无法转换的 key 不可能命中任何记录
            Err(CatalogError::Unavailable { status: 400, ref body, .. })
                if operation == CatalogOperation::GetById
                    && error_code(body).as_deref() == Some(INVALID_TEXT_REPRESENTATION) =>
            {
                tracing::debug!(
                    key = %key,
                    "Id rejected by catalog column type, treating as absent"
                );
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        Ok(first_match(rows, operation, key))
    }
}

#[async_trait]
impl CatalogPort for RestCatalogClient {
    async fn list(&self, fields: &[VoiceField]) -> Result<Vec<VoiceProjection>, CatalogError> {
        let select = VoiceField::select_clause(fields);
        let rows: Vec<VoiceProjection> = self
            .fetch_rows(CatalogOperation::List, &select, &[("select", select.clone())])
            .await?;

        tracing::debug!(count = rows.len(), select = %select, "Catalog listed");
        Ok(rows)
    }

    async fn get_by_id(&self, id: &VoiceId) -> Result<Option<VoiceRecord>, CatalogError> {
        self.fetch_one(CatalogOperation::GetById, "id", id.as_str())
            .await
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<VoiceRecord>, CatalogError> {
        self.fetch_one(CatalogOperation::GetByName, "name", name)
            .await
    }

    async fn insert(&self, voice: &NewVoiceRecord) -> Result<VoiceRecord, CatalogError> {
        let operation = CatalogOperation::Insert;
        let key = voice.name.as_str();

        tracing::debug!(
            url = %self.table_url(),
            name = %key,
            file_size = voice.file_size,
            "Sending catalog insert"
        );

        // 插入不重试：名称约束存在竞争时重试可能产生重复记录
        let response = self
            .request(Method::POST)
            .header("Prefer", "return=representation")
            .json(voice)
            .send()
            .await
            .map_err(|e| Self::transport_error(e, operation, key))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(e, operation, key))?;

        let code = error_code(&body);
        let duplicate = match code.as_deref() {
            Some(code) => !status.is_success() && code == UNIQUE_VIOLATION,
            None => status == StatusCode::CONFLICT,
        };
        if duplicate {
            return Err(CatalogError::DuplicateName {
                name: voice.name.clone(),
            });
        }

        if status != StatusCode::CREATED {
            return Err(CatalogError::Unavailable {
                operation,
                key: key.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let rows: Vec<VoiceRecord> = Self::parse_rows(&body, operation, key)?;
        let record = first_match(rows, operation, key).ok_or_else(|| CatalogError::InvalidResponse {
            operation,
            key: key.to_string(),
            message: "insert returned no representation".to_string(),
        })?;

        tracing::info!(voice_id = %record.id, name = %record.name, "Voice inserted into catalog");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = RestCatalogClientConfig::default();
        assert_eq!(config.table, "voice_files");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            error_code(r#"{"code":"23503","message":"fk"}"#).as_deref(),
            Some("23503")
        );
        assert_eq!(error_code("upstream down"), None);
        assert_eq!(error_code(r#"{"message":"conflict"}"#), None);
    }

    #[test]
    fn test_config_builder() {
        let config = RestCatalogClientConfig::new("https://example.supabase.co/", "key")
            .with_table("voices")
            .with_timeout(5);
        let client = RestCatalogClient::new(config).unwrap();
        assert_eq!(client.table_url(), "https://example.supabase.co/rest/v1/voices");
        assert_eq!(client.config.timeout_secs, 5);
    }
}
