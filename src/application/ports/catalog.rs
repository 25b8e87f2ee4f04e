//! Catalog Port - 远端音色目录抽象
//!
//! 定义音色目录的读写接口，具体实现在 infrastructure 层（REST 客户端、内存实现）

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::voice::{NewVoiceRecord, VoiceField, VoiceId, VoiceProjection, VoiceRecord};

/// 目录操作名（用于错误与日志）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOperation {
    List,
    GetById,
    GetByName,
    Insert,
}

impl std::fmt::Display for CatalogOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CatalogOperation::List => "list",
            CatalogOperation::GetById => "get_by_id",
            CatalogOperation::GetByName => "get_by_name",
            CatalogOperation::Insert => "insert",
        };
        f.write_str(name)
    }
}

/// 目录错误
///
/// 每个变体都带上操作名与键（名称 / id / 投影字段）
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog {operation} '{key}' failed with HTTP {status}: {body}")]
    Unavailable {
        operation: CatalogOperation,
        key: String,
        status: u16,
        body: String,
    },

    #[error("Voice name already exists: {name}")]
    DuplicateName { name: String },

    #[error("Catalog {operation} '{key}' timed out")]
    Timeout {
        operation: CatalogOperation,
        key: String,
    },

    #[error("Catalog {operation} '{key}' network error: {message}")]
    Network {
        operation: CatalogOperation,
        key: String,
        message: String,
    },

    #[error("Failed to build catalog client: {0}")]
    Client(String),

    #[error("Catalog {operation} '{key}' returned an invalid response: {message}")]
    InvalidResponse {
        operation: CatalogOperation,
        key: String,
        message: String,
    },
}

/// Catalog Port
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// 列出音色，只请求给定字段，保持存储返回的顺序
    async fn list(&self, fields: &[VoiceField]) -> Result<Vec<VoiceProjection>, CatalogError>;

    /// 根据 id 获取音色，不存在时返回 None
    async fn get_by_id(&self, id: &VoiceId) -> Result<Option<VoiceRecord>, CatalogError>;

    /// 根据名称获取音色，不存在时返回 None
    ///
    /// 名称唯一，若存储返回多条则取第一条并记录数据完整性告警
    async fn get_by_name(&self, name: &str) -> Result<Option<VoiceRecord>, CatalogError>;

    /// 插入新音色，id 由存储分配
    ///
    /// 名称冲突返回 `CatalogError::DuplicateName`
    async fn insert(&self, voice: &NewVoiceRecord) -> Result<VoiceRecord, CatalogError>;
}

/// 从按键查询返回的多行中取第一条
///
/// 多于一行说明上游唯一约束被破坏，只告警不报错
pub fn first_match(
    mut rows: Vec<VoiceRecord>,
    operation: CatalogOperation,
    key: &str,
) -> Option<VoiceRecord> {
    if rows.len() > 1 {
        tracing::warn!(
            operation = %operation,
            key = %key,
            matches = rows.len(),
            "Data integrity warning: multiple catalog records share one key, using the first"
        );
    }
    if rows.is_empty() {
        None
    } else {
        Some(rows.swap_remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str) -> VoiceRecord {
        NewVoiceRecord::from_audio_bytes(name, "", None, b"x", 24000)
            .into_record(VoiceId::new(id), None)
    }

    #[test]
    fn test_first_match_takes_first_row() {
        let rows = vec![record("1", "dup"), record("2", "dup"), record("3", "dup")];
        let found = first_match(rows, CatalogOperation::GetByName, "dup").unwrap();
        assert_eq!(found.id.as_str(), "1");
    }

    #[test]
    fn test_first_match_empty() {
        assert!(first_match(Vec::new(), CatalogOperation::GetById, "9").is_none());
    }

    #[test]
    fn test_error_names_operation_and_key() {
        let err = CatalogError::Unavailable {
            operation: CatalogOperation::GetByName,
            key: "male_voice".to_string(),
            status: 503,
            body: "down".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("get_by_name"));
        assert!(message.contains("male_voice"));
        assert!(message.contains("503"));
    }
}
