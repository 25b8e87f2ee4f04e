//! Voice Context - Value Objects

use serde::{Deserialize, Deserializer, Serialize};

/// 音色唯一标识
///
/// 由远端存储分配，对客户端不透明：可能是 UUID 字符串，也可能是自增整数
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for VoiceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Signed(n) => Self(n.to_string()),
            RawId::Unsigned(n) => Self(n.to_string()),
        })
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 音色名称
///
/// 目录内唯一的人类可读键
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceName(String);

impl VoiceName {
    pub fn new(name: impl Into<String>) -> Result<Self, &'static str> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("voice name cannot be empty");
        }
        if name.len() > 100 {
            return Err("voice name cannot exceed 100 characters");
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 目录中可投影的列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceField {
    Id,
    Name,
    Description,
    AudioData,
    MimeType,
    FileSize,
    Duration,
    SampleRate,
    CreatedAt,
}

impl VoiceField {
    /// 列表展示与目录导出使用的字段（不含音频数据）
    pub const SUMMARY: &'static [VoiceField] = &[
        VoiceField::Id,
        VoiceField::Name,
        VoiceField::Description,
        VoiceField::FileSize,
        VoiceField::Duration,
        VoiceField::CreatedAt,
    ];

    /// 远端存储中的列名
    pub fn column(&self) -> &'static str {
        match self {
            VoiceField::Id => "id",
            VoiceField::Name => "name",
            VoiceField::Description => "description",
            VoiceField::AudioData => "voice_data",
            VoiceField::MimeType => "file_type",
            VoiceField::FileSize => "file_size",
            VoiceField::Duration => "duration",
            VoiceField::SampleRate => "sample_rate",
            VoiceField::CreatedAt => "created_at",
        }
    }

    /// 生成投影子句，空集合表示全部列
    pub fn select_clause(fields: &[VoiceField]) -> String {
        if fields.is_empty() {
            return "*".to_string();
        }
        fields
            .iter()
            .map(VoiceField::column)
            .collect::<Vec<_>>()
            .join(",")
    }
}
