//! Voice Context - Records

use serde::{Deserialize, Deserializer, Serialize};

use super::{VoiceField, VoiceId};
use crate::domain::audio::{self, CodecError};

/// 未指定时使用的采样率（与推理服务的默认采样率一致）
pub const DEFAULT_SAMPLE_RATE: u32 = 24000;

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_mime_type() -> String {
    audio::DEFAULT_MIME_TYPE.to_string()
}

/// null 与缺省一样处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 音色记录
///
/// 不变量:
/// - name 在目录内唯一
/// - audio_data 解码后恰好 file_size 字节
///
/// 由同步器上传时创建，之后不再修改
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceRecord {
    pub id: VoiceId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// base64 编码的音频
    #[serde(rename = "voice_data")]
    pub audio_data: String,
    #[serde(rename = "file_type", default = "default_mime_type")]
    pub mime_type: String,
    pub file_size: u64,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// 存储分配的创建时间，原样透传
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl VoiceRecord {
    /// 解码音频并校验大小
    pub fn decode_audio(&self) -> Result<Vec<u8>, CodecError> {
        let bytes = audio::decode(&self.audio_data)?;
        if bytes.len() as u64 != self.file_size {
            return Err(CodecError::SizeMismatch {
                expected: self.file_size,
                actual: bytes.len() as u64,
            });
        }
        Ok(bytes)
    }

    /// 只保留给定字段，空集合表示全部字段
    pub fn project(&self, fields: &[VoiceField]) -> VoiceProjection {
        let wants = |field: VoiceField| fields.is_empty() || fields.contains(&field);
        VoiceProjection {
            id: wants(VoiceField::Id).then(|| self.id.clone()),
            name: wants(VoiceField::Name).then(|| self.name.clone()),
            description: wants(VoiceField::Description).then(|| self.description.clone()),
            audio_data: wants(VoiceField::AudioData).then(|| self.audio_data.clone()),
            mime_type: wants(VoiceField::MimeType).then(|| self.mime_type.clone()),
            file_size: wants(VoiceField::FileSize).then_some(self.file_size),
            duration: if wants(VoiceField::Duration) { self.duration } else { None },
            sample_rate: wants(VoiceField::SampleRate).then_some(self.sample_rate),
            created_at: if wants(VoiceField::CreatedAt) {
                self.created_at.clone()
            } else {
                None
            },
        }
    }
}

impl std::fmt::Debug for VoiceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("description", &self.description)
            .field("audio_data_len", &self.audio_data.len())
            .field("mime_type", &self.mime_type)
            .field("file_size", &self.file_size)
            .field("duration", &self.duration)
            .field("sample_rate", &self.sample_rate)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// 待插入的音色（id 由存储分配）
#[derive(Clone, PartialEq, Serialize)]
pub struct NewVoiceRecord {
    pub name: String,
    pub description: String,
    #[serde(rename = "voice_data")]
    pub audio_data: String,
    #[serde(rename = "file_type")]
    pub mime_type: String,
    pub file_size: u64,
    pub duration: Option<f64>,
    pub sample_rate: u32,
}

impl NewVoiceRecord {
    /// 从原始音频字节构建
    ///
    /// 时长与采样率从 WAV 头探测；探测失败时时长为空，采样率退回 `fallback_sample_rate`
    pub fn from_audio_bytes(
        name: impl Into<String>,
        description: impl Into<String>,
        extension: Option<&str>,
        bytes: &[u8],
        fallback_sample_rate: u32,
    ) -> Self {
        let info = audio::probe_wav(bytes);
        Self {
            name: name.into(),
            description: description.into(),
            audio_data: audio::encode(bytes),
            mime_type: audio::mime_type_for(extension.unwrap_or_default()).to_string(),
            file_size: bytes.len() as u64,
            duration: info.as_ref().map(|i| i.duration_secs()),
            sample_rate: info
                .map(|i| i.sample_rate)
                .unwrap_or(fallback_sample_rate),
        }
    }

    /// 附加存储分配的字段
    pub fn into_record(self, id: VoiceId, created_at: Option<String>) -> VoiceRecord {
        VoiceRecord {
            id,
            name: self.name,
            description: self.description,
            audio_data: self.audio_data,
            mime_type: self.mime_type,
            file_size: self.file_size,
            duration: self.duration,
            sample_rate: self.sample_rate,
            created_at,
        }
    }
}

impl std::fmt::Debug for NewVoiceRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewVoiceRecord")
            .field("name", &self.name)
            .field("audio_data_len", &self.audio_data.len())
            .field("mime_type", &self.mime_type)
            .field("file_size", &self.file_size)
            .field("duration", &self.duration)
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}

/// 音色投影：list 只返回请求的列，其余为空
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceProjection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<VoiceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "voice_data",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub audio_data: Option<String>,
    #[serde(rename = "file_type", default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
