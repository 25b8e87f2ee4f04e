//! File Storage - 文件系统产物存储实现
//!
//! 实现 ArtifactStorePort trait

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{ArtifactStorePort, CatalogExport, StorageError};
use crate::domain::inference::InferenceRequest;
use crate::domain::voice::{VoiceId, VoiceProjection};

const VOICES_INFO_FILE: &str = "voices_info.json";
const VOICE_IDS_FILE: &str = "voice_ids.txt";

/// 文件名中只保留 `[A-Za-z0-9._-]`，其余替换为 `_`
///
/// 不同名称可能映射到同一文件名（如 "my voice" 与 "my_voice"），发生替换时记录警告
pub fn sanitize_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    };

    if sanitized != name {
        tracing::warn!(
            name = %name,
            file_name = %sanitized,
            "Name sanitized for file name, artifacts of other names may be overwritten"
        );
    }
    sanitized
}

/// voices_info.json 中的单条记录
#[derive(Serialize)]
struct VoiceInfoEntry<'a> {
    id: Option<&'a VoiceId>,
    name: Option<&'a str>,
    description: Option<&'a str>,
    file_size: Option<u64>,
    duration: Option<f64>,
    created_at: Option<&'a str>,
}

impl<'a> From<&'a VoiceProjection> for VoiceInfoEntry<'a> {
    fn from(voice: &'a VoiceProjection) -> Self {
        Self {
            id: voice.id.as_ref(),
            name: voice.name.as_deref(),
            description: voice.description.as_deref(),
            file_size: voice.file_size,
            duration: voice.duration,
            created_at: voice.created_at.as_deref(),
        }
    }
}

fn render_voice_ids(voices: &[VoiceProjection]) -> String {
    let mut out = String::from(
        "# Voice IDs for testing\n# Copy these IDs to use in your test scripts\n\n",
    );
    for voice in voices {
        let name = voice.name.as_deref().unwrap_or_default();
        let id = voice.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
        out.push_str(&format!("# {}: {}\n", name, id));
    }
    out
}

/// 文件系统产物存储
pub struct FileArtifactStore {
    /// 输出根目录
    base_dir: PathBuf,
}

impl FileArtifactStore {
    /// 创建新的文件存储
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| StorageError::Io {
                path: base_dir.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { base_dir })
    }

    /// 获取输出根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    async fn write(&self, file_name: String, data: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.base_dir.join(file_name);

        fs::write(&path, data).await.map_err(|e| StorageError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!(path = %path.display(), size = data.len(), "Artifact written");
        Ok(path)
    }
}

#[async_trait]
impl ArtifactStorePort for FileArtifactStore {
    async fn save_encoded_voice(&self, name: &str, encoded: &str) -> Result<PathBuf, StorageError> {
        self.write(
            format!("voice_{}_base64.txt", sanitize_name(name)),
            encoded.as_bytes(),
        )
        .await
    }

    async fn save_voice_audio(
        &self,
        name: &str,
        extension: &str,
        data: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let extension = extension.trim_start_matches('.');
        self.write(
            format!("voice_{}.{}", sanitize_name(name), sanitize_name(extension)),
            data,
        )
        .await
    }

    async fn save_payload(
        &self,
        name: &str,
        request: &InferenceRequest,
    ) -> Result<PathBuf, StorageError> {
        let json = serde_json::to_vec_pretty(request)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.write(format!("payload_{}.json", sanitize_name(name)), &json)
            .await
    }

    async fn save_catalog_export(
        &self,
        voices: &[VoiceProjection],
    ) -> Result<CatalogExport, StorageError> {
        let entries: Vec<VoiceInfoEntry<'_>> = voices.iter().map(VoiceInfoEntry::from).collect();
        let json = serde_json::to_vec_pretty(&entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let info_path = self.write(VOICES_INFO_FILE.to_string(), &json).await?;
        let ids_path = self
            .write(VOICE_IDS_FILE.to_string(), render_voice_ids(voices).as_bytes())
            .await?;

        tracing::debug!(
            info = %info_path.display(),
            ids = %ids_path.display(),
            "Catalog export files written"
        );

        Ok(CatalogExport {
            info_path,
            ids_path,
            voice_count: voices.len(),
        })
    }

    async fn save_output_audio(&self, name: &str, data: &[u8]) -> Result<PathBuf, StorageError> {
        self.write(format!("output_{}.wav", sanitize_name(name)), data)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::inference::{build_payload, ParameterSet};
    use crate::domain::voice::{NewVoiceRecord, VoiceField};
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("male_voice"), "male_voice");
        assert_eq!(sanitize_name("my voice/1"), "my_voice_1");
        assert_eq!(sanitize_name("v-2.alt"), "v-2.alt");
        assert_eq!(sanitize_name(""), "_");
    }

    #[tokio::test]
    async fn test_sanitized_names_share_file() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path()).await.unwrap();

        let spaced = store.save_output_audio("my voice", b"first").await.unwrap();
        let underscored = store.save_output_audio("my_voice", b"second").await.unwrap();

        assert_eq!(spaced, underscored);
        assert_eq!(std::fs::read(&spaced).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_creates_base_dir() {
        let temp_dir = tempdir().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let store = FileArtifactStore::new(&nested).await.unwrap();

        assert!(nested.is_dir());
        assert_eq!(store.base_dir(), nested.as_path());
    }

    #[tokio::test]
    async fn test_voice_and_output_files() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path()).await.unwrap();

        let encoded = store.save_encoded_voice("male voice", "UklGRg==").await.unwrap();
        assert!(encoded.ends_with("voice_male_voice_base64.txt"));
        assert_eq!(std::fs::read_to_string(&encoded).unwrap(), "UklGRg==");

        let audio = store.save_voice_audio("male voice", ".wav", b"RIFF").await.unwrap();
        assert!(audio.ends_with("voice_male_voice.wav"));

        let output = store.save_output_audio("male voice", b"RIFF out").await.unwrap();
        assert!(output.ends_with("output_male_voice.wav"));
        assert_eq!(std::fs::read(&output).unwrap(), b"RIFF out");
    }

    #[tokio::test]
    async fn test_payload_file() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path()).await.unwrap();

        let voice =
            NewVoiceRecord::from_audio_bytes("female_voice", "", Some("wav"), b"RIFF", 24000)
                .into_record(VoiceId::new("2"), None);
        let request = build_payload("Hello world.", &voice, &ParameterSet::default());

        let path = store.save_payload(&voice.name, &request).await.unwrap();
        let payload: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        assert!(path.ends_with("payload_female_voice.json"));
        assert_eq!(payload["input"]["text"], "Hello world.");
        assert_eq!(payload["input"]["voice_file"], "UklGRg==");
        assert_eq!(payload["input"]["settings"]["repetition_penalty"], 1.2);
    }

    #[tokio::test]
    async fn test_catalog_export() {
        let temp_dir = tempdir().unwrap();
        let store = FileArtifactStore::new(temp_dir.path()).await.unwrap();

        let voices: Vec<VoiceProjection> = [("1", "male_voice"), ("2", "female_voice")]
            .iter()
            .map(|(id, name)| {
                NewVoiceRecord::from_audio_bytes(*name, "desc", Some("wav"), b"RIFF", 24000)
                    .into_record(VoiceId::new(*id), Some("2025-06-08T10:00:00Z".to_string()))
                    .project(VoiceField::SUMMARY)
            })
            .collect();

        let export = store.save_catalog_export(&voices).await.unwrap();
        assert_eq!(export.voice_count, 2);

        let info: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&export.info_path).unwrap()).unwrap();
        assert_eq!(info[0]["id"], "1");
        assert_eq!(info[1]["name"], "female_voice");
        assert_eq!(info[1]["file_size"], 4);
        assert!(info[0].get("voice_data").is_none());

        let ids = std::fs::read_to_string(&export.ids_path).unwrap();
        assert!(ids.starts_with("# Voice IDs for testing\n"));
        assert!(ids.contains("# male_voice: 1\n"));
        assert!(ids.contains("# female_voice: 2\n"));
    }
}
