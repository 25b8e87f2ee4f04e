//! Voice Command Handlers - 音色同步与导出

use futures_util::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;

use crate::application::commands::{
    ExportVoice, ExportVoiceResponse, LocalVoiceFile, SyncFailure, SyncReport, SyncVoices,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{ArtifactStorePort, CatalogError, CatalogExport, CatalogPort};
use crate::application::queries::handlers::GetVoiceHandler;
use crate::application::queries::GetVoice;
use crate::domain::audio;
use crate::domain::voice::{NewVoiceRecord, VoiceField, VoiceRecord, DEFAULT_SAMPLE_RATE};

// ============================================================================
// SyncVoices
// ============================================================================

/// 同步选项
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// 并发上传数（不同名称之间），1 表示顺序上传
    pub max_concurrent: usize,
    /// 无法从 WAV 头探测时使用的采样率
    pub default_sample_rate: u32,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 1,
            default_sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

enum SyncStep {
    Skip(String),
    Upload(LocalVoiceFile),
}

enum FileOutcome {
    Uploaded(VoiceRecord),
    Skipped(String),
    Failed(SyncFailure),
}

/// SyncVoices Handler
///
/// 只上传目录中还没有的名称。名称检查只是优化，真正的唯一性由存储保证：
/// 插入时的 `DuplicateName` 视为已存在而不是失败
pub struct SyncVoicesHandler {
    catalog: Arc<dyn CatalogPort>,
    options: SyncOptions,
}

impl SyncVoicesHandler {
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self::with_options(catalog, SyncOptions::default())
    }

    pub fn with_options(catalog: Arc<dyn CatalogPort>, options: SyncOptions) -> Self {
        Self { catalog, options }
    }

    pub async fn handle(&self, command: SyncVoices) -> Result<SyncReport, ApplicationError> {
        // 目录读取失败则无法判断，整批放弃
        let existing: HashSet<String> = self
            .catalog
            .list(&[VoiceField::Name])
            .await?
            .into_iter()
            .filter_map(|voice| voice.name)
            .collect();

        tracing::info!(
            existing = existing.len(),
            candidates = command.files.len(),
            rejected = command.rejected.len(),
            "Starting voice sync"
        );

        for failure in &command.rejected {
            tracing::warn!(
                path = %failure.path.display(),
                error = %failure.error,
                "Voice file rejected before upload"
            );
        }

        // 同一批次中重复的名称也只上传第一个
        let mut claimed: HashSet<String> = HashSet::new();
        let steps: Vec<SyncStep> = command
            .files
            .into_iter()
            .map(|file| {
                let name = file.name.as_str().to_string();
                if existing.contains(&name) || !claimed.insert(name.clone()) {
                    tracing::info!(name = %name, "Skipping voice (already exists)");
                    SyncStep::Skip(name)
                } else {
                    SyncStep::Upload(file)
                }
            })
            .collect();

        // buffered 保持输入顺序
        let outcomes: Vec<FileOutcome> = stream::iter(steps)
            .map(|step| async move {
                match step {
                    SyncStep::Skip(name) => FileOutcome::Skipped(name),
                    SyncStep::Upload(file) => self.upload(file).await,
                }
            })
            .buffered(self.options.max_concurrent.max(1))
            .collect()
            .await;

        let mut report = SyncReport {
            failed: command.rejected,
            ..SyncReport::default()
        };
        for outcome in outcomes {
            match outcome {
                FileOutcome::Uploaded(voice) => report.uploaded.push(voice),
                FileOutcome::Skipped(name) => report.skipped.push(name),
                FileOutcome::Failed(failure) => report.failed.push(failure),
            }
        }

        tracing::info!(
            uploaded = report.uploaded.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "Voice sync finished"
        );

        Ok(report)
    }

    async fn upload(&self, file: LocalVoiceFile) -> FileOutcome {
        let name = file.name.as_str().to_string();

        let bytes = match tokio::fs::read(&file.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(
                    name = %name,
                    path = %file.path.display(),
                    error = %e,
                    "Failed to read voice file"
                );
                return FileOutcome::Failed(SyncFailure {
                    name,
                    path: file.path,
                    error: format!("read failed: {}", e),
                });
            }
        };

        let candidate = NewVoiceRecord::from_audio_bytes(
            name.clone(),
            file.description.clone(),
            file.extension(),
            &bytes,
            self.options.default_sample_rate,
        );

        match self.catalog.insert(&candidate).await {
            Ok(voice) => {
                tracing::info!(
                    voice_id = %voice.id,
                    name = %voice.name,
                    file_size = voice.file_size,
                    duration = ?voice.duration,
                    "Voice uploaded"
                );
                FileOutcome::Uploaded(voice)
            }
            Err(CatalogError::DuplicateName { .. }) => {
                tracing::info!(name = %name, "Voice was inserted concurrently, skipping");
                FileOutcome::Skipped(name)
            }
            Err(e) => {
                tracing::warn!(name = %name, error = %e, "Failed to upload voice");
                FileOutcome::Failed(SyncFailure {
                    name,
                    path: file.path,
                    error: e.to_string(),
                })
            }
        }
    }
}

// ============================================================================
// ExportVoice
// ============================================================================

/// ExportVoice Handler - 保存音色的编码文本（可选解码音频）
pub struct ExportVoiceHandler {
    voices: GetVoiceHandler,
    store: Arc<dyn ArtifactStorePort>,
}

impl ExportVoiceHandler {
    pub fn new(catalog: Arc<dyn CatalogPort>, store: Arc<dyn ArtifactStorePort>) -> Self {
        Self {
            voices: GetVoiceHandler::new(catalog),
            store,
        }
    }

    pub async fn handle(
        &self,
        command: ExportVoice,
    ) -> Result<ExportVoiceResponse, ApplicationError> {
        let voice = self
            .voices
            .require(GetVoice {
                identifier: command.identifier,
                lookup: command.lookup,
            })
            .await?;

        let encoded_path = self
            .store
            .save_encoded_voice(&voice.name, &voice.audio_data)
            .await?;

        let audio_path = if command.decode {
            let bytes = voice
                .decode_audio()
                .map_err(|e| ApplicationError::codec(&voice.name, e))?;
            let extension = audio::extension_for(&voice.mime_type);
            Some(self.store.save_voice_audio(&voice.name, extension, &bytes).await?)
        } else {
            None
        };

        tracing::info!(
            name = %voice.name,
            encoded_len = voice.audio_data.len(),
            path = %encoded_path.display(),
            "Voice exported"
        );

        Ok(ExportVoiceResponse {
            voice,
            encoded_path,
            audio_path,
        })
    }
}

// ============================================================================
// ExportCatalog
// ============================================================================

/// ExportCatalog Handler - 导出目录信息与 id 映射
pub struct ExportCatalogHandler {
    catalog: Arc<dyn CatalogPort>,
    store: Arc<dyn ArtifactStorePort>,
}

impl ExportCatalogHandler {
    pub fn new(catalog: Arc<dyn CatalogPort>, store: Arc<dyn ArtifactStorePort>) -> Self {
        Self { catalog, store }
    }

    pub async fn handle(&self) -> Result<CatalogExport, ApplicationError> {
        let voices = self.catalog.list(VoiceField::SUMMARY).await?;
        let export = self.store.save_catalog_export(&voices).await?;

        tracing::info!(
            voices = export.voice_count,
            path = %export.info_path.display(),
            "Catalog exported"
        );

        Ok(export)
    }
}
