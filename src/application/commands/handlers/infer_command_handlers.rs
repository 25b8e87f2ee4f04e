//! Inference Command Handlers - 载荷生成与语音合成

use std::sync::Arc;
use std::time::Instant;

use crate::application::commands::infer_commands::*;
use crate::application::error::ApplicationError;
use crate::application::ports::{ArtifactStorePort, CatalogPort, InferenceEnginePort};
use crate::application::queries::handlers::GetVoiceHandler;
use crate::application::queries::GetVoice;
use crate::domain::inference::{build_payload, ParameterSet};
use crate::domain::voice::VoiceField;

fn validate_request(text: &str, parameters: &ParameterSet) -> Result<(), ApplicationError> {
    if text.trim().is_empty() {
        return Err(ApplicationError::validation("text cannot be empty"));
    }
    parameters.validate().map_err(ApplicationError::validation)
}

/// BuildPayload Handler - 生成单个音色的载荷文件（不发送）
pub struct BuildPayloadHandler {
    voices: GetVoiceHandler,
    store: Arc<dyn ArtifactStorePort>,
}

impl BuildPayloadHandler {
    pub fn new(catalog: Arc<dyn CatalogPort>, store: Arc<dyn ArtifactStorePort>) -> Self {
        Self {
            voices: GetVoiceHandler::new(catalog),
            store,
        }
    }

    pub async fn handle(
        &self,
        cmd: BuildPayload,
    ) -> Result<BuildPayloadResponse, ApplicationError> {
        validate_request(&cmd.text, &cmd.parameters)?;

        let voice = self
            .voices
            .require(GetVoice {
                identifier: cmd.identifier,
                lookup: cmd.lookup,
            })
            .await?;

        let request = build_payload(&cmd.text, &voice, &cmd.parameters);
        let payload_path = self.store.save_payload(&voice.name, &request).await?;

        tracing::info!(
            name = %voice.name,
            voice_sample_len = request.voice_sample().len(),
            path = %payload_path.display(),
            "Payload generated"
        );

        Ok(BuildPayloadResponse {
            voice_name: voice.name,
            payload_path,
        })
    }
}

/// ExportAllPayloads Handler - 为目录中每个音色生成默认参数的载荷
///
/// 单个音色失败不影响其余音色
pub struct ExportAllPayloadsHandler {
    catalog: Arc<dyn CatalogPort>,
    store: Arc<dyn ArtifactStorePort>,
}

impl ExportAllPayloadsHandler {
    pub fn new(catalog: Arc<dyn CatalogPort>, store: Arc<dyn ArtifactStorePort>) -> Self {
        Self { catalog, store }
    }

    pub async fn handle(
        &self,
        cmd: ExportAllPayloads,
    ) -> Result<ExportAllPayloadsResponse, ApplicationError> {
        if cmd.text.trim().is_empty() {
            return Err(ApplicationError::validation("text cannot be empty"));
        }

        let entries = self
            .catalog
            .list(&[VoiceField::Id, VoiceField::Name])
            .await?;
        let params = ParameterSet::default();
        let mut response = ExportAllPayloadsResponse::default();

        for entry in entries {
            let label = entry
                .name
                .clone()
                .or_else(|| entry.id.as_ref().map(|id| id.to_string()))
                .unwrap_or_default();

            let Some(id) = entry.id else {
                response.failed.push((label, "catalog entry has no id".to_string()));
                continue;
            };

            let voice = match self.catalog.get_by_id(&id).await {
                Ok(Some(voice)) => voice,
                Ok(None) => {
                    response.failed.push((label, format!("voice {} disappeared", id)));
                    continue;
                }
                Err(e) => {
                    tracing::warn!(voice = %label, error = %e, "Failed to fetch voice for payload");
                    response.failed.push((label, e.to_string()));
                    continue;
                }
            };

            let request = build_payload(&cmd.text, &voice, &params);
            match self.store.save_payload(&voice.name, &request).await {
                Ok(path) => {
                    tracing::info!(name = %voice.name, path = %path.display(), "Payload generated");
                    response.written.push(path);
                }
                Err(e) => response.failed.push((label, e.to_string())),
            }
        }

        Ok(response)
    }
}

/// GenerateSpeech Handler - 查找音色、构建载荷、提交推理并保存输出音频
pub struct GenerateSpeechHandler {
    voices: GetVoiceHandler,
    engine: Arc<dyn InferenceEnginePort>,
    store: Arc<dyn ArtifactStorePort>,
}

impl GenerateSpeechHandler {
    pub fn new(
        catalog: Arc<dyn CatalogPort>,
        engine: Arc<dyn InferenceEnginePort>,
        store: Arc<dyn ArtifactStorePort>,
    ) -> Self {
        Self {
            voices: GetVoiceHandler::new(catalog),
            engine,
            store,
        }
    }

    pub async fn handle(
        &self,
        cmd: GenerateSpeech,
    ) -> Result<GenerateSpeechResponse, ApplicationError> {
        validate_request(&cmd.text, &cmd.parameters)?;

        let voice = self
            .voices
            .require(GetVoice {
                identifier: cmd.identifier,
                lookup: cmd.lookup,
            })
            .await?;

        let request = build_payload(&cmd.text, &voice, &cmd.parameters);

        let payload_path = if cmd.save_payload {
            Some(self.store.save_payload(&voice.name, &request).await?)
        } else {
            None
        };

        let timeout = cmd.timeout.unwrap_or_else(|| self.engine.default_timeout());

        tracing::info!(
            name = %voice.name,
            text_len = request.text().len(),
            voice_sample_len = request.voice_sample().len(),
            timeout_secs = timeout.as_secs(),
            "Submitting inference request"
        );

        let started = Instant::now();
        let result = self
            .engine
            .submit(&request, timeout)
            .await
            .map_err(|e| ApplicationError::inference(&voice.name, e))?;
        let elapsed = started.elapsed();

        let output_path = self.store.save_output_audio(&voice.name, &result.audio).await?;

        tracing::info!(
            name = %voice.name,
            audio_size = result.audio.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            path = %output_path.display(),
            "Speech generated"
        );

        Ok(GenerateSpeechResponse {
            voice_name: voice.name,
            output_path,
            payload_path,
            audio_size: result.audio.len(),
            elapsed,
            metadata: result.metadata,
        })
    }
}
