//! Voice Query Handlers

use std::sync::Arc;

use crate::application::commands::VoiceLookup;
use crate::application::error::ApplicationError;
use crate::application::ports::CatalogPort;
use crate::application::queries::{GetVoice, ListVoices};
use crate::domain::voice::{VoiceId, VoiceProjection, VoiceRecord};

/// ListVoices Handler
pub struct ListVoicesHandler {
    catalog: Arc<dyn CatalogPort>,
}

impl ListVoicesHandler {
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self { catalog }
    }

    pub async fn handle(
        &self,
        query: ListVoices,
    ) -> Result<Vec<VoiceProjection>, ApplicationError> {
        let voices = self.catalog.list(&query.fields).await?;
        tracing::debug!(count = voices.len(), "Listed catalog voices");
        Ok(voices)
    }
}

/// GetVoice Handler
///
/// 名称、id 两种查找都不命中时返回 None；Auto 模式在 get_by_name / get_by_id 之上组合
pub struct GetVoiceHandler {
    catalog: Arc<dyn CatalogPort>,
}

impl GetVoiceHandler {
    pub fn new(catalog: Arc<dyn CatalogPort>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self, query: GetVoice) -> Result<Option<VoiceRecord>, ApplicationError> {
        let identifier = query.identifier.as_str();
        let voice = match query.lookup {
            VoiceLookup::ByName => self.catalog.get_by_name(identifier).await?,
            VoiceLookup::ById => self.catalog.get_by_id(&VoiceId::new(identifier)).await?,
            VoiceLookup::Auto => match self.catalog.get_by_name(identifier).await? {
                Some(voice) => Some(voice),
                None => {
                    tracing::debug!(
                        identifier = %identifier,
                        "No voice with this name, trying as id"
                    );
                    self.catalog.get_by_id(&VoiceId::new(identifier)).await?
                }
            },
        };
        Ok(voice)
    }

    /// 获取音色，不存在时返回 `VoiceNotFound`
    pub async fn require(&self, query: GetVoice) -> Result<VoiceRecord, ApplicationError> {
        let identifier = query.identifier.clone();
        self.handle(query)
            .await?
            .ok_or(ApplicationError::VoiceNotFound(identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::NewVoiceRecord;
    use crate::infrastructure::memory::InMemoryCatalog;

    async fn seeded() -> Arc<InMemoryCatalog> {
        let catalog = Arc::new(InMemoryCatalog::new());
        for name in ["male_voice", "female_voice"] {
            let voice = NewVoiceRecord::from_audio_bytes(name, "test", Some("wav"), b"data", 24000);
            catalog.insert(&voice).await.unwrap();
        }
        catalog
    }

    #[tokio::test]
    async fn test_resolve_by_name_then_id() {
        let catalog = seeded().await;
        let handler = GetVoiceHandler::new(catalog.clone());

        let by_name = handler.handle(GetVoice::resolve("female_voice")).await.unwrap().unwrap();
        let by_id = handler
            .handle(GetVoice::resolve(by_name.id.as_str()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_id, by_name);
    }

    #[tokio::test]
    async fn test_explicit_lookup_does_not_fall_back() {
        let catalog = seeded().await;
        let handler = GetVoiceHandler::new(catalog);

        let query = GetVoice {
            identifier: "male_voice".to_string(),
            lookup: VoiceLookup::ById,
        };
        assert!(handler.handle(query).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_require_missing_voice() {
        let handler = GetVoiceHandler::new(Arc::new(InMemoryCatalog::new()));
        let err = handler.require(GetVoice::resolve("missing")).await.unwrap_err();
        assert!(matches!(err, ApplicationError::VoiceNotFound(ref id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_list_preserves_store_order() {
        let handler = ListVoicesHandler::new(seeded().await);
        let voices = handler.handle(ListVoices::default()).await.unwrap();
        let names: Vec<_> = voices.iter().filter_map(|v| v.name.as_deref()).collect();
        assert_eq!(names, vec!["male_voice", "female_voice"]);
        assert!(voices.iter().all(|v| v.audio_data.is_none()));
    }
}
