//! In-Memory Catalog Implementation
//!
//! 离线/测试用的音色目录。名称唯一约束在插入时原子地执行（DashMap entry），
//! 行为与远端存储的唯一索引一致

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::application::ports::{CatalogError, CatalogPort};
use crate::domain::voice::{NewVoiceRecord, VoiceField, VoiceId, VoiceProjection, VoiceRecord};

struct StoredVoice {
    seq: u64,
    record: VoiceRecord,
}

/// 内存音色目录
pub struct InMemoryCatalog {
    voices: DashMap<String, StoredVoice>,
    next_seq: AtomicU64,
    insert_attempts: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            voices: DashMap::new(),
            next_seq: AtomicU64::new(1),
            insert_attempts: AtomicUsize::new(0),
        }
    }

    /// 当前记录数
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// 累计插入调用次数（含被拒绝的）
    pub fn insert_attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }

    /// 按插入顺序排列的全部记录
    fn ordered(&self) -> Vec<VoiceRecord> {
        let mut rows: Vec<(u64, VoiceRecord)> = self
            .voices
            .iter()
            .map(|entry| (entry.seq, entry.record.clone()))
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        rows.into_iter().map(|(_, record)| record).collect()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogPort for InMemoryCatalog {
    async fn list(&self, fields: &[VoiceField]) -> Result<Vec<VoiceProjection>, CatalogError> {
        Ok(self
            .ordered()
            .iter()
            .map(|record| record.project(fields))
            .collect())
    }

    async fn get_by_id(&self, id: &VoiceId) -> Result<Option<VoiceRecord>, CatalogError> {
        Ok(self
            .voices
            .iter()
            .find(|entry| &entry.record.id == id)
            .map(|entry| entry.record.clone()))
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<VoiceRecord>, CatalogError> {
        Ok(self.voices.get(name).map(|entry| entry.record.clone()))
    }

    async fn insert(&self, voice: &NewVoiceRecord) -> Result<VoiceRecord, CatalogError> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);

        match self.voices.entry(voice.name.clone()) {
            Entry::Occupied(_) => {
                tracing::debug!(name = %voice.name, "Rejected duplicate voice name");
                Err(CatalogError::DuplicateName {
                    name: voice.name.clone(),
                })
            }
            Entry::Vacant(slot) => {
                let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
                let created_at = Some(Utc::now().to_rfc3339());
                let record = voice
                    .clone()
                    .into_record(VoiceId::new(seq.to_string()), created_at);
                slot.insert(StoredVoice {
                    seq,
                    record: record.clone(),
                });
                tracing::debug!(
                    voice_id = %record.id,
                    name = %record.name,
                    "Voice stored in memory"
                );
                Ok(record)
            }
        }
    }
}
