//! Voice Queries

use crate::application::commands::VoiceLookup;
use crate::domain::voice::VoiceField;

/// 列出音色查询
#[derive(Debug, Clone)]
pub struct ListVoices {
    pub fields: Vec<VoiceField>,
}

impl Default for ListVoices {
    fn default() -> Self {
        Self {
            fields: VoiceField::SUMMARY.to_vec(),
        }
    }
}

/// 获取单个音色查询
#[derive(Debug, Clone)]
pub struct GetVoice {
    pub identifier: String,
    pub lookup: VoiceLookup,
}

impl GetVoice {
    /// 先按名称再按 id
    pub fn resolve(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            lookup: VoiceLookup::Auto,
        }
    }
}
