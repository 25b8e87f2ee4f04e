//! Voice Context - 音色目录上下文
//!
//! 职责:
//! - 音色记录（含编码后的参考音频）
//! - 投影字段与名称约束

mod aggregate;
mod value_objects;

pub use aggregate::{NewVoiceRecord, VoiceProjection, VoiceRecord, DEFAULT_SAMPLE_RATE};
pub use value_objects::{VoiceField, VoiceId, VoiceName};
