//! Audio - 音频编解码
//!
//! - 原始音频字节与文本安全表示（base64）之间的互转
//! - WAV 头探测（时长、采样率）
//! - 扩展名到 MIME 类型的映射
//! - 测试音色合成

mod encoding;
mod mime;
mod probe;
mod tone;

use thiserror::Error;

pub use encoding::{decode, encode};
pub use mime::{extension_for, mime_type_for, DEFAULT_MIME_TYPE};
pub use probe::{probe_wav, probe_wav_duration, WavInfo};
pub use tone::{synthesize_voice_wav, TestVoice, ToneSpec, TEST_VOICES};

/// 编解码错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("Decoded audio size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    #[error("WAV write error: {0}")]
    WavWrite(String),
}
