//! Domain Layer - 领域层
//!
//! 包含:
//! - Voice Context: 音色目录记录
//! - Inference Context: 推理参数与请求构建
//! - Audio: 音频编解码与探测

pub mod audio;
pub mod inference;
pub mod voice;
