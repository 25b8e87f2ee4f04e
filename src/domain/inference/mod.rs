//! Inference Context - 推理请求构建
//!
//! 职责:
//! - 生成参数集
//! - 由音色记录 + 参数 + 文本确定性地构建推理请求

mod parameters;
mod payload;

pub use parameters::ParameterSet;
pub use payload::{build_payload, InferenceRequest, InferenceResult, SMOKE_TEST_TEXT};
