//! Voxsync - 参考音色目录同步与 TTS 推理驱动
//!
//! 架构设计: CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice Context: 音色记录与字段投影
//! - Inference Context: 推理参数与请求构建
//! - Audio: base64 编解码、WAV 探测、测试音色合成
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Catalog, InferenceEngine, ArtifactStore）
//! - Commands: 同步、导出、载荷生成、语音合成
//! - Queries: 音色列表与查找
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: REST 目录客户端、HTTP/Fake 推理客户端、文件产物存储
//! - Memory: 内存目录实现

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

