//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（Catalog、InferenceEngine、ArtifactStore）
//! - commands: 同步上传、导出、载荷生成与语音合成
//! - queries: 音色列表与查找
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    BuildPayload, BuildPayloadResponse, ExportAllPayloads, ExportAllPayloadsResponse, ExportVoice,
    ExportVoiceResponse, GenerateSpeech, GenerateSpeechResponse, LocalVoiceFile, SyncFailure,
    SyncReport, SyncVoices, VoiceLookup,
    // Handlers
    handlers::{
        BuildPayloadHandler, ExportAllPayloadsHandler, ExportCatalogHandler, ExportVoiceHandler,
        GenerateSpeechHandler, SyncOptions, SyncVoicesHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    ArtifactStorePort, CatalogError, CatalogExport, CatalogOperation, CatalogPort,
    InferenceEnginePort, InferenceError, StorageError,
};

pub use queries::{
    GetVoice, ListVoices,
    handlers::{GetVoiceHandler, ListVoicesHandler},
};
