//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod artifact_store;
mod catalog;
mod inference_engine;

pub use artifact_store::{ArtifactStorePort, CatalogExport, StorageError};
pub use catalog::{first_match, CatalogError, CatalogOperation, CatalogPort};
pub use inference_engine::{InferenceEnginePort, InferenceError};
