//! Storage Adapter - 本地产物存储实现

mod file_storage;

pub use file_storage::{sanitize_name, FileArtifactStore};
