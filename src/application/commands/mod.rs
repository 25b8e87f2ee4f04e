//! 应用层 - 命令（写操作）
//!
//! 同步上传、载荷生成、语音合成与本地导出

mod infer_commands;
mod voice_commands;

pub mod handlers;

pub use infer_commands::*;
pub use voice_commands::*;
