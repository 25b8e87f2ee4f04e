//! Command Handlers 实现

mod infer_command_handlers;
mod voice_handlers;

pub use infer_command_handlers::*;
pub use voice_handlers::*;
