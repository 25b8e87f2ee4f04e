//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod catalog;
pub mod inference;
pub mod storage;

pub use catalog::*;
pub use inference::*;
pub use storage::*;
