//! Memory Layer - In-Memory State
//!
//! 内存音色目录，供离线运行与测试使用

mod catalog;

pub use catalog::InMemoryCatalog;
