//! ALB 访问日志解析与批量索引
//!
//! - [`alb_log`]：gzip 解压、分词、字段规范化
//! - [`indexer`]：分批、索引名与文档 ID 推导、批量写入
//! - [`process`]：下载 → 解析 → 索引 → 删除 的完整流程

pub mod alb_log;
pub mod config;
pub mod error;
pub mod indexer;
pub mod process;
pub mod source;

// 日志模块 - 仅在启用 logging feature 时可用
#[cfg(feature = "logging")]
pub mod logging;

pub use alb_log::{AccessLogRecord, LogParser};
pub use error::{AlbLogError, Result};
pub use indexer::{BatchIndexer, BulkWriter, IndexStats};
pub use process::{ObjectJob, handle_object, process_file};
