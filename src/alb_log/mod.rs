//! ALB 访问日志解析模块
//!
//! 提供访问日志的解压、分词、字段规范化和类型定义

pub mod decompress;
pub mod normalizer;
pub mod parser;
pub mod tokenizer;
pub mod types;

// 重新导出核心类型
pub use decompress::gunzip_to_string;
pub use normalizer::RowNormalizer;
pub use parser::LogParser;
pub use tokenizer::LineTokenizer;
pub use types::{AccessLogRecord, FIELD_COUNT};
