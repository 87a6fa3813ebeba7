//! ALB 访问日志解析器 - 解压、分行、分词与规范化
//!
//! ## 核心特性
//!
//! ### 1. 整体解压
//! - 日志文件由 ALB 生成，体积有上限，直接整体解压到内存
//! - 支持多成员 gzip 流
//!
//! ### 2. 逐行解析
//! - 按 `\n` 分行，行尾的 `\r` 会被去除
//! - 空行（包括文件末尾换行产生的空行）不产生记录
//! - 每行经过 `LineTokenizer` 拆为 25 个字段，再由 `RowNormalizer` 转为类型化记录
//!
//! ### 3. 全有或全无
//! - 任意一行失败即中止整个文件的解析，不返回部分结果
//! - 错误携带行号以及原始行内容或字段名，便于排查
//!
//! ## 解析流程
//!
//! ```text
//! gzip 字节 → gunzip_to_string() → lines() → tokenize() → normalize() → Vec<AccessLogRecord>
//!                                                ↓              ↓
//!                                          MalformedLine   FieldConversion
//! ```
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use alb_log_indexer::alb_log::LogParser;
//!
//! let bytes = std::fs::read("app.log.gz")?;
//! let records = LogParser::parse_file(&bytes)?;
//! println!("解析成功: {} 条记录", records.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::alb_log::decompress::gunzip_to_string;
use crate::alb_log::normalizer::RowNormalizer;
use crate::alb_log::tokenizer::LineTokenizer;
use crate::alb_log::types::AccessLogRecord;
use crate::error::Result;

/// 日志文件解析器
pub struct LogParser;

impl LogParser {
    /// 解压并解析一个完整的日志文件，保持行顺序
    pub fn parse_file(compressed: &[u8]) -> Result<Vec<AccessLogRecord>> {
        #[cfg(feature = "logging")]
        tracing::debug!("开始解析日志文件，压缩大小: {} 字节", compressed.len());

        let text = gunzip_to_string(compressed)?;
        let records = Self::parse_str(&text)?;

        #[cfg(feature = "logging")]
        tracing::info!("日志文件解析完成: {} 条记录", records.len());

        Ok(records)
    }

    /// 解析已解压的文本
    pub fn parse_str(text: &str) -> Result<Vec<AccessLogRecord>> {
        text.split('\n')
            .enumerate()
            .filter_map(|(idx, raw)| {
                let line = raw.strip_suffix('\r').unwrap_or(raw);
                (!line.is_empty()).then_some((idx + 1, line))
            })
            .map(|(line_num, line)| Self::parse_line(line, line_num))
            .collect()
    }

    /// 解析单行
    pub fn parse_line(line: &str, line_num: usize) -> Result<AccessLogRecord> {
        let tokens = LineTokenizer::tokenize(line, line_num)?;
        let record = RowNormalizer::normalize(&tokens, line_num)?;

        #[cfg(feature = "logging")]
        tracing::trace!("行{line_num} 解析成功: trace_id={}", record.trace_id);

        Ok(record)
    }
}
