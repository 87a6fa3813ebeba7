//! 批量索引模块
//!
//! 将记录切分为有上限的批次，按顺序提交给实现了 `BulkWriter` 的后端。

pub mod batch;
pub mod bulk;
pub mod ndjson;
pub mod stats;

#[cfg(feature = "elasticsearch")]
pub mod elasticsearch;

pub use batch::BatchIndexer;
pub use bulk::{BulkItem, BulkRequest, index_name};
pub use ndjson::NdjsonFileWriter;
pub use stats::IndexStats;

#[cfg(feature = "elasticsearch")]
pub use elasticsearch::ElasticsearchWriter;

/// 一次批量写入的结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    /// 后端处理耗时（毫秒），后端未提供时为空
    pub took_ms: Option<u64>,
    /// 请求整体成功但单条文档写入失败的数量
    pub item_errors: usize,
}

/// 传输层错误：整个批量请求没有被后端确认
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self { message: message.into() }
    }
}

/// 同步批量写入接口
pub trait BulkWriter {
    /// 写入器名称
    fn name(&self) -> &str;

    /// 提交一个批量请求，返回即表示该批次已被后端确认
    fn bulk_write(
        &mut self,
        request: &BulkRequest<'_>,
    ) -> std::result::Result<BulkOutcome, TransportError>;
}

/// 批量写入接口 (异步版本)
#[cfg(feature = "async")]
#[async_trait::async_trait]
pub trait AsyncBulkWriter: Send {
    /// 写入器名称
    fn name(&self) -> &str;

    /// 提交一个批量请求
    async fn bulk_write(
        &mut self,
        request: &BulkRequest<'_>,
    ) -> std::result::Result<BulkOutcome, TransportError>;
}
