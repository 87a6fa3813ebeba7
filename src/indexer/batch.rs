//! 分批提交
//!
//! 记录按到达顺序切成连续的批次，每批最多 `batch_size` 条。批次严格逐个提交，
//! 第一个失败的批次终止整个调用；此前的批次已经被后端确认，不会回滚。

use crate::alb_log::types::AccessLogRecord;
use crate::config::IndexerSettings;
use crate::error::{AlbLogError, Result};
use crate::indexer::bulk::{BulkRequest, index_name};
use crate::indexer::{BulkOutcome, BulkWriter, IndexStats, TransportError};
use chrono::NaiveDate;

/// 批量索引器
#[derive(Debug, Clone, Default)]
pub struct BatchIndexer {
    settings: IndexerSettings,
}

impl BatchIndexer {
    pub fn new(settings: IndexerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &IndexerSettings {
        &self.settings
    }

    /// 按参考日期构造全部批量请求，不做任何提交
    ///
    /// 同样的记录与日期总是得到相同的 `(索引, 文档ID)` 序列。
    pub fn build_requests<'a>(
        &self,
        records: &'a [AccessLogRecord],
        date: NaiveDate,
    ) -> Vec<BulkRequest<'a>> {
        let index = index_name(&self.settings.index_prefix, date);
        // chunks(0) 会 panic
        let batch_size = self.settings.batch_size.max(1);
        records
            .chunks(batch_size)
            .map(|chunk| BulkRequest::new(&index, &self.settings.pipeline, chunk))
            .collect()
    }

    /// 顺序提交所有批次
    pub fn store<W>(
        &self,
        writer: &mut W,
        records: &[AccessLogRecord],
        date: NaiveDate,
    ) -> Result<IndexStats>
    where
        W: BulkWriter + ?Sized,
    {
        let requests = self.build_requests(records, date);
        let mut stats = IndexStats::new();

        #[cfg(feature = "logging")]
        tracing::debug!(
            "写入器 {} 开始索引: {} 条记录, {} 个批次",
            writer.name(),
            records.len(),
            requests.len()
        );

        for (batch, request) in requests.iter().enumerate() {
            let result = writer.bulk_write(request);
            Self::settle(&mut stats, batch, request, result)?;
        }

        stats.finish();
        #[cfg(feature = "logging")]
        tracing::info!("索引完成 - {}", stats);
        Ok(stats)
    }

    /// 顺序提交所有批次 (异步版本)
    #[cfg(feature = "async")]
    pub async fn store_async<W>(
        &self,
        writer: &mut W,
        records: &[AccessLogRecord],
        date: NaiveDate,
    ) -> Result<IndexStats>
    where
        W: crate::indexer::AsyncBulkWriter + ?Sized,
    {
        let requests = self.build_requests(records, date);
        let mut stats = IndexStats::new();

        tracing::debug!(
            "写入器 {} 开始索引: {} 条记录, {} 个批次",
            writer.name(),
            records.len(),
            requests.len()
        );

        for (batch, request) in requests.iter().enumerate() {
            let result = writer.bulk_write(request).await;
            Self::settle(&mut stats, batch, request, result)?;
        }

        stats.finish();
        tracing::info!("索引完成 - {}", stats);
        Ok(stats)
    }

    /// 记录一个批次的结果；失败时转换为带已提交进度的 `Transport` 错误
    fn settle(
        stats: &mut IndexStats,
        batch: usize,
        request: &BulkRequest<'_>,
        result: std::result::Result<BulkOutcome, TransportError>,
    ) -> Result<()> {
        match result {
            Ok(outcome) => {
                #[cfg(feature = "logging")]
                {
                    if outcome.item_errors > 0 {
                        tracing::warn!(
                            "批次 {} 中有 {} 条文档写入失败",
                            batch,
                            outcome.item_errors
                        );
                    }
                    tracing::trace!(
                        "批次 {} 提交成功: {} 条记录, 后端耗时 {:?}ms",
                        batch,
                        request.len(),
                        outcome.took_ms
                    );
                }
                stats.record_batch(request.len(), outcome.item_errors);
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "logging")]
                tracing::error!(
                    "批次 {} 提交失败，已提交 {} 个批次: {}",
                    batch,
                    stats.batches(),
                    e
                );
                Err(AlbLogError::Transport {
                    batch,
                    committed_batches: stats.batches(),
                    committed_records: stats.indexed_records,
                    message: e.message,
                })
            }
        }
    }
}
