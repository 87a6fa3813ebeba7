//! 单个日志文件的处理流程
//!
//! ```text
//! fetch(bucket, key) → LogParser::parse_file → BatchIndexer::store → delete(bucket, key)
//! ```
//!
//! - 对象不存在视为已处理过（重复投递），记录日志后返回空统计
//! - 解析、索引、删除中的任何错误都会中止本次处理并返回给调用方
//! - 删除失败时数据已经写入后端，调用方可能会重复处理同一文件；
//!   文档 ID 由 trace id 推导，重复写入只会覆盖

use crate::alb_log::LogParser;
use crate::error::{AlbLogError, Result};
use crate::indexer::{BatchIndexer, BulkWriter, IndexStats};
use crate::source::ObjectStore;
use chrono::NaiveDate;

/// 解析并索引一个压缩日志文件，返回每个批次的提交统计
pub fn process_file<W>(
    compressed: &[u8],
    date: NaiveDate,
    indexer: &BatchIndexer,
    writer: &mut W,
) -> Result<IndexStats>
where
    W: BulkWriter + ?Sized,
{
    let records = LogParser::parse_file(compressed)?;
    indexer.store(writer, &records, date)
}

/// 解析并索引一个压缩日志文件 (异步版本)
#[cfg(feature = "async")]
pub async fn process_file_async<W>(
    compressed: &[u8],
    date: NaiveDate,
    indexer: &BatchIndexer,
    writer: &mut W,
) -> Result<IndexStats>
where
    W: crate::indexer::AsyncBulkWriter + ?Sized,
{
    let records = LogParser::parse_file(compressed)?;
    indexer.store_async(writer, &records, date).await
}

/// 一次对象处理请求
#[derive(Debug, Clone)]
pub struct ObjectJob<'a> {
    pub bucket: &'a str,
    pub key: &'a str,
    /// 参考日期，决定目标索引
    pub date: NaiveDate,
    /// 索引成功后是否删除源对象
    pub delete_after: bool,
}

/// 下载、解析、索引并删除一个对象
pub fn handle_object<S, W>(
    store: &S,
    job: &ObjectJob<'_>,
    indexer: &BatchIndexer,
    writer: &mut W,
) -> Result<IndexStats>
where
    S: ObjectStore + ?Sized,
    W: BulkWriter + ?Sized,
{
    let Some(compressed) = fetch_or_skip(store, job)? else {
        return Ok(IndexStats::default());
    };

    let stats = process_file(&compressed, job.date, indexer, writer)
        .inspect_err(|e| log_failure(job, e))?;

    #[cfg(feature = "logging")]
    tracing::info!("已索引日志文件 {}/{}: {}", job.bucket, job.key, stats);

    finish(store, job)?;
    Ok(stats)
}

/// 下载、解析、索引并删除一个对象 (异步版本)
#[cfg(feature = "async")]
pub async fn handle_object_async<S, W>(
    store: &S,
    job: &ObjectJob<'_>,
    indexer: &BatchIndexer,
    writer: &mut W,
) -> Result<IndexStats>
where
    S: ObjectStore + ?Sized,
    W: crate::indexer::AsyncBulkWriter + ?Sized,
{
    let Some(compressed) = fetch_or_skip(store, job)? else {
        return Ok(IndexStats::default());
    };

    let stats = process_file_async(&compressed, job.date, indexer, writer)
        .await
        .inspect_err(|e| log_failure(job, e))?;

    tracing::info!("已索引日志文件 {}/{}: {}", job.bucket, job.key, stats);

    finish(store, job)?;
    Ok(stats)
}

/// 读取对象；不存在时返回 `None`
fn fetch_or_skip<S>(store: &S, job: &ObjectJob<'_>) -> Result<Option<Vec<u8>>>
where
    S: ObjectStore + ?Sized,
{
    match store.fetch(job.bucket, job.key) {
        Ok(bytes) => {
            #[cfg(feature = "logging")]
            tracing::info!(
                "已下载日志文件 {}/{}: {} 字节",
                job.bucket,
                job.key,
                bytes.len()
            );
            Ok(Some(bytes))
        }
        Err(e) if e.is_not_found() => {
            #[cfg(feature = "logging")]
            tracing::info!("忽略不存在的对象 bucket={} key={}", job.bucket, job.key);
            Ok(None)
        }
        Err(e) => {
            log_failure(job, &e);
            Err(e)
        }
    }
}

/// 按需删除源对象，任何失败都转换为 `Deletion`
fn finish<S>(store: &S, job: &ObjectJob<'_>) -> Result<()>
where
    S: ObjectStore + ?Sized,
{
    if !job.delete_after {
        return Ok(());
    }

    store.delete(job.bucket, job.key).map_err(|e| {
        let err = AlbLogError::Deletion {
            bucket: job.bucket.to_string(),
            key: job.key.to_string(),
            message: e.to_string(),
        };
        log_failure(job, &err);
        err
    })?;

    #[cfg(feature = "logging")]
    tracing::info!("已删除日志文件 {}/{}", job.bucket, job.key);
    Ok(())
}

#[cfg_attr(not(feature = "logging"), allow(unused_variables))]
fn log_failure(job: &ObjectJob<'_>, err: &AlbLogError) {
    #[cfg(feature = "logging")]
    tracing::error!(
        "处理 ALB 访问日志失败 bucket={} key={}: {}",
        job.bucket,
        job.key,
        err
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::{BulkOutcome, BulkRequest, TransportError};
    use std::cell::RefCell;

    #[derive(Default)]
    struct CountingWriter {
        documents: usize,
    }

    impl BulkWriter for CountingWriter {
        fn name(&self) -> &str {
            "counting"
        }

        fn bulk_write(
            &mut self,
            request: &BulkRequest<'_>,
        ) -> std::result::Result<BulkOutcome, TransportError> {
            self.documents += request.len();
            Ok(BulkOutcome::default())
        }
    }

    /// 内存对象存储，可让删除失败
    struct MemoryStore {
        object: RefCell<Option<Vec<u8>>>,
        fail_delete: bool,
    }

    impl ObjectStore for MemoryStore {
        fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
            self.object.borrow().clone().ok_or_else(|| AlbLogError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
        }

        fn delete(&self, _bucket: &str, _key: &str) -> Result<()> {
            if self.fail_delete {
                return Err(std::io::Error::other("permission denied").into());
            }
            self.object.borrow_mut().take();
            Ok(())
        }
    }

    fn job() -> ObjectJob<'static> {
        ObjectJob {
            bucket: "logs",
            key: "a.log.gz",
            date: NaiveDate::from_ymd_opt(2019, 5, 19).unwrap(),
            delete_after: true,
        }
    }

    fn gzip_empty() -> Vec<u8> {
        use flate2::{Compression, write::GzEncoder};
        use std::io::Write;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"").unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_missing_object_is_tolerated() {
        let store = MemoryStore { object: RefCell::new(None), fail_delete: false };
        let mut writer = CountingWriter::default();
        let stats =
            handle_object(&store, &job(), &BatchIndexer::default(), &mut writer).unwrap();
        assert_eq!(stats.indexed_records, 0);
        assert_eq!(writer.documents, 0);
    }

    #[test]
    fn test_object_deleted_after_indexing() {
        let store =
            MemoryStore { object: RefCell::new(Some(gzip_empty())), fail_delete: false };
        let mut writer = CountingWriter::default();
        handle_object(&store, &job(), &BatchIndexer::default(), &mut writer).unwrap();
        assert!(store.object.borrow().is_none());
    }

    #[test]
    fn test_delete_failure_is_deletion_error() {
        let store =
            MemoryStore { object: RefCell::new(Some(gzip_empty())), fail_delete: true };
        let mut writer = CountingWriter::default();
        let err = handle_object(&store, &job(), &BatchIndexer::default(), &mut writer)
            .unwrap_err();
        assert!(err.is_deletion());
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn test_keep_object_when_delete_disabled() {
        let store =
            MemoryStore { object: RefCell::new(Some(gzip_empty())), fail_delete: true };
        let mut writer = CountingWriter::default();
        let job = ObjectJob { delete_after: false, ..job() };
        handle_object(&store, &job, &BatchIndexer::default(), &mut writer).unwrap();
        assert!(store.object.borrow().is_some());
    }

    #[test]
    fn test_corrupt_object_is_fatal() {
        let store = MemoryStore {
            object: RefCell::new(Some(b"not gzip".to_vec())),
            fail_delete: false,
        };
        let mut writer = CountingWriter::default();
        let err = handle_object(&store, &job(), &BatchIndexer::default(), &mut writer)
            .unwrap_err();
        assert!(err.is_fatal());
        // 解析失败时不删除源对象
        assert!(store.object.borrow().is_some());
    }
}
