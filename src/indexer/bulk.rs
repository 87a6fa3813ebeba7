//! 批量写入请求的构造与 NDJSON 编码
//!
//! Elasticsearch `_bulk` 请求体中每条记录占两行：
//!
//! ```text
//! {"index":{"_index":"alb-access-logs-2019.05.19","_id":"1-5ce1a71c-..."}}
//! {"type":"h2","timestamp":"2019-05-19T18:57:32.116232Z",...}
//! ```

use crate::alb_log::types::AccessLogRecord;
use crate::error::Result;
use chrono::NaiveDate;
use serde::Serialize;

/// 计算目标索引名：`<prefix>-YYYY.MM.DD`
///
/// 日期取自调用方传入的参考日期，而不是记录自身的时间戳，
/// 同一次调用中的所有记录写入同一个索引。
pub fn index_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}", prefix, date.format("%Y.%m.%d"))
}

/// 单条写入：文档 ID 与文档内容
#[derive(Debug, Clone, Copy)]
pub struct BulkItem<'a> {
    pub id: &'a str,
    pub document: &'a AccessLogRecord,
}

/// 一个批次对应的批量写入请求
#[derive(Debug, Clone)]
pub struct BulkRequest<'a> {
    /// 目标索引
    pub index: String,
    /// ingest pipeline 名称
    pub pipeline: String,
    /// 与批次记录顺序一致的写入项
    pub items: Vec<BulkItem<'a>>,
}

#[derive(Serialize)]
struct IndexAction<'a> {
    index: IndexTarget<'a>,
}

#[derive(Serialize)]
struct IndexTarget<'a> {
    #[serde(rename = "_index")]
    index: &'a str,
    #[serde(rename = "_id")]
    id: &'a str,
}

impl<'a> BulkRequest<'a> {
    /// 为一批记录构造请求，ID 由每条记录的 trace id 推导
    pub fn new(index: &str, pipeline: &str, records: &'a [AccessLogRecord]) -> Self {
        let items = records
            .iter()
            .map(|document| BulkItem { id: document.document_id(), document })
            .collect();
        Self { index: index.to_string(), pipeline: pipeline.to_string(), items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 编码为 `_bulk` 接口使用的 NDJSON 请求体（以换行结尾）
    pub fn to_ndjson(&self) -> Result<String> {
        let mut body = String::new();
        for item in &self.items {
            let action = IndexAction {
                index: IndexTarget { index: &self.index, id: item.id },
            };
            body.push_str(&serde_json::to_string(&action)?);
            body.push('\n');
            body.push_str(&serde_json::to_string(item.document)?);
            body.push('\n');
        }
        Ok(body)
    }
}
