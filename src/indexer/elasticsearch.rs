//! Elasticsearch `_bulk` 写入器 (异步版本)

use crate::indexer::{AsyncBulkWriter, BulkOutcome, BulkRequest, TransportError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// 通过 HTTP `_bulk` 接口写入 Elasticsearch
pub struct ElasticsearchWriter {
    client: reqwest::Client,
    host: String,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    took: Option<u64>,
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

impl BulkResponse {
    /// 统计带 `error` 字段的写入项
    fn failed_items(&self) -> usize {
        if !self.errors {
            return 0;
        }
        self.items
            .iter()
            .filter(|item| {
                item.as_object()
                    .and_then(|actions| actions.values().next())
                    .is_some_and(|result| result.get("error").is_some())
            })
            .count()
    }
}

impl ElasticsearchWriter {
    pub fn new(host: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::new(format!("创建 HTTP 客户端失败: {e}")))?;
        Ok(Self { client, host: host.trim_end_matches('/').to_string() })
    }

    /// 构造 `_bulk` 请求，pipeline 作为编码后的查询参数
    fn build_request(
        &self,
        pipeline: &str,
        body: String,
    ) -> Result<reqwest::Request, TransportError> {
        self.client
            .post(format!("{}/_bulk", self.host))
            .query(&[("pipeline", pipeline)])
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .build()
            .map_err(|e| TransportError::new(format!("构造 _bulk 请求失败: {e}")))
    }
}

#[async_trait]
impl AsyncBulkWriter for ElasticsearchWriter {
    fn name(&self) -> &str {
        "Elasticsearch"
    }

    async fn bulk_write(
        &mut self,
        request: &BulkRequest<'_>,
    ) -> Result<BulkOutcome, TransportError> {
        if request.is_empty() {
            return Ok(BulkOutcome::default());
        }

        let body = request
            .to_ndjson()
            .map_err(|e| TransportError::new(e.to_string()))?;
        let http_request = self.build_request(&request.pipeline, body)?;
        let url = http_request.url().clone();

        tracing::debug!(
            "发送批量请求: {} 条记录 -> {} ({})",
            request.len(),
            request.index,
            url
        );

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|e| TransportError::new(format!("请求 {url} 失败: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TransportError::new(format!(
                "Elasticsearch 返回 {status}: {text}"
            )));
        }

        let parsed: BulkResponse = response
            .json()
            .await
            .map_err(|e| TransportError::new(format!("解析 _bulk 响应失败: {e}")))?;

        let item_errors = parsed.failed_items();
        if item_errors > 0 {
            tracing::warn!(
                "索引 {} 中有 {} 条文档写入失败",
                request.index,
                item_errors
            );
        }

        Ok(BulkOutcome { took_ms: parsed.took, item_errors })
    }
}
