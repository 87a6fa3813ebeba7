//! NDJSON 文件写入器
//!
//! 将每个批量请求的 `_bulk` 请求体追加到本地文件，可用于离线回放或演练。

use crate::error::Result;
use crate::indexer::{BulkOutcome, BulkRequest, BulkWriter, TransportError};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 追加写入 NDJSON 文件的批量写入器
pub struct NdjsonFileWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    requests: usize,
    documents: usize,
}

impl NdjsonFileWriter {
    /// 打开（必要时创建）目标文件，追加写入
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        #[cfg(feature = "logging")]
        tracing::debug!("NDJSON 写入器打开文件: {}", path.display());

        Ok(Self { path, writer: BufWriter::new(file), requests: 0, documents: 0 })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 已写入的请求数
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// 已写入的文档数
    pub fn documents(&self) -> usize {
        self.documents
    }
}

impl BulkWriter for NdjsonFileWriter {
    fn name(&self) -> &str {
        "NDJSON"
    }

    fn bulk_write(
        &mut self,
        request: &BulkRequest<'_>,
    ) -> std::result::Result<BulkOutcome, TransportError> {
        let body = request
            .to_ndjson()
            .map_err(|e| TransportError::new(e.to_string()))?;
        self.writer
            .write_all(body.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|e| {
                TransportError::new(format!("写入 {} 失败: {}", self.path.display(), e))
            })?;

        self.requests += 1;
        self.documents += request.len();

        #[cfg(feature = "logging")]
        tracing::debug!(
            "NDJSON 批量写入: {} 条记录 -> {} (pipeline {})",
            request.len(),
            request.index,
            request.pipeline
        );

        Ok(BulkOutcome::default())
    }
}
