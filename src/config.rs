//! 配置管理模块
//!
//! 提供统一的配置文件读取和管理功能

use crate::error::{AlbLogError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 默认索引前缀（不带结尾的 `-`）
pub const DEFAULT_INDEX_PREFIX: &str = "alb-access-logs";
/// 默认的 Elasticsearch ingest pipeline 名称
pub const DEFAULT_PIPELINE: &str = "aws-alb-logs";
/// 每个批量请求包含的最大记录数
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// 主配置结构体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// 日志配置
    #[serde(default)]
    pub log: LogSettings,
    /// 索引配置
    #[serde(default)]
    pub indexer: IndexerSettings,
    /// Elasticsearch 配置
    #[serde(default)]
    pub elasticsearch: ElasticsearchSettings,
    /// 日志文件来源配置
    #[serde(default)]
    pub source: SourceSettings,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// 是否启用控制台输出
    pub enable_stdout: bool,
    /// 日志输出目录
    pub log_dir: String,
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

/// 索引配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerSettings {
    /// 索引名前缀，最终索引名为 `<prefix>-YYYY.MM.DD`
    pub index_prefix: String,
    /// 写入时使用的 ingest pipeline
    pub pipeline: String,
    /// 单个批量请求的最大记录数
    pub batch_size: usize,
}

/// Elasticsearch 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticsearchSettings {
    /// 集群地址，例如 `http://localhost:9200`；为空时写入本地 NDJSON 文件
    pub host: Option<String>,
    /// 单个请求超时（秒）
    pub timeout_secs: u64,
}

/// 日志文件来源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// 本地对象存储根目录，对象路径为 `<root_dir>/<bucket>/<key>`
    pub root_dir: String,
    /// 索引成功后是否删除源文件
    pub delete_after_index: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enable_stdout: true,
            log_dir: "logs".to_string(),
            level: "info".to_string(),
        }
    }
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            index_prefix: DEFAULT_INDEX_PREFIX.to_string(),
            pipeline: DEFAULT_PIPELINE.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl Default for ElasticsearchSettings {
    fn default() -> Self {
        Self { host: None, timeout_secs: 30 }
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self { root_dir: "buckets".to_string(), delete_after_index: true }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// 从字符串加载配置
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 用环境变量覆盖部分配置
    ///
    /// - `ELASTICSEARCH_HOST` → `elasticsearch.host`
    /// - `ALB_INDEX_PREFIX` → `indexer.index_prefix`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ELASTICSEARCH_HOST").filter(|h| !h.is_empty())
        {
            #[cfg(feature = "logging")]
            tracing::debug!("使用环境变量 ELASTICSEARCH_HOST: {}", host);
            self.elasticsearch.host = Some(host);
        }
        if let Some(prefix) = lookup("ALB_INDEX_PREFIX").filter(|p| !p.is_empty())
        {
            self.indexer.index_prefix = prefix;
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        match self.log.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(AlbLogError::config(format!(
                    "无效的日志级别: {}",
                    self.log.level
                )));
            }
        }

        if self.indexer.batch_size == 0 {
            return Err(AlbLogError::config("batch_size 不能为0"));
        }

        if self.indexer.index_prefix.is_empty() {
            return Err(AlbLogError::config("index_prefix 不能为空"));
        }

        if self.indexer.index_prefix.ends_with('-') {
            return Err(AlbLogError::config(format!(
                "index_prefix 不应以 '-' 结尾: {}",
                self.indexer.index_prefix
            )));
        }

        if self.indexer.pipeline.is_empty() {
            return Err(AlbLogError::config("pipeline 不能为空"));
        }

        if self.elasticsearch.host.is_none() {
            #[cfg(feature = "logging")]
            tracing::warn!("未配置 Elasticsearch 地址，将写入本地 NDJSON 文件");
        }

        Ok(())
    }

    /// 检查配置的写入目标是否被当前构建支持
    ///
    /// 配置了 `elasticsearch.host` 但未启用 Elasticsearch 写入时拒绝运行，
    /// 避免把数据写进本地文件后又删除源对象。
    pub fn check_writer_support(&self, elasticsearch_enabled: bool) -> Result<()> {
        match self.elasticsearch.host.as_deref() {
            Some(host) if !elasticsearch_enabled => Err(AlbLogError::config(format!(
                "已配置 Elasticsearch 地址 {host}，但当前构建未启用 elasticsearch feature"
            ))),
            _ => Ok(()),
        }
    }
}
