//! 日志初始化和配置模块
//!
//! 这个模块提供了统一的日志初始化功能，使用 tracing 库。
//! 默认配置：info 级别，输出到控制台和 logs 目录，按天滚动。

use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::SystemTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// 日志配置结构体
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: Level,
    /// 日志文件目录
    pub log_dir: PathBuf,
    /// 是否输出到控制台
    pub enable_stdout: bool,
}

impl LogConfig {
    /// 创建新的日志配置，使用默认级别
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置日志级别
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// 设置日志文件目录
    pub fn log_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.log_dir = dir.into();
        self
    }

    /// 设置是否输出到控制台
    pub fn enable_stdout(mut self, enable: bool) -> Self {
        self.enable_stdout = enable;
        self
    }

    /// 从配置文件中的 `[log]` 段构造
    pub fn from_settings(settings: &crate::config::LogSettings) -> LogResult<Self> {
        let level = settings
            .level
            .parse::<Level>()
            .map_err(|e| LogError::Config(format!("{}: {}", settings.level, e)))?;
        Ok(Self {
            level,
            log_dir: PathBuf::from(&settings.log_dir),
            enable_stdout: settings.enable_stdout,
        })
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            log_dir: PathBuf::from("logs"),
            enable_stdout: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
    #[error("日志配置错误: {0}")]
    Config(String),
}

/// 日志初始化结果
pub type LogResult<T> = Result<T, LogError>;

/// 初始化日志系统
///
/// - 环境变量 `RUST_LOG` 优先于配置的级别
/// - 控制台输出（可关闭）
/// - `log_dir` 目录下按天滚动的 `alb-indexer` 日志文件
///
/// 重复初始化不会报错。
///
/// # Examples
///
/// ```no_run
/// use alb_log_indexer::logging::{init_logging, LogConfig};
/// use tracing::Level;
///
/// let config = LogConfig::new().level(Level::DEBUG).log_dir("logs");
/// init_logging(config).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> LogResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    std::fs::create_dir_all(&config.log_dir)?;

    let console_layer = config.enable_stdout.then(|| {
        fmt::layer()
            .with_timer(SystemTime)
            .with_target(true)
            .with_ansi(true)
            .boxed()
    });

    let file_appender =
        tracing_appender::rolling::daily(&config.log_dir, "alb-indexer");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_timer(SystemTime)
        .with_target(true)
        .with_ansi(false);

    match Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
    {
        Ok(()) => {
            // guard 必须存活到进程结束，否则文件日志会丢失
            std::mem::forget(guard);
            tracing::info!(
                "日志系统初始化完成 - 日志目录: {}",
                config.log_dir.display()
            );
            Ok(())
        }
        Err(_) => Ok(()),
    }
}
