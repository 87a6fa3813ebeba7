//! 错误类型定义
//!
//! 这个模块定义了库中使用的所有错误类型，使用 thiserror 提供丰富的错误信息。
//! 除 `NotFound` 外，所有错误对当前调用都是致命的。

/// ALB 日志索引器的结果类型
pub type Result<T> = std::result::Result<T, AlbLogError>;

/// ALB 日志解析与索引错误类型
#[derive(Debug, thiserror::Error)]
pub enum AlbLogError {
    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8编码错误
    #[error("UTF-8编码错误: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// JSON 序列化错误
    #[error("JSON序列化错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 行格式错误：字段数不是 25 或引号未闭合
    #[error("行格式错误 (行{line}): {content}")]
    MalformedLine { line: usize, content: String },

    /// 字段转换错误：数值或结构解析失败
    #[error("字段转换错误 (行{line}): 字段 {field} 的值 {value:?} 无效")]
    FieldConversion { line: usize, field: &'static str, value: String },

    /// 源对象不存在（通常表示已经处理过）
    #[error("对象不存在: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// 批量写入传输错误，之前的批次已经提交
    #[error(
        "批量写入失败 (批次{batch}, 已提交 {committed_batches} 个批次 / {committed_records} 条记录): {message}"
    )]
    Transport {
        batch: usize,
        committed_batches: usize,
        committed_records: usize,
        message: String,
    },

    /// 删除源对象失败，数据可能已经写入后端
    #[error("删除对象失败 {bucket}/{key}: {message}")]
    Deletion { bucket: String, key: String, message: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 配置文件解析错误
    #[error("配置解析错误: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// 配置文件序列化错误
    #[error("配置序列化错误: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// 日志错误（仅在启用 logging feature 时可用）
    #[cfg(feature = "logging")]
    #[error("日志错误: {0}")]
    Log(#[from] crate::logging::LogError),
}

impl AlbLogError {
    /// 创建一个行格式错误
    pub fn malformed_line<S: Into<String>>(line: usize, content: S) -> Self {
        let content = content.into();
        #[cfg(feature = "logging")]
        tracing::error!("行格式错误发生在第{}行: {}", line, content);
        Self::MalformedLine { line, content }
    }

    /// 创建一个字段转换错误
    pub fn field_conversion<S: Into<String>>(
        line: usize,
        field: &'static str,
        value: S,
    ) -> Self {
        let value = value.into();
        #[cfg(feature = "logging")]
        tracing::error!(line, field, value = %value, "字段转换错误");
        Self::FieldConversion { line, field, value }
    }

    /// 创建一个配置错误
    pub fn config<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        #[cfg(feature = "logging")]
        tracing::error!("配置错误: {}", message);
        Self::Config(message)
    }

    /// 检查是否为行格式错误
    pub fn is_malformed_line(&self) -> bool {
        matches!(self, AlbLogError::MalformedLine { .. })
    }

    /// 检查是否为字段转换错误
    pub fn is_field_conversion(&self) -> bool {
        matches!(self, AlbLogError::FieldConversion { .. })
    }

    /// 检查是否为对象不存在错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, AlbLogError::NotFound { .. })
    }

    /// 检查是否为传输错误
    pub fn is_transport(&self) -> bool {
        matches!(self, AlbLogError::Transport { .. })
    }

    /// 检查是否为删除错误
    pub fn is_deletion(&self) -> bool {
        matches!(self, AlbLogError::Deletion { .. })
    }

    /// 检查是否为配置错误
    pub fn is_config_error(&self) -> bool {
        matches!(self, AlbLogError::Config(_))
    }

    /// 除“对象不存在”以外的错误都会中止本次调用
    pub fn is_fatal(&self) -> bool {
        !self.is_not_found()
    }
}
