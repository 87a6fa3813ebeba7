/// 每行日志固定的字段数量
pub const FIELD_COUNT: usize = 25;

/// “不适用”哨兵值
pub const SENTINEL: &str = "-";

/// 各字段在一行中的位置名称，用于错误信息
pub const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "type",
    "timestamp",
    "loadBalancerId",
    "client",
    "target",
    "requestProcessingTime",
    "targetProcessingTime",
    "responseProcessingTime",
    "elbStatusCode",
    "targetStatusCode",
    "receivedBytes",
    "sentBytes",
    "request",
    "userAgent",
    "sslCipher",
    "sslProtocol",
    "targetGroupId",
    "traceId",
    "domainName",
    "certificateId",
    "matchedRulePriority",
    "requestCreationTime",
    "actionsExecuted",
    "redirectUrl",
    "errorReason",
];

/// 单条 ALB 访问日志记录，序列化后即为写入索引的文档
#[derive(Default, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogRecord {
    /// 请求类型（http / https / h2 / ws / wss）
    #[serde(rename = "type")]
    pub kind: String,
    /// 响应生成时间（ISO-8601）
    pub timestamp: String,
    /// 负载均衡器资源 ID
    pub load_balancer_id: String,
    /// 客户端地址
    pub client_address: String,
    /// 客户端端口
    pub client_port: u16,
    /// 目标地址，无目标时为空
    pub target_address: Option<String>,
    /// 目标端口，无目标时为空
    pub target_port: Option<u16>,
    /// 请求处理时间，-1 表示连接超时等情况
    pub request_processing_time: i64,
    /// 目标处理时间
    pub target_processing_time: i64,
    /// 响应处理时间
    pub response_processing_time: i64,
    /// 负载均衡器返回的状态码
    pub elb_status_code: u16,
    /// 目标返回的状态码
    pub target_status_code: Option<u16>,
    /// 接收字节数
    pub received_bytes: u64,
    /// 发送字节数
    pub sent_bytes: u64,
    /// 请求行（原样保留转义序列）
    pub request: String,
    /// User-Agent（原样保留转义序列）
    pub user_agent: String,
    pub ssl_cipher: Option<String>,
    pub ssl_protocol: Option<String>,
    /// 目标组 ARN
    pub target_group_id: String,
    /// X-Amzn-Trace-Id，例如 `Root=1-5ce1a71c-...`
    pub trace_id: String,
    /// SNI 域名
    pub domain_name: Option<String>,
    /// 证书 ARN
    pub certificate_id: Option<String>,
    /// 匹配规则的优先级
    pub matched_rule_priority: Option<u32>,
    pub request_creation_time: String,
    /// 执行的动作，按原顺序
    pub actions_executed: Vec<String>,
    pub redirect_url: Option<String>,
    pub error_reason: Option<String>,
}

impl AccessLogRecord {
    /// 文档 ID：去掉 `Root=` 前缀后的 trace id
    ///
    /// 同一条记录多次写入时 ID 保持不变，因此重复索引只会覆盖。
    pub fn document_id(&self) -> &str {
        self.trace_id
            .strip_prefix("Root=")
            .unwrap_or(&self.trace_id)
    }
}
