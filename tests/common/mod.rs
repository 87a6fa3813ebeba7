//! 集成测试公共模块

use alb_log_indexer::indexer::{BulkOutcome, BulkRequest, BulkWriter, TransportError};
use flate2::{Compression, write::GzEncoder};
use std::io::Write;

/// 无目标（target 为 `-`）的 h2 请求
#[allow(dead_code)]
pub const NO_TARGET_LINE: &str = r#"h2 2019-05-19T18:57:32.116232Z app/jsj-test-lb/cb82e1b11d63594a 1.2.3.4:56716 - 0.000 0.001 0.000 304 304 12 103 "GET https://example-lb.jsherz.com:443/ HTTP/2.0" "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_4) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.157 Safari/537.36" ECDHE-RSA-AES128-GCM-SHA256 TLSv1.2 arn:aws:elasticloadbalancing:eu-west-2:123456789012:targetgroup/my-example/dc5cd405ccb3bda2 "Root=1-5ce1a71c-3e822c707b640bb0e3f00c20" "example-lb.jsherz.com" "arn:aws:acm:eu-west-2:123456789012:certificate/887fba39-8ccc-4274-8b3f-10da0f1a5540" 0 2019-05-19T18:57:32.115000Z "forward" "-" "-""#;

/// 请求、目标、响应处理时间均为 -1
#[allow(dead_code)]
pub const TIMEOUT_LINE: &str = r#"h2 2019-05-19T18:57:32.116232Z app/jsj-test-lb/cb82e1b11d63594a 1.2.3.4:56716 5.5.5.5:3000 -1 -1 -1 304 304 12 103 "GET https://example-lb.jsherz.com:443/ HTTP/2.0" "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_4) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.157 Safari/537.36" ECDHE-RSA-AES128-GCM-SHA256 TLSv1.2 arn:aws:elasticloadbalancing:eu-west-2:123456789012:targetgroup/my-example/dc5cd405ccb3bda2 "Root=1-5ce1a71c-3e822c707b640bb0e3f00c20" "example-lb.jsherz.com" "arn:aws:acm:eu-west-2:123456789012:certificate/887fba39-8ccc-4274-8b3f-10da0f1a5540" 0 2019-05-19T18:57:32.115000Z "forward" "-" "-""#;

/// 目标未返回状态码
#[allow(dead_code)]
pub const NO_TARGET_STATUS_LINE: &str = r#"h2 2019-05-19T18:57:32.116232Z app/jsj-test-lb/cb82e1b11d63594a 1.2.3.4:56716 10.0.0.4:5000 0.000 0.001 0.000 304 - 12 103 "GET https://example-lb.jsherz.com:443/ HTTP/2.0" "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_4) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/74.0.3729.157 Safari/537.36" ECDHE-RSA-AES128-GCM-SHA256 TLSv1.2 arn:aws:elasticloadbalancing:eu-west-2:123456789012:targetgroup/my-example/dc5cd405ccb3bda2 "Root=1-5ce1a71c-3e822c707b640bb0e3f00c20" "example-lb.jsherz.com" "arn:aws:acm:eu-west-2:123456789012:certificate/887fba39-8ccc-4274-8b3f-10da0f1a5540" 0 2019-05-19T18:57:32.115000Z "forward" "-" "-""#;

/// User-Agent 中带有转义的引号
#[allow(dead_code)]
pub const QUOTED_AGENT_LINE: &str = r#"h2 2019-05-27T16:21:31.236250Z app/alb/eee8660a11f63321 52.49.149.228:36256 10.0.5.18:80 0.001 0.001 0.000 200 200 39 3680 "GET https://example-lb.jsherz.com:443/ HTTP/2.0" "\x22SweetAgent/\x22" ECDHE-RSA-AES128-GCM-SHA256 TLSv1.2 arn:aws:elasticloadbalancing:eu-west-1:247940857651:targetgroup/one/4a093249cafdea53 "Root=1-5cec0e8b-3049d358629e1d1d3e067404" "example-lb.jsherz.com" "arn:aws:acm:eu-west-1:247940857651:certificate/7df02eb2-668d-4e32-919c-c50fe7d5d304" 0 2019-05-27T16:21:31.234000Z "forward" "-" "-""#;

/// 没有 SNI 域名，请求行缺少协议版本
#[allow(dead_code)]
pub const NO_SNI_LINE: &str = r#"https 2019-05-27T16:55:20.198772Z app/alb/eee8660a11f63321 90.249.24.86:33578 10.0.5.18:80 -1 0.001 0.000 404 404 28 3665 "GET https://alb-836247562.eu-west-1.elb.amazonaws.com:443/no-server-name-openssl -" "-" ECDHE-RSA-AES128-GCM-SHA256 TLSv1.2 arn:aws:elasticloadbalancing:eu-west-1:247940857651:targetgroup/one/4a093249cafdea53 "Root=1-5cec1678-06d7e8365e4ceb66da49515a" "-" "arn:aws:acm:eu-west-1:247940857651:certificate/7df02eb2-668d-4e32-919c-c50fe7d5d304" 0 2019-05-27T16:55:20.197000Z "forward" "-" "-""#;

/// 明文 http，无 TLS、无动作、无重定向、无错误原因
#[allow(dead_code)]
pub const PLAIN_HTTP_LINE: &str = r#"http 2019-05-27T16:42:59.315299Z app/alb/eee8660a11f63321 209.17.96.66:60068 10.0.5.18:80 0.001 0.001 0.000 200 200 126 3754 "GET http://alb-836247562.eu-west-1.elb.amazonaws.com:80/ HTTP/1.0" "Mozilla/5.0 (compatible; Nimbostratus-Bot/v1.3.2; http://cloudsystemnetworks.com)" - - arn:aws:elasticloadbalancing:eu-west-1:247940857651:targetgroup/one/4a093249cafdea53 "Root=1-5cec1392-0d118bdb0c9a13085a0bf420" "-" "-" 0 2019-05-27T16:42:58.508000Z "-" "-" "-""#;

/// 客户端与目标均为 IPv6
#[allow(dead_code)]
pub const IPV6_LINE: &str = r#"https 2019-05-27T20:02:51.108564Z app/alb/440f5d0d96de415d 2001:41d0:701:1100::29c8:57314 2001:41d0:701:1100::29c8:80 0.001 0.001 0.000 200 200 128 3754 "GET https://example-lb.jsherz.com:443/ HTTP/1.0" "ipv6-test.com validator" ECDHE-RSA-AES128-GCM-SHA256 TLSv1.2 arn:aws:elasticloadbalancing:eu-west-1:247940857651:targetgroup/alb/fe1499ac86c7fe07 "Root=1-5cec426b-02d34182065d64926aaa8fcc" "example-lb.jsherz.com" "arn:aws:acm:eu-west-1:247940857651:certificate/7df02eb2-668d-4e32-919c-c50fe7d5d304" 0 2019-05-27T20:02:51.106000Z "forward" "-" "-""#;

/// gzip 压缩
pub fn gzip(content: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(content.as_bytes()).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

/// 生成 `count` 行 trace id 各不相同的日志
#[allow(dead_code)]
pub fn numbered_lines(count: usize) -> String {
    let mut content = String::new();
    for i in 0..count {
        content.push_str(&PLAIN_HTTP_LINE.replace(
            "Root=1-5cec1392-0d118bdb0c9a13085a0bf420",
            &format!("Root=1-5cec1392-{i:024x}"),
        ));
        content.push('\n');
    }
    content
}

/// 记录每次批量写入的 (索引, pipeline, 文档ID 列表)
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub calls: Vec<(String, String, Vec<String>)>,
    pub fail_on: Option<usize>,
}

impl BulkWriter for RecordingWriter {
    fn name(&self) -> &str {
        "recording"
    }

    fn bulk_write(
        &mut self,
        request: &BulkRequest<'_>,
    ) -> Result<BulkOutcome, TransportError> {
        if self.fail_on == Some(self.calls.len()) {
            return Err(TransportError::new("backend unavailable"));
        }
        self.calls.push((
            request.index.clone(),
            request.pipeline.clone(),
            request.items.iter().map(|i| i.id.to_string()).collect(),
        ));
        Ok(BulkOutcome::default())
    }
}
