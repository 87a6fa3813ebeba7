//! 将 25 个原始字段转换为类型化的 `AccessLogRecord`

use crate::alb_log::types::{AccessLogRecord, FIELD_COUNT, FIELD_NAMES, SENTINEL};
use crate::error::{AlbLogError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::str::FromStr;

/// 行规范化器
pub struct RowNormalizer;

impl RowNormalizer {
    /// 从分词结果构造记录，任何字段转换失败都返回 `FieldConversion`
    pub fn normalize(tokens: &[&str], line_num: usize) -> Result<AccessLogRecord> {
        if tokens.len() != FIELD_COUNT {
            return Err(AlbLogError::malformed_line(line_num, tokens.join(" ")));
        }

        let (client_address, client_port) =
            Self::split_address(tokens[3], FIELD_NAMES[3], line_num)?;

        let (target_address, target_port) = match Self::optional(tokens[4]) {
            None => (None, None),
            Some(target) => {
                let (address, port) =
                    Self::split_address(target, FIELD_NAMES[4], line_num)?;
                (Some(address), Some(port))
            }
        };

        Ok(AccessLogRecord {
            kind: tokens[0].to_string(),
            timestamp: tokens[1].to_string(),
            load_balancer_id: tokens[2].to_string(),
            client_address,
            client_port,
            target_address,
            target_port,
            request_processing_time: Self::processing_time(tokens, 5, line_num)?,
            target_processing_time: Self::processing_time(tokens, 6, line_num)?,
            response_processing_time: Self::processing_time(tokens, 7, line_num)?,
            elb_status_code: Self::number(tokens, 8, line_num)?,
            target_status_code: Self::optional_number(tokens, 9, line_num)?,
            received_bytes: Self::number(tokens, 10, line_num)?,
            sent_bytes: Self::number(tokens, 11, line_num)?,
            request: tokens[12].to_string(),
            user_agent: tokens[13].to_string(),
            ssl_cipher: Self::optional_string(tokens[14]),
            ssl_protocol: Self::optional_string(tokens[15]),
            target_group_id: tokens[16].to_string(),
            trace_id: tokens[17].to_string(),
            domain_name: Self::optional_string(tokens[18]),
            certificate_id: Self::optional_string(tokens[19]),
            matched_rule_priority: Self::optional_number(tokens, 20, line_num)?,
            request_creation_time: tokens[21].to_string(),
            actions_executed: Self::actions_executed(tokens[22]),
            redirect_url: Self::optional_string(tokens[23]),
            error_reason: Self::optional_string(tokens[24]),
        })
    }

    /// 按最后一个 `:` 拆分地址与端口，兼容 IPv6 字面量
    pub fn split_address(
        token: &str,
        field: &'static str,
        line_num: usize,
    ) -> Result<(String, u16)> {
        let (address, port) = token
            .rsplit_once(':')
            .ok_or_else(|| AlbLogError::field_conversion(line_num, field, token))?;
        let port = port
            .parse::<u16>()
            .map_err(|_| AlbLogError::field_conversion(line_num, field, token))?;
        Ok((address.to_string(), port))
    }

    /// 处理时间以秒为单位（`0.001`、`-1`），取整数部分
    pub fn truncate_seconds(token: &str) -> Option<i64> {
        lazy_static! {
            static ref SECONDS_RE: Regex = Regex::new(r"^(-?\d+)(?:\.\d+)?$").unwrap();
        }
        SECONDS_RE
            .captures(token)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<i64>().ok())
    }

    fn processing_time(tokens: &[&str], idx: usize, line_num: usize) -> Result<i64> {
        Self::truncate_seconds(tokens[idx]).ok_or_else(|| {
            AlbLogError::field_conversion(line_num, FIELD_NAMES[idx], tokens[idx])
        })
    }

    fn number<T: FromStr>(tokens: &[&str], idx: usize, line_num: usize) -> Result<T> {
        tokens[idx].parse::<T>().map_err(|_| {
            AlbLogError::field_conversion(line_num, FIELD_NAMES[idx], tokens[idx])
        })
    }

    fn optional_number<T: FromStr>(
        tokens: &[&str],
        idx: usize,
        line_num: usize,
    ) -> Result<Option<T>> {
        match Self::optional(tokens[idx]) {
            None => Ok(None),
            Some(_) => Self::number(tokens, idx, line_num).map(Some),
        }
    }

    fn optional(token: &str) -> Option<&str> {
        if token == SENTINEL { None } else { Some(token) }
    }

    fn optional_string(token: &str) -> Option<String> {
        Self::optional(token).map(str::to_string)
    }

    fn actions_executed(token: &str) -> Vec<String> {
        Self::optional(token)
            .map(|actions| actions.split(',').map(str::to_string).collect())
            .unwrap_or_default()
    }
}
