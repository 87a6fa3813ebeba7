//! 单行访问日志的分词
//!
//! 字段之间以单个空格分隔；以 `"` 开头的字段为引号字段，内部空格按字面保留。
//! 引号字段的内容原样返回，不做反转义（`\"`、`\x22` 等原样交给调用方）。
//!
//! 引号字段内部出现的 `"` 只有同时满足以下两个条件时才结束该字段：
//! - 前面没有奇数个连续的 `\`
//! - 紧跟空格或位于行尾
//!
//! 其余的 `"` 都视为字段内容。

use crate::alb_log::types::FIELD_COUNT;
use crate::error::{AlbLogError, Result};

/// 行分词器
pub struct LineTokenizer;

impl LineTokenizer {
    /// 将一行拆分为恰好 25 个字段，返回的切片借用自 `line`
    ///
    /// 字段数不符或引号未闭合时返回 `AlbLogError::MalformedLine`。
    pub fn tokenize(line: &str, line_num: usize) -> Result<Vec<&str>> {
        let bytes = line.as_bytes();
        let len = bytes.len();
        let mut tokens = Vec::with_capacity(FIELD_COUNT);
        let mut pos = 0usize;

        loop {
            if tokens.len() == FIELD_COUNT {
                // 还有剩余内容，说明字段过多
                return Err(AlbLogError::malformed_line(line_num, line));
            }

            if bytes.get(pos) == Some(&b'"') {
                let start = pos + 1;
                let end = Self::closing_quote(bytes, start).ok_or_else(|| {
                    #[cfg(feature = "logging")]
                    tracing::trace!(line = line_num, column = pos, "引号字段未闭合");
                    AlbLogError::malformed_line(line_num, line)
                })?;
                tokens.push(&line[start..end]);
                pos = end + 1;
            } else {
                let end = bytes[pos..]
                    .iter()
                    .position(|&b| b == b' ')
                    .map_or(len, |offset| pos + offset);
                tokens.push(&line[pos..end]);
                pos = end;
            }

            if pos >= len {
                break;
            }
            // 此处 bytes[pos] 必为分隔空格
            pos += 1;
        }

        if tokens.len() != FIELD_COUNT {
            #[cfg(feature = "logging")]
            tracing::trace!(
                line = line_num,
                fields = tokens.len(),
                "字段数量不等于 {}",
                FIELD_COUNT
            );
            return Err(AlbLogError::malformed_line(line_num, line));
        }

        Ok(tokens)
    }

    /// 在 `start` 之后查找结束引号的位置
    fn closing_quote(bytes: &[u8], start: usize) -> Option<usize> {
        (start..bytes.len()).find(|&i| {
            bytes[i] == b'"'
                && !Self::is_escaped(bytes, start, i)
                && matches!(bytes.get(i + 1), None | Some(b' '))
        })
    }

    /// `i` 之前（不越过 `start`）是否有奇数个连续的反斜杠
    fn is_escaped(bytes: &[u8], start: usize, i: usize) -> bool {
        let backslashes = bytes[start..i]
            .iter()
            .rev()
            .take_while(|&&b| b == b'\\')
            .count();
        backslashes % 2 == 1
    }
}
