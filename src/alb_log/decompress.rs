//! gzip 解压

use crate::error::Result;
use flate2::read::MultiGzDecoder;
use std::io::Read;

/// 将完整的 gzip 字节解压为文本，多成员 gzip 流会按顺序拼接
pub fn gunzip_to_string(compressed: &[u8]) -> Result<String> {
    let mut decoder = MultiGzDecoder::new(compressed);
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;

    #[cfg(feature = "logging")]
    tracing::trace!(
        compressed = compressed.len(),
        decompressed = raw.len(),
        "gzip 解压完成"
    );

    Ok(String::from_utf8(raw)?)
}
