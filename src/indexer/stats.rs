//! 索引统计信息模块

/// 一次索引调用的统计信息
#[derive(Debug, Default, Clone)]
pub struct IndexStats {
    /// 每个已提交批次的记录数，按提交顺序
    pub batch_sizes: Vec<usize>,
    /// 已提交的记录总数
    pub indexed_records: usize,
    /// 后端报告的单条写入失败数（不影响调用结果）
    pub item_errors: usize,
    /// 开始时间
    pub start_time: Option<std::time::Instant>,
    /// 完成时间
    pub end_time: Option<std::time::Instant>,
}

impl IndexStats {
    /// 创建新的统计信息，记录开始时间
    pub fn new() -> Self {
        Self {
            start_time: Some(std::time::Instant::now()),
            ..Default::default()
        }
    }

    /// 记录一个已成功提交的批次
    pub fn record_batch(&mut self, records: usize, item_errors: usize) {
        self.batch_sizes.push(records);
        self.indexed_records += records;
        self.item_errors += item_errors;
    }

    /// 已提交的批次数
    pub fn batches(&self) -> usize {
        self.batch_sizes.len()
    }

    /// 标记完成，记录结束时间
    pub fn finish(&mut self) {
        self.end_time = Some(std::time::Instant::now());
    }

    /// 计算持续时间
    pub fn duration(&self) -> Option<std::time::Duration> {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(end.duration_since(start)),
            _ => None,
        }
    }

    /// 计算每秒索引记录数
    pub fn records_per_second(&self) -> Option<f64> {
        self.duration().map(|d| {
            if d.as_secs_f64() > 0.0 {
                self.indexed_records as f64 / d.as_secs_f64()
            } else {
                0.0
            }
        })
    }
}

impl std::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "批次: {}, 记录: {}, 单条失败: {}",
            self.batches(),
            self.indexed_records,
            self.item_errors
        )?;

        if let Some(duration) = self.duration() {
            write!(f, ", 耗时: {:.2}s", duration.as_secs_f64())?;

            if let Some(rps) = self.records_per_second() {
                write!(f, ", 速度: {:.2} 记录/秒", rps)?;
            }
        }

        Ok(())
    }
}
