//! 失败记录写入服务 - 业务能力层
//!
//! 只负责"把终态失败的记录写进 failed.txt"能力，不关心流程

use std::fs::OpenOptions;
use std::io::Write;

use tracing::debug;

use crate::error::AppResult;

/// 失败记录写入服务
///
/// 职责：
/// - 将处理失败的记录追加到 failed.txt
/// - 只处理单条记录的失败
/// - 不关心流程顺序
pub struct FailureWriter {
    failed_file_path: String,
}

impl FailureWriter {
    /// 创建新的失败记录写入服务
    pub fn new() -> Self {
        Self {
            failed_file_path: "failed.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            failed_file_path: path.into(),
        }
    }

    /// 写入失败信息
    ///
    /// # 参数
    /// - `identifier`: 记录标识符
    /// - `stage`: 失败发生的阶段
    /// - `reason`: 失败原因
    pub async fn write(&self, identifier: &str, stage: &str, reason: &str) -> AppResult<()> {
        debug!(
            "写入失败记录: {} | 阶段: {} | 原因: {}",
            identifier, stage, reason
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.failed_file_path)?;

        let line = format!("记录 {} | 阶段: {} | 原因: {}\n", identifier, stage, reason);

        file.write_all(line.as_bytes())?;

        Ok(())
    }
}

impl Default for FailureWriter {
    fn default() -> Self {
        Self::new()
    }
}
