//! 处理结果模型
//!
//! 单条记录的终态（SubmissionOutcome）与整批的聚合结果（BatchResult）。

use crate::models::record::Record;

/// 表单提交失败的结果描述
pub const FORM_FAILED_MSG: &str = "表单提交失败";
/// 任务创建失败的结果描述
pub const TASK_FAILED_MSG: &str = "任务创建失败";

/// 单条记录的处理结果
///
/// 创建后不再修改。
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    /// 对应的输入记录
    pub record: Record,
    /// 表单是否提交成功
    pub form_success: bool,
    /// 创建成功的任务 ID
    pub task_id: Option<String>,
    /// 失败描述（成功时为 None）
    pub error: Option<String>,
    /// 两个阶段合计使用的尝试次数
    pub attempt_count: u32,
}

impl SubmissionOutcome {
    /// 两个阶段都成功
    pub fn success(record: Record, task_id: String, attempt_count: u32) -> Self {
        Self {
            record,
            form_success: true,
            task_id: Some(task_id),
            error: None,
            attempt_count,
        }
    }

    /// 表单阶段用尽重试仍失败（任务阶段不会执行）
    pub fn form_failed(record: Record, attempt_count: u32) -> Self {
        Self {
            record,
            form_success: false,
            task_id: None,
            error: Some(FORM_FAILED_MSG.to_string()),
            attempt_count,
        }
    }

    /// 表单成功但任务创建用尽重试仍失败
    pub fn task_failed(record: Record, attempt_count: u32) -> Self {
        Self {
            record,
            form_success: true,
            task_id: None,
            error: Some(TASK_FAILED_MSG.to_string()),
            attempt_count,
        }
    }

    /// 记录被致命错误中断（尝试次数不再可知，记为 0）
    pub fn aborted(record: Record, reason: impl Into<String>) -> Self {
        Self {
            record,
            form_success: false,
            task_id: None,
            error: Some(reason.into()),
            attempt_count: 0,
        }
    }

    /// 是否完整成功
    pub fn is_success(&self) -> bool {
        self.task_id.is_some()
    }

    /// 结果的简短标签（用于报表）
    pub fn status_label(&self) -> &'static str {
        if self.task_id.is_some() {
            "成功"
        } else if self.form_success {
            "任务失败"
        } else {
            "表单失败"
        }
    }
}

/// 中止信息
#[derive(Debug, Clone)]
pub struct AbortInfo {
    /// 中止前已产出结果的记录数（含触发中止的那条）
    pub processed: usize,
    /// 本批记录总数
    pub total: usize,
    /// 中止原因
    pub reason: String,
}

/// 整批记录的处理结果
///
/// 结果顺序与输入顺序一致；长度等于实际处理到的记录数。
#[derive(Debug, Default)]
pub struct BatchResult {
    pub outcomes: Vec<SubmissionOutcome>,
    /// 致命错误导致提前中止时的信息
    pub aborted: Option<AbortInfo>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    /// 汇总统计
    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary {
            total: self.outcomes.len(),
            ..Default::default()
        };
        for outcome in &self.outcomes {
            if outcome.task_id.is_some() {
                summary.success += 1;
            } else if outcome.form_success {
                summary.task_failed += 1;
            } else {
                summary.form_failed += 1;
            }
        }
        summary
    }
}

/// 批次汇总统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub success: usize,
    pub form_failed: usize,
    pub task_failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> Record {
        Record::from_pairs(vec![("name".to_string(), name.to_string())])
    }

    #[test]
    fn test_form_failed_has_no_task_id() {
        let outcome = SubmissionOutcome::form_failed(record("a"), 3);
        assert!(!outcome.form_success);
        assert!(outcome.task_id.is_none());
        assert_eq!(outcome.attempt_count, 3);
        assert_eq!(outcome.status_label(), "表单失败");
    }

    #[test]
    fn test_summary_counts() {
        let mut result = BatchResult::default();
        result
            .outcomes
            .push(SubmissionOutcome::success(record("a"), "1".to_string(), 1));
        result
            .outcomes
            .push(SubmissionOutcome::form_failed(record("b"), 2));
        result
            .outcomes
            .push(SubmissionOutcome::task_failed(record("c"), 4));

        let summary = result.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.success, 1);
        assert_eq!(summary.form_failed, 1);
        assert_eq!(summary.task_failed, 1);
    }
}
