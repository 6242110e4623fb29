//! 流程与批处理的行为测试
//!
//! 用确定性的假表单/假任务服务替代真实浏览器和 API，
//! 验证重试、失败隔离、顺序保持与中止语义。

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use fastfield_asana_submit::error::{ApiError, AppError, AppResult, BrowserError};
use fastfield_asana_submit::models::Record;
use fastfield_asana_submit::orchestrator::BatchRunner;
use fastfield_asana_submit::services::{FormFiller, TaskCreator};
use fastfield_asana_submit::workflow::{RetryPolicy, SubmissionFlow};

/// 假表单服务：前 fail_first 次调用失败，之后成功
struct FakeFormFiller {
    fail_first: u32,
    calls: AtomicU32,
}

impl FakeFormFiller {
    fn ok() -> Self {
        Self::failing(0)
    }

    fn failing(fail_first: u32) -> Self {
        Self {
            fail_first,
            calls: AtomicU32::new(0),
        }
    }

    fn always_failing() -> Self {
        Self::failing(u32::MAX)
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FormFiller for FakeFormFiller {
    async fn submit(&self, _record: &Record) -> AppResult<()> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.fail_first {
            Err(AppError::Browser(BrowserError::WaitTimeout {
                selector: "form".to_string(),
                waited_secs: 0,
            }))
        } else {
            Ok(())
        }
    }
}

/// 假任务服务：前 fail_first 次调用失败（500），之后成功
struct FakeTaskCreator {
    fail_first: u32,
    calls: AtomicU32,
}

impl FakeTaskCreator {
    fn ok() -> Self {
        Self::failing(0)
    }

    fn failing(fail_first: u32) -> Self {
        Self {
            fail_first,
            calls: AtomicU32::new(0),
        }
    }

    fn always_failing() -> Self {
        Self::failing(u32::MAX)
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskCreator for FakeTaskCreator {
    async fn create(&self, record: &Record) -> AppResult<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.fail_first {
            Err(AppError::Api(ApiError::BadResponse {
                endpoint: "/tasks".to_string(),
                status: 500,
                message: None,
            }))
        } else {
            Ok(format!("task-{}", record.identifier()))
        }
    }
}

/// 假任务服务：前 succeed_first 次成功，之后返回凭证无效（致命）
struct ExpiringTokenTaskCreator {
    succeed_first: u32,
    calls: AtomicU32,
}

impl ExpiringTokenTaskCreator {
    fn new(succeed_first: u32) -> Self {
        Self {
            succeed_first,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl TaskCreator for ExpiringTokenTaskCreator {
    async fn create(&self, record: &Record) -> AppResult<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.succeed_first {
            Ok(format!("task-{}", record.identifier()))
        } else {
            Err(AppError::Api(ApiError::Unauthorized {
                endpoint: "/tasks".to_string(),
                status: 401,
            }))
        }
    }
}

fn record(name: &str, email: &str) -> Record {
    Record::from_pairs(vec![
        ("name".to_string(), name.to_string()),
        ("email".to_string(), email.to_string()),
    ])
}

fn records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| record(&format!("用户{}", i), &format!("user{}@x.com", i)))
        .collect()
}

fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries, Duration::from_millis(1))
}

#[tokio::test]
async fn test_batch_preserves_length_and_order() {
    let filler = FakeFormFiller::ok();
    let creator = FakeTaskCreator::ok();
    let flow = SubmissionFlow::new(&filler, &creator, fast_retry(0));
    let runner = BatchRunner::new(flow, Duration::ZERO);

    let input = records(5);
    let result = runner.run(&input).await;

    assert_eq!(result.len(), 5);
    assert!(!result.is_aborted());
    for (outcome, record) in result.outcomes.iter().zip(&input) {
        assert_eq!(outcome.record.identifier(), record.identifier());
        assert_eq!(
            outcome.task_id.as_deref(),
            Some(format!("task-{}", record.identifier()).as_str())
        );
    }
}

#[tokio::test]
async fn test_form_failure_never_yields_task_id() {
    let filler = FakeFormFiller::always_failing();
    let creator = FakeTaskCreator::ok();
    let flow = SubmissionFlow::new(&filler, &creator, fast_retry(1));
    let runner = BatchRunner::new(flow, Duration::ZERO);

    let result = runner.run(&records(1)).await;

    let outcome = &result.outcomes[0];
    assert!(!outcome.form_success);
    assert!(outcome.task_id.is_none());
    assert!(outcome.error.is_some());
    // 表单没成功，任务创建不应被调用
    assert_eq!(creator.calls(), 0);
}

#[tokio::test]
async fn test_permanently_failing_stage_attempted_exactly_r_plus_1_times() {
    let filler = FakeFormFiller::always_failing();
    let creator = FakeTaskCreator::ok();
    let flow = SubmissionFlow::new(&filler, &creator, fast_retry(3));
    let runner = BatchRunner::new(flow, Duration::ZERO);

    let result = runner.run(&records(1)).await;

    assert_eq!(filler.calls(), 4);
    assert_eq!(result.outcomes[0].attempt_count, 4);
}

#[tokio::test]
async fn test_task_stage_retry_cap_records_task_failure() {
    let filler = FakeFormFiller::ok();
    let creator = FakeTaskCreator::always_failing();
    let flow = SubmissionFlow::new(&filler, &creator, fast_retry(2));
    let runner = BatchRunner::new(flow, Duration::ZERO);

    let result = runner.run(&records(1)).await;

    let outcome = &result.outcomes[0];
    assert!(outcome.form_success);
    assert!(outcome.task_id.is_none());
    assert_eq!(creator.calls(), 3);
    // 1 次表单 + 3 次任务
    assert_eq!(outcome.attempt_count, 4);
    // 一条记录的失败不算批次中止
    assert!(!result.is_aborted());
}

#[tokio::test]
async fn test_retry_delay_is_honored() {
    let filler = FakeFormFiller::failing(2);
    let creator = FakeTaskCreator::ok();
    let retry = RetryPolicy::new(3, Duration::from_millis(50));
    let flow = SubmissionFlow::new(&filler, &creator, retry);
    let runner = BatchRunner::new(flow, Duration::ZERO);

    let start = Instant::now();
    let result = runner.run(&records(1)).await;
    let elapsed = start.elapsed();

    assert!(result.outcomes[0].is_success());
    // 两次失败 → 两次等待，至少 100ms
    assert!(
        elapsed >= Duration::from_millis(100),
        "实际耗时 {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_fatal_error_aborts_batch_at_record_k() {
    let filler = FakeFormFiller::ok();
    // 第 1 条成功，第 2 条遇到致命的凭证错误
    let creator = ExpiringTokenTaskCreator::new(1);
    let flow = SubmissionFlow::new(&filler, &creator, fast_retry(5));
    let runner = BatchRunner::new(flow, Duration::ZERO);

    let result = runner.run(&records(4)).await;

    assert_eq!(result.len(), 2);
    assert!(result.is_aborted());
    let abort = result.aborted.as_ref().unwrap();
    assert_eq!(abort.processed, 2);
    assert_eq!(abort.total, 4);

    assert!(result.outcomes[0].is_success());
    assert!(!result.outcomes[1].is_success());
    assert!(result.outcomes[1].error.is_some());
    // 致命错误不应消耗重试，之后的记录不再尝试
    assert_eq!(filler.calls(), 2);
}

#[tokio::test]
async fn test_task_creation_succeeds_on_third_attempt() {
    let filler = FakeFormFiller::ok();
    let creator = FakeTaskCreator::failing(2);
    let flow = SubmissionFlow::new(&filler, &creator, fast_retry(3));
    let runner = BatchRunner::new(flow, Duration::ZERO);

    let input = vec![record("Alice", "a@x.com")];
    let result = runner.run(&input).await;

    let outcome = &result.outcomes[0];
    assert!(outcome.form_success);
    assert_eq!(outcome.task_id.as_deref(), Some("task-a@x.com"));
    assert!(outcome.error.is_none());
    // 1 次表单 + 3 次任务创建
    assert_eq!(outcome.attempt_count, 4);
}

#[tokio::test]
async fn test_empty_batch_makes_no_external_calls() {
    let filler = FakeFormFiller::ok();
    let creator = FakeTaskCreator::ok();
    let flow = SubmissionFlow::new(&filler, &creator, fast_retry(2));
    let runner = BatchRunner::new(flow, Duration::ZERO);

    let result = runner.run(&[]).await;

    assert!(result.is_empty());
    assert!(!result.is_aborted());
    assert_eq!(filler.calls(), 0);
    assert_eq!(creator.calls(), 0);
}

#[tokio::test]
async fn test_inter_record_delay_between_records() {
    let filler = FakeFormFiller::ok();
    let creator = FakeTaskCreator::ok();
    let flow = SubmissionFlow::new(&filler, &creator, fast_retry(0));
    let runner = BatchRunner::new(flow, Duration::from_millis(40));

    let start = Instant::now();
    let result = runner.run(&records(3)).await;
    let elapsed = start.elapsed();

    assert_eq!(result.summary().success, 3);
    // 3 条记录之间等待 2 次
    assert!(
        elapsed >= Duration::from_millis(80),
        "实际耗时 {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_one_bad_record_does_not_stop_the_batch() {
    // 第 1 条的表单阶段失败一次后批内其余记录照常处理：
    // 用"前 1 次失败"的表单服务配 0 重试，第 1 条失败、其余成功
    let filler = FakeFormFiller::failing(1);
    let creator = FakeTaskCreator::ok();
    let flow = SubmissionFlow::new(&filler, &creator, fast_retry(0));
    let runner = BatchRunner::new(flow, Duration::ZERO);

    let result = runner.run(&records(3)).await;

    assert_eq!(result.len(), 3);
    assert!(!result.is_aborted());
    let summary = result.summary();
    assert_eq!(summary.form_failed, 1);
    assert_eq!(summary.success, 2);
}
