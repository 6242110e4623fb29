//! 记录处理流程 - 流程层
//!
//! 核心职责：定义"一条记录"的完整处理流程
//!
//! 流程顺序：
//! 1. 表单提交（失败重试，用尽后终止，不进入任务创建）
//! 2. 任务创建（失败重试，用尽后记为任务失败）
//!
//! 两个阶段独立重试：表单没提交成功就创建任务，会产生指向
//! 不存在数据的任务；表单成功后再重新提交表单，会产生重复
//! 的表单记录。所以阶段一失败绝不进入阶段二，阶段二失败也
//! 绝不回头重做阶段一。

use std::fmt;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::models::{Record, SubmissionOutcome};
use crate::services::{FailureWriter, FormFiller, TaskCreator};
use crate::workflow::record_ctx::RecordCtx;

/// 处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// 表单提交阶段
    FormSubmit,
    /// 任务创建阶段
    TaskCreate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::FormSubmit => write!(f, "表单提交"),
            Stage::TaskCreate => write!(f, "任务创建"),
        }
    }
}

/// 重试策略
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 首次失败后的最大重试次数（总尝试次数 = max_retries + 1）
    pub max_retries: u32,
    /// 相邻两次尝试之间的等待时间
    pub retry_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay: Duration::from_secs(config.retry_delay_secs),
        }
    }
}

/// 记录处理流程
///
/// - 编排单条记录的完整处理流程
/// - 决定何时重试、何时放弃
/// - 不持有任何资源（浏览器、HTTP 客户端）
/// - 只依赖业务能力（services）
pub struct SubmissionFlow<'a, F: FormFiller, T: TaskCreator> {
    form_filler: &'a F,
    task_creator: &'a T,
    retry: RetryPolicy,
    failure_writer: Option<FailureWriter>,
}

impl<'a, F: FormFiller, T: TaskCreator> SubmissionFlow<'a, F, T> {
    /// 创建新的记录处理流程
    pub fn new(form_filler: &'a F, task_creator: &'a T, retry: RetryPolicy) -> Self {
        Self {
            form_filler,
            task_creator,
            retry,
            failure_writer: None,
        }
    }

    /// 附加失败记录写入服务
    pub fn with_failure_writer(mut self, writer: FailureWriter) -> Self {
        self.failure_writer = Some(writer);
        self
    }

    /// 处理一条记录
    ///
    /// 瞬时错误在内部消化为结果字段，不会向外传播；
    /// 返回 Err 只发生在致命错误（凭证无效、配置错误）时，
    /// 调用方应立即中止整批处理。
    pub async fn process(&self, record: &Record, ctx: &RecordCtx) -> AppResult<SubmissionOutcome> {
        info!("[记录 {}] 开始处理: {}", ctx.index, ctx.identifier);

        // ========== 阶段 1: 表单提交 ==========
        let mut form_attempts = 0u32;
        loop {
            form_attempts += 1;
            info!(
                "[记录 {}] 📤 表单提交 (第 {}/{} 次尝试)...",
                ctx.index,
                form_attempts,
                self.retry.max_retries + 1
            );

            match self.form_filler.submit(record).await {
                Ok(()) => {
                    info!("[记录 {}] ✓ 表单提交成功", ctx.index);
                    break;
                }
                Err(e) if e.is_fatal() => {
                    error!("[记录 {}] ❌ 表单提交遇到致命错误: {}", ctx.index, e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("[记录 {}] ⚠️ 表单提交失败: {}", ctx.index, e);
                    if form_attempts > self.retry.max_retries {
                        error!(
                            "[记录 {}] ❌ 表单提交重试用尽 (共 {} 次尝试)，放弃该记录",
                            ctx.index, form_attempts
                        );
                        self.report_failure(ctx, Stage::FormSubmit, &e.to_string())
                            .await;
                        return Ok(SubmissionOutcome::form_failed(record.clone(), form_attempts));
                    }
                    sleep(self.retry.retry_delay).await;
                }
            }
        }

        // ========== 阶段 2: 任务创建 ==========
        let mut task_attempts = 0u32;
        loop {
            task_attempts += 1;
            info!(
                "[记录 {}] 📋 任务创建 (第 {}/{} 次尝试)...",
                ctx.index,
                task_attempts,
                self.retry.max_retries + 1
            );

            match self.task_creator.create(record).await {
                Ok(task_id) => {
                    info!("[记录 {}] ✓ 任务创建成功: {}", ctx.index, task_id);
                    return Ok(SubmissionOutcome::success(
                        record.clone(),
                        task_id,
                        form_attempts + task_attempts,
                    ));
                }
                Err(e) if e.is_fatal() => {
                    error!("[记录 {}] ❌ 任务创建遇到致命错误: {}", ctx.index, e);
                    return Err(e);
                }
                Err(e) => {
                    warn!("[记录 {}] ⚠️ 任务创建失败: {}", ctx.index, e);
                    if task_attempts > self.retry.max_retries {
                        error!(
                            "[记录 {}] ❌ 任务创建重试用尽 (共 {} 次尝试)，放弃该记录",
                            ctx.index, task_attempts
                        );
                        self.report_failure(ctx, Stage::TaskCreate, &e.to_string())
                            .await;
                        return Ok(SubmissionOutcome::task_failed(
                            record.clone(),
                            form_attempts + task_attempts,
                        ));
                    }
                    sleep(self.retry.retry_delay).await;
                }
            }
        }
    }

    /// 把终态失败写入失败文件
    async fn report_failure(&self, ctx: &RecordCtx, stage: Stage, reason: &str) {
        if let Some(writer) = &self.failure_writer {
            if let Err(e) = writer
                .write(&ctx.identifier, &stage.to_string(), reason)
                .await
            {
                warn!("[记录 {}] ⚠️ 写入失败文件出错: {}", ctx.index, e);
            }
        }
    }
}
