//! 批量记录处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量记录的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、加载表单描述、获取浏览器会话、登录、校验令牌
//! 2. **顺序处理**：逐条把记录交给 SubmissionFlow，记录间可插入等待
//! 3. **失败隔离**：单条记录失败不中断批次；致命错误立即中止并报告
//! 4. **去重**：跳过存档中已处理的记录，成功后写回存档
//! 5. **资源管理**：持有 Browser，确保生命周期正确
//! 6. **全局统计**：输出逐条报表和汇总

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::Browser;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::browser;
use crate::clients::AsanaClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::FormDriver;
use crate::models::{
    load_records_from_file, AbortInfo, BatchResult, FormSpec, Record, SubmissionOutcome,
};
use crate::services::{
    AsanaTaskCreator, FailureWriter, FastFieldForm, FormFiller, ProcessedStore, TaskCreator,
};
use crate::utils::logging::truncate_text;
use crate::workflow::{RecordCtx, RetryPolicy, SubmissionFlow};

/// 批量记录处理器
///
/// 按输入顺序逐条处理，结果顺序与输入一致。
pub struct BatchRunner<'a, F: FormFiller, T: TaskCreator> {
    flow: SubmissionFlow<'a, F, T>,
    inter_record_delay: Duration,
}

impl<'a, F: FormFiller, T: TaskCreator> BatchRunner<'a, F, T> {
    /// 创建新的批量处理器
    pub fn new(flow: SubmissionFlow<'a, F, T>, inter_record_delay: Duration) -> Self {
        Self {
            flow,
            inter_record_delay,
        }
    }

    /// 按顺序处理一批记录
    ///
    /// 单条记录的失败不会中断批次；只有致命错误（凭证、配置）
    /// 会提前中止，此时结果里保留已处理记录的结果和中止信息。
    pub async fn run(&self, records: &[Record]) -> BatchResult {
        let total = records.len();
        if total == 0 {
            info!("📭 没有待处理的记录");
            return BatchResult::default();
        }

        log_batch_start(total);

        let mut result = BatchResult::default();
        for (i, record) in records.iter().enumerate() {
            let index = i + 1;
            let ctx = RecordCtx::new(index, total, record.identifier());

            match self.flow.process(record, &ctx).await {
                Ok(outcome) => {
                    result.outcomes.push(outcome);
                }
                Err(e) => {
                    error!("[记录 {}] ❌ 致命错误，中止整批处理: {}", index, e);
                    result
                        .outcomes
                        .push(SubmissionOutcome::aborted(record.clone(), e.to_string()));
                    result.aborted = Some(AbortInfo {
                        processed: result.outcomes.len(),
                        total,
                        reason: e.to_string(),
                    });
                    break;
                }
            }

            // 最后一条之后不再等待
            if !self.inter_record_delay.is_zero() && index < total {
                sleep(self.inter_record_delay).await;
            }
        }

        log_batch_complete(&result);
        result
    }
}

/// 应用主结构
///
/// 浏览器会话和 API 客户端在初始化时获取一次，整个运行期间复用，
/// 随 App 一起释放。
pub struct App {
    config: Config,
    _browser: Browser,
    form: FastFieldForm,
    tasks: AsanaTaskCreator,
}

impl App {
    /// 初始化应用
    ///
    /// 所有"启动即失败"的检查都发生在这里：配置文件、表单描述校验、
    /// 浏览器获取、FastField 登录、Asana 令牌校验。任何一步失败都
    /// 直接返回错误，不会处理任何记录。
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        crate::utils::logging::init_log_file(&config.output_log_file)?;

        log_startup(&config);

        // 加载并校验表单描述
        let spec = FormSpec::load(&config.form_config_file).await?;
        spec.validate()?;
        info!(
            "✓ 表单描述已加载: {} 个字段映射",
            spec.locators.len()
        );

        // 获取浏览器会话
        let (browser, page) = if config.headless_mode {
            browser::launch_headless_browser(&config.fastfield_url).await?
        } else {
            browser::connect_to_browser_and_page(
                config.browser_debug_port,
                Some(&config.fastfield_url),
                None,
            )
            .await?
        };

        let driver = FormDriver::new(page);
        let template = spec.template.clone();

        // 登录 FastField（凭证无效在这里暴露）
        let form = FastFieldForm::new(driver, spec, &config);
        form.login().await?;

        // 校验 Asana 令牌
        let client = AsanaClient::new(&config)?;
        let user = client.verify_token().await?;
        info!("✓ Asana 令牌有效: {} <{}>", user.name, user.email);

        let tasks = AsanaTaskCreator::new(client, template);

        Ok(Self {
            config,
            _browser: browser,
            form,
            tasks,
        })
    }

    /// 获取配置的引用
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 处理单条记录（不做去重）
    pub async fn run_single(&self, record: Record) -> BatchResult {
        self.runner().run(&[record]).await
    }

    /// 处理一批记录，跳过存档中已成功的记录
    pub async fn run_batch(&self, records: Vec<Record>) -> AppResult<BatchResult> {
        let mut store = ProcessedStore::load(&self.config.processed_file).await?;

        let total = records.len();
        let fresh: Vec<Record> = records
            .into_iter()
            .filter(|record| {
                let id = record.identifier();
                if store.contains(&id) {
                    info!("⏭️ 跳过已处理的记录: {}", id);
                    false
                } else {
                    true
                }
            })
            .collect();

        if fresh.len() < total {
            info!("📊 {} 条记录中有 {} 条是新记录", total, fresh.len());
        }

        let result = self.runner().run(&fresh).await;

        // 只有任务创建成功的记录才算处理完成
        let mut newly_marked = 0;
        for outcome in &result.outcomes {
            if outcome.is_success() {
                store.mark(outcome.record.identifier());
                newly_marked += 1;
            }
        }
        if newly_marked > 0 {
            store.save().await?;
            info!("💾 已存档 {} 条新完成的记录", newly_marked);
        }

        Ok(result)
    }

    /// 从数据文件加载记录并批量处理
    pub async fn run_batch_from_file(&self, path: &str) -> AppResult<BatchResult> {
        let records = load_records_from_file(path).await?;
        self.run_batch(records).await
    }

    /// 构造批量处理器（复用 App 持有的能力服务）
    fn runner(&self) -> BatchRunner<'_, FastFieldForm, AsanaTaskCreator> {
        let flow = SubmissionFlow::new(
            &self.form,
            &self.tasks,
            RetryPolicy::from_config(&self.config),
        )
        .with_failure_writer(FailureWriter::new());

        BatchRunner::new(
            flow,
            Duration::from_secs(self.config.inter_record_delay_secs),
        )
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - FastField 表单提交 + Asana 任务创建");
    info!("📊 最大重试次数: {}", config.max_retries);
    info!("⏱️ 重试间隔: {}秒", config.retry_delay_secs);
    info!("{}", "=".repeat(60));
}

fn log_batch_start(total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理本批记录，共 {} 条", total);
    info!("{}", "=".repeat(60));
}

fn log_batch_complete(result: &BatchResult) {
    info!("\n{}", "─".repeat(60));
    info!("📋 逐条结果:");
    for (i, outcome) in result.outcomes.iter().enumerate() {
        let task = outcome.task_id.as_deref().unwrap_or("-");
        info!(
            "  {}. {} | {} | 任务: {} | 尝试 {} 次",
            i + 1,
            truncate_text(&outcome.record.identifier(), 40),
            outcome.status_label(),
            task,
            outcome.attempt_count
        );
    }

    let summary = result.summary();
    info!("{}", "─".repeat(60));
    info!(
        "✅ 成功: {}/{} | ❌ 表单失败: {} | ⚠️ 任务失败: {}",
        summary.success, summary.total, summary.form_failed, summary.task_failed
    );

    if let Some(abort) = &result.aborted {
        warn!(
            "⚠️ 批次在第 {}/{} 条记录后中止: {}",
            abort.processed, abort.total, abort.reason
        );
    }
    info!("{}", "─".repeat(60));
}
