//! 定时运行器 - 编排层
//!
//! 按固定间隔重新读取数据源并运行批处理。
//! 任何一轮的错误都在这里被捕获并记录，绝不让单轮失败
//! 终止定时循环。

use std::time::Duration;

use anyhow::Result;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::orchestrator::batch_runner::App;

/// 以守护模式运行
///
/// 每个周期：重新读取数据文件 → 跳过已处理记录 → 批量处理。
/// 第一轮立即执行，之后按间隔触发。
pub async fn run_daemon(app: &App, data_file: &str, interval_secs: u64) -> Result<()> {
    info!("{}", "=".repeat(60));
    info!("⏰ 定时模式启动，每 {} 秒轮询一次", interval_secs);
    info!("📁 数据源: {}", data_file);
    info!("{}", "=".repeat(60));

    let mut ticker = interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut run_number = 0u64;
    loop {
        ticker.tick().await;
        run_number += 1;
        info!("\n🔄 第 {} 轮定时运行开始", run_number);

        match app.run_batch_from_file(data_file).await {
            Ok(result) if result.is_aborted() => {
                warn!(
                    "⚠️ 第 {} 轮运行中止，等待下一轮重试剩余记录",
                    run_number
                );
            }
            Ok(result) => {
                let summary = result.summary();
                info!(
                    "✓ 第 {} 轮完成: 成功 {}/{}",
                    run_number, summary.success, summary.total
                );
            }
            Err(e) => {
                error!("❌ 第 {} 轮运行失败: {}，等待下一轮", run_number, e);
            }
        }
    }
}
