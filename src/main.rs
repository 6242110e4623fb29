use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, warn};

use fastfield_asana_submit::models::load_records_from_file;
use fastfield_asana_submit::orchestrator::{run_daemon, App};
use fastfield_asana_submit::utils::logging;
use fastfield_asana_submit::Config;

#[derive(Parser)]
#[command(name = "fastfield-asana-submit")]
#[command(about = "FastField 表单自动提交与 Asana 任务创建工具")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 只处理数据文件中的第一条记录
    Single {
        /// 数据文件路径（.csv 或 .json）
        #[arg(long)]
        data: String,
    },
    /// 处理数据文件中的全部记录
    Batch {
        /// 数据文件路径（.csv 或 .json）
        #[arg(long)]
        data: String,
    },
    /// 守护模式：按间隔轮询数据文件
    Daemon {
        /// 数据文件路径（.csv 或 .json）
        #[arg(long)]
        data: String,
        /// 轮询间隔（秒），默认取 SCHEDULE_INTERVAL_SECS
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env()?;

    // 初始化应用（配置、浏览器、登录、令牌校验都在这里失败即退出）
    let app = App::initialize(config).await?;

    match cli.command {
        Command::Single { data } => {
            let records = load_records_from_file(&data).await?;
            let Some(record) = records.into_iter().next() else {
                warn!("📭 数据文件中没有记录");
                return Ok(());
            };
            let result = app.run_single(record).await;
            exit_on_abort(&result);
        }
        Command::Batch { data } => {
            let result = app.run_batch_from_file(&data).await?;
            exit_on_abort(&result);
        }
        Command::Daemon { data, interval } => {
            let interval_secs = interval.unwrap_or(app.config().schedule_interval_secs);
            run_daemon(&app, &data, interval_secs).await?;
        }
    }

    Ok(())
}

/// 致命错误中止的运行以非零状态退出；
/// 正常完成的运行无论单条结果如何都返回 0。
fn exit_on_abort(result: &fastfield_asana_submit::BatchResult) {
    if let Some(abort) = &result.aborted {
        error!(
            "运行中止: 已处理 {}/{} 条记录 ({})",
            abort.processed, abort.total, abort.reason
        );
        std::process::exit(1);
    }
}
