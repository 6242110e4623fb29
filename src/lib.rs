//! # FastField Asana Submit
//!
//! 一个把 FastField 表单自动提交并同步创建 Asana 任务的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `FormDriver` - 唯一的 page owner，提供导航 / 填写 / 点击能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单条 Record
//! - `FastFieldForm` - 登录 + 按选择器填写并提交表单
//! - `AsanaTaskCreator` - 按模板渲染并创建 Asana 任务
//! - `ProcessedStore` - 已处理记录存档（去重）
//! - `FailureWriter` - 写 failed.txt 能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一条记录"的完整处理流程
//! - `RecordCtx` - 上下文封装（序号 + 标识符）
//! - `SubmissionFlow` - 流程编排（表单提交 → 任务创建，阶段独立重试）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_runner` - 批量记录处理器，管理资源和顺序
//! - `orchestrator/scheduler` - 定时运行器，轮询数据源
//!
//! ## 模块结构

pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{connect_to_browser_and_page, launch_headless_browser};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::FormDriver;
pub use models::{BatchResult, FormSpec, Record, SubmissionOutcome, TaskTemplate};
pub use orchestrator::{run_daemon, App, BatchRunner};
pub use services::{FormFiller, TaskCreator};
pub use workflow::{RecordCtx, RetryPolicy, SubmissionFlow};
