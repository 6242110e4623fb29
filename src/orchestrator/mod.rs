//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_runner` - 批量记录处理器
//! - 管理应用生命周期（初始化、运行、清理）
//! - 持有浏览器会话和 API 客户端（全程唯一）
//! - 按顺序处理记录列表，记录之间可插入等待
//! - 致命错误时中止整批并报告
//! - 输出逐条报表和全局统计
//!
//! ### `scheduler` - 定时运行器
//! - 按固定间隔重新读取数据源并运行批处理
//! - 任何一轮的失败都不会影响后续轮次
//!
//! ## 层次关系
//!
//! ```text
//! scheduler (定时触发)
//!     ↓
//! batch_runner (处理 Vec<Record>)
//!     ↓
//! workflow::SubmissionFlow (处理单条 Record)
//!     ↓
//! services (能力层：form_filler / task_creator / processed_store)
//!     ↓
//! infrastructure (基础设施：FormDriver)
//! ```
//!
//! ## 设计原则
//!
//! 1. **严格串行**：一个浏览器会话、一个 API 客户端，逐条处理
//! 2. **资源隔离**：只有编排层持有 Browser
//! 3. **失败隔离**：单条记录失败不影响其余记录
//! 4. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod batch_runner;
pub mod scheduler;

pub use batch_runner::{App, BatchRunner};
pub use scheduler::run_daemon;
