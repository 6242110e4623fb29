//! 任务创建服务 - 业务能力层
//!
//! 只负责"把一条记录变成一个 Asana 任务"的能力。

use async_trait::async_trait;
use tracing::debug;

use crate::clients::{AsanaClient, NewTask};
use crate::error::AppResult;
use crate::models::{Record, TaskTemplate};

/// 任务创建能力
///
/// 抽象成 trait 以便测试中用确定性的假实现替代真实 API。
#[async_trait]
pub trait TaskCreator: Send + Sync {
    /// 为一条记录创建远端任务，返回任务 ID
    async fn create(&self, record: &Record) -> AppResult<String>;
}

/// Asana 任务创建服务
///
/// 职责：
/// - 按模板渲染任务名称和备注
/// - 调用 Asana 客户端创建任务
/// - 只处理单条记录
pub struct AsanaTaskCreator {
    client: AsanaClient,
    template: TaskTemplate,
}

impl AsanaTaskCreator {
    /// 创建新的任务创建服务
    pub fn new(client: AsanaClient, template: TaskTemplate) -> Self {
        Self { client, template }
    }
}

#[async_trait]
impl TaskCreator for AsanaTaskCreator {
    async fn create(&self, record: &Record) -> AppResult<String> {
        let rendered = self.template.render(record);
        debug!(
            "渲染任务: name={}, 截止日期={}",
            rendered.name, rendered.due_on
        );

        let task = NewTask {
            name: rendered.name,
            notes: rendered.notes,
            due_on: rendered.due_on,
        };

        self.client.create_task(&task).await
    }
}
