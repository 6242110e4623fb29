//! 表单驱动器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"导航 / 定位 / 填写 / 点击"的能力

use std::time::Duration;

use chromiumoxide::Page;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{AppError, AppResult, BrowserError};

/// 表单驱动器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露按 CSS 选择器操作页面的能力
/// - 不认识 Record / Outcome
/// - 不处理业务流程
pub struct FormDriver {
    page: Page,
}

impl FormDriver {
    /// 创建新的表单驱动器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 导航到指定 URL
    pub async fn goto(&self, url: &str) -> AppResult<()> {
        debug!("导航到: {}", url);
        self.page.goto(url).await.map_err(|e| {
            AppError::Browser(BrowserError::NavigationFailed {
                url: url.to_string(),
                source: Box::new(e),
            })
        })?;
        Ok(())
    }

    /// 获取当前页面 URL
    pub async fn current_url(&self) -> AppResult<String> {
        let url = self.page.url().await?;
        Ok(url.unwrap_or_default())
    }

    /// 向匹配选择器的元素填入文本
    ///
    /// 先点击获取焦点，再逐键输入，与人工填写的事件序列一致。
    pub async fn fill(&self, selector: &str, value: &str) -> AppResult<()> {
        debug!("填写元素 {} (长度: {})", selector, value.len());
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| AppError::element_not_found(selector, e))?;
        element.click().await?;
        element.type_str(value).await?;
        Ok(())
    }

    /// 点击匹配选择器的元素
    pub async fn click(&self, selector: &str) -> AppResult<()> {
        debug!("点击元素 {}", selector);
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| AppError::element_not_found(selector, e))?;
        element.click().await?;
        Ok(())
    }

    /// 等待匹配选择器的元素出现
    ///
    /// 每 100ms 轮询一次，超时后返回 WaitTimeout 错误。
    pub async fn wait_for(&self, selector: &str, timeout_secs: u64) -> AppResult<()> {
        let timeout = Duration::from_secs(timeout_secs);
        let interval = Duration::from_millis(100);
        let start = std::time::Instant::now();

        loop {
            match self.page.find_element(selector).await {
                Ok(_) => return Ok(()),
                Err(_) if start.elapsed() < timeout => {
                    tokio::time::sleep(interval).await;
                }
                Err(_) => {
                    return Err(AppError::Browser(BrowserError::WaitTimeout {
                        selector: selector.to_string(),
                        waited_secs: timeout_secs,
                    }));
                }
            }
        }
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }
}
