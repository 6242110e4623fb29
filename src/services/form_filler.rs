//! 表单填写服务 - 业务能力层
//!
//! 只负责"把一条记录填进远端表单并提交"的能力。
//! 登录在启动时执行一次；每次提交尝试都重新打开表单页，
//! 因此重试总是从干净的 DOM 开始，顺带规避元素失效问题。

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, BrowserError};
use crate::infrastructure::FormDriver;
use crate::models::{FormSpec, Record};

/// 表单填写能力
///
/// 抽象成 trait 以便测试中用确定性的假实现替代真实浏览器。
#[async_trait]
pub trait FormFiller: Send + Sync {
    /// 把一条记录填进表单并提交
    async fn submit(&self, record: &Record) -> AppResult<()>;
}

/// FastField 表单填写服务
///
/// 职责：
/// - 登录 FastField 门户
/// - 按选择器映射填写单条记录并提交
/// - 不出现 Vec<Record>
/// - 不关心重试和批次
pub struct FastFieldForm {
    driver: FormDriver,
    spec: FormSpec,
    form_url: String,
    username: String,
    password: String,
}

impl FastFieldForm {
    /// 创建新的表单填写服务
    pub fn new(driver: FormDriver, spec: FormSpec, config: &Config) -> Self {
        Self {
            driver,
            spec,
            form_url: config.fastfield_url.clone(),
            username: config.fastfield_username.clone(),
            password: config.fastfield_password.clone(),
        }
    }

    /// 登录 FastField 门户
    ///
    /// 登录后的标志元素在超时内没有出现即视为凭证被拒绝，
    /// 这是致命错误，调用方应立即中止。
    pub async fn login(&self) -> AppResult<()> {
        info!("🔐 正在登录 FastField: {}", self.spec.login_url);

        self.driver.goto(&self.spec.login_url).await?;
        self.driver
            .wait_for(&self.spec.username_selector, self.spec.wait_timeout_secs)
            .await?;

        self.driver
            .fill(&self.spec.username_selector, &self.username)
            .await?;
        self.driver
            .fill(&self.spec.password_selector, &self.password)
            .await?;
        self.driver.click(&self.spec.login_button_selector).await?;

        match self
            .driver
            .wait_for(&self.spec.post_login_selector, self.spec.wait_timeout_secs)
            .await
        {
            Ok(()) => {
                info!("✓ FastField 登录成功");
                Ok(())
            }
            Err(_) => {
                let url = self.driver.current_url().await.unwrap_or_default();
                warn!("❌ 登录后未见到门户页面，当前停留在: {}", url);
                Err(AppError::Browser(BrowserError::LoginRejected { url }))
            }
        }
    }

    /// 获取表单驱动器的引用
    pub fn driver(&self) -> &FormDriver {
        &self.driver
    }
}

#[async_trait]
impl FormFiller for FastFieldForm {
    async fn submit(&self, record: &Record) -> AppResult<()> {
        debug!("打开表单页面: {}", self.form_url);
        self.driver.goto(&self.form_url).await?;
        self.driver
            .wait_for(&self.spec.form_ready_selector, self.spec.wait_timeout_secs)
            .await?;

        // 按记录的字段顺序填写；没有选择器映射的字段（如 submission_id）
        // 只服务于模板和去重，跳过即可
        for (field, value) in record.iter() {
            match self.spec.locator(field) {
                Some(selector) => self.driver.fill(selector, value).await?,
                None => debug!("字段 {} 没有选择器映射，跳过填写", field),
            }
        }

        self.driver.click(&self.spec.submit_selector).await?;

        if let Some(confirm) = &self.spec.confirm_selector {
            self.driver
                .wait_for(confirm, self.spec.wait_timeout_secs)
                .await?;
        }

        Ok(())
    }
}
