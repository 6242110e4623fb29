//! 表单描述
//!
//! 从 TOML 文件加载远端表单的结构信息：登录方式、字段选择器映射、
//! 提交按钮，以及对应的任务模板。

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError, FileError};
use crate::models::template::TaskTemplate;

/// 表单描述
#[derive(Debug, Clone, Deserialize)]
pub struct FormSpec {
    /// 登录页面 URL
    #[serde(default = "default_login_url")]
    pub login_url: String,
    /// 账号输入框选择器
    #[serde(default = "default_username_selector")]
    pub username_selector: String,
    /// 密码输入框选择器
    #[serde(default = "default_password_selector")]
    pub password_selector: String,
    /// 登录按钮选择器
    #[serde(default = "default_login_button_selector")]
    pub login_button_selector: String,
    /// 登录成功后出现的元素选择器
    #[serde(default = "default_post_login_selector")]
    pub post_login_selector: String,
    /// 表单页面就绪标志的选择器
    #[serde(default = "default_form_ready_selector")]
    pub form_ready_selector: String,
    /// 提交按钮选择器
    #[serde(default = "default_submit_selector")]
    pub submit_selector: String,
    /// 提交成功确认元素的选择器（可选）
    #[serde(default)]
    pub confirm_selector: Option<String>,
    /// 等待元素出现的超时时间（秒）
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
    /// 字段名到 CSS 选择器的映射
    #[serde(default)]
    pub locators: BTreeMap<String, String>,
    /// 任务模板
    #[serde(default)]
    pub template: TaskTemplate,
}

fn default_login_url() -> String {
    "https://portal.fastfieldforms.com/portal/Login?mode=login-identifier".to_string()
}

fn default_username_selector() -> String {
    "input[name='email']".to_string()
}

fn default_password_selector() -> String {
    "input[name='password']".to_string()
}

fn default_login_button_selector() -> String {
    "button[type='submit']".to_string()
}

fn default_post_login_selector() -> String {
    ".portal-content".to_string()
}

fn default_form_ready_selector() -> String {
    "form".to_string()
}

fn default_submit_selector() -> String {
    "button[type='submit']".to_string()
}

fn default_wait_timeout_secs() -> u64 {
    10
}

impl Default for FormSpec {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            username_selector: default_username_selector(),
            password_selector: default_password_selector(),
            login_button_selector: default_login_button_selector(),
            post_login_selector: default_post_login_selector(),
            form_ready_selector: default_form_ready_selector(),
            submit_selector: default_submit_selector(),
            confirm_selector: None,
            wait_timeout_secs: default_wait_timeout_secs(),
            locators: BTreeMap::new(),
            template: TaskTemplate::default(),
        }
    }
}

impl FormSpec {
    /// 从 TOML 文件加载表单描述
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AppError::File(FileError::NotFound {
                path: path.display().to_string(),
            }));
        }

        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::File(FileError::ReadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;

        let spec: FormSpec = toml::from_str(&content).map_err(|e| {
            AppError::File(FileError::TomlParseFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;

        Ok(spec)
    }

    /// 查找字段对应的选择器
    pub fn locator(&self, field: &str) -> Option<&str> {
        self.locators.get(field).map(|s| s.as_str())
    }

    /// 启动时校验：模板引用的每个字段都必须有选择器映射
    ///
    /// 在处理任何记录之前暴露配置问题。
    pub fn validate(&self) -> AppResult<()> {
        for field in self.template.placeholders() {
            if !self.locators.contains_key(&field) {
                return Err(AppError::Config(ConfigError::MissingLocator { field }));
            }
        }
        Ok(())
    }
}
