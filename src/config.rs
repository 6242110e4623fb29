use crate::error::{AppError, AppResult, ConfigError};

/// 程序配置
///
/// 启动时从环境变量一次性读取，之后作为不可变配置传入各组件。
#[derive(Clone, Debug)]
pub struct Config {
    /// FastField 表单页面 URL
    pub fastfield_url: String,
    /// FastField 登录账号
    pub fastfield_username: String,
    /// FastField 登录密码
    pub fastfield_password: String,
    /// Asana 个人访问令牌
    pub asana_pat: String,
    /// Asana 工作区 ID
    pub asana_workspace_id: String,
    /// Asana 项目 ID
    pub asana_project_id: String,
    /// Asana API 基础地址
    pub asana_base_url: String,
    /// 是否以无头模式启动浏览器（false 时连接已运行的浏览器）
    pub headless_mode: bool,
    /// 浏览器调试端口（非无头模式下使用）
    pub browser_debug_port: u16,
    /// 每个阶段失败后的最大重试次数
    pub max_retries: u32,
    /// 重试间隔（秒）
    pub retry_delay_secs: u64,
    /// 相邻记录之间的等待时间（秒），用于缓解外部限流
    pub inter_record_delay_secs: u64,
    /// 定时模式的轮询间隔（秒）
    pub schedule_interval_secs: u64,
    /// 表单描述文件路径
    pub form_config_file: String,
    /// 已处理记录的存档文件
    pub processed_file: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fastfield_url: "https://portal.fastfieldforms.com/portal".to_string(),
            fastfield_username: String::new(),
            fastfield_password: String::new(),
            asana_pat: String::new(),
            asana_workspace_id: String::new(),
            asana_project_id: String::new(),
            asana_base_url: "https://app.asana.com/api/1.0".to_string(),
            headless_mode: true,
            browser_debug_port: 9222,
            max_retries: 2,
            retry_delay_secs: 3,
            inter_record_delay_secs: 1,
            schedule_interval_secs: 120,
            form_config_file: "form_config.toml".to_string(),
            processed_file: "processed_submissions.json".to_string(),
            output_log_file: "output.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 凭证类变量缺失会直接报错；其余变量缺失时使用默认值，
    /// 存在但无法解析时报错而不是悄悄回退。
    pub fn from_env() -> AppResult<Self> {
        let default = Self::default();
        Ok(Self {
            fastfield_url: std::env::var("FASTFIELD_URL").unwrap_or(default.fastfield_url),
            fastfield_username: required_var("FASTFIELD_USERNAME")?,
            fastfield_password: required_var("FASTFIELD_PASSWORD")?,
            asana_pat: required_var("ASANA_PAT")?,
            asana_workspace_id: required_var("ASANA_WORKSPACE_ID")?,
            asana_project_id: required_var("ASANA_PROJECT_ID")?,
            asana_base_url: std::env::var("ASANA_BASE_URL").unwrap_or(default.asana_base_url),
            headless_mode: parsed_var("HEADLESS_MODE", default.headless_mode)?,
            browser_debug_port: parsed_var("BROWSER_DEBUG_PORT", default.browser_debug_port)?,
            max_retries: parsed_var("MAX_RETRIES", default.max_retries)?,
            retry_delay_secs: parsed_var("RETRY_DELAY_SECS", default.retry_delay_secs)?,
            inter_record_delay_secs: parsed_var(
                "INTER_RECORD_DELAY_SECS",
                default.inter_record_delay_secs,
            )?,
            schedule_interval_secs: parsed_var(
                "SCHEDULE_INTERVAL_SECS",
                default.schedule_interval_secs,
            )?,
            form_config_file: std::env::var("FORM_CONFIG_FILE").unwrap_or(default.form_config_file),
            processed_file: std::env::var("PROCESSED_FILE").unwrap_or(default.processed_file),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: parsed_var("VERBOSE_LOGGING", default.verbose_logging)?,
        })
    }
}

/// 读取必需的环境变量
fn required_var(var_name: &str) -> AppResult<String> {
    match std::env::var(var_name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::env_var_not_found(var_name)),
    }
}

/// 读取可选的环境变量并解析为目标类型
fn parsed_var<T: std::str::FromStr>(var_name: &str, default: T) -> AppResult<T> {
    match std::env::var(var_name) {
        Ok(value) => value.parse::<T>().map_err(|_| {
            AppError::Config(ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: std::any::type_name::<T>().to_string(),
            })
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.headless_mode);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.schedule_interval_secs, 120);
        assert_eq!(config.asana_base_url, "https://app.asana.com/api/1.0");
    }
}
