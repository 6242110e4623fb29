//! Asana API 客户端
//!
//! 封装所有与 Asana REST API 相关的调用逻辑。
//! 基础地址可配置，测试时指向本地 mock 服务。

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};

/// Asana API 客户端
pub struct AsanaClient {
    http: reqwest::Client,
    base_url: String,
    pat: String,
    workspace_id: String,
    project_id: String,
}

/// 当前令牌对应的用户信息
#[derive(Debug, Clone, Deserialize)]
pub struct AsanaUser {
    pub gid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// 待创建的任务内容
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub notes: String,
    /// 截止日期（YYYY-MM-DD）
    pub due_on: String,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct CreatedTask {
    gid: String,
}

impl AsanaClient {
    /// 创建新的 Asana 客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::api_request_failed("<client>", e))?;

        Ok(Self {
            http,
            base_url: config.asana_base_url.trim_end_matches('/').to_string(),
            pat: config.asana_pat.clone(),
            workspace_id: config.asana_workspace_id.clone(),
            project_id: config.asana_project_id.clone(),
        })
    }

    /// 校验访问令牌
    ///
    /// 在处理任何记录之前调用一次，令牌无效时立即失败。
    pub async fn verify_token(&self) -> AppResult<AsanaUser> {
        let endpoint = "/users/me";
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.pat)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AppError::Api(ApiError::Unauthorized {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }));
        }
        if !status.is_success() {
            return Err(self.bad_response(endpoint, status, response).await);
        }

        let envelope: DataEnvelope<AsanaUser> = response
            .json()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        debug!(
            "令牌校验通过: {} <{}>",
            envelope.data.name, envelope.data.email
        );
        Ok(envelope.data)
    }

    /// 创建任务，返回新任务的 gid
    pub async fn create_task(&self, task: &NewTask) -> AppResult<String> {
        let endpoint = "/tasks";
        let url = format!("{}{}", self.base_url, endpoint);

        let body = json!({
            "data": {
                "name": task.name,
                "notes": task.notes,
                "due_on": task.due_on,
                "workspace": self.workspace_id,
                "projects": [self.project_id],
            }
        });

        debug!("创建任务 Payload: {}", body);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.pat)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AppError::Api(ApiError::Unauthorized {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            }));
        }
        if !status.is_success() {
            return Err(self.bad_response(endpoint, status, response).await);
        }

        let envelope: DataEnvelope<CreatedTask> = response
            .json()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        debug!("任务创建成功: {}", envelope.data.gid);
        Ok(envelope.data.gid)
    }

    /// 把非 2xx 响应转换为错误（尽量带上响应正文）
    async fn bad_response(
        &self,
        endpoint: &str,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> AppError {
        let message = response.text().await.ok().map(|body| {
            if body.chars().count() > 200 {
                body.chars().take(200).collect()
            } else {
                body
            }
        });
        AppError::Api(ApiError::BadResponse {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}
