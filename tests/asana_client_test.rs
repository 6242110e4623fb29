//! Asana 客户端对 HTTP 状态码的分类行为
//!
//! 用本地 mock 服务替代真实 API。

use httpmock::prelude::*;
use serde_json::json;

use fastfield_asana_submit::clients::{AsanaClient, NewTask};
use fastfield_asana_submit::Config;

fn test_config(base_url: String) -> Config {
    Config {
        asana_base_url: base_url,
        asana_pat: "test-pat".to_string(),
        asana_workspace_id: "ws-1".to_string(),
        asana_project_id: "pj-1".to_string(),
        ..Default::default()
    }
}

fn sample_task() -> NewTask {
    NewTask {
        name: "123 Main Street".to_string(),
        notes: "Job Number: JB000123456".to_string(),
        due_on: "2026-08-12".to_string(),
    }
}

#[tokio::test]
async fn test_create_task_returns_gid() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/tasks")
            .header("authorization", "Bearer test-pat");
        then.status(201)
            .json_body(json!({"data": {"gid": "1200000001", "name": "123 Main Street"}}));
    });

    let client = AsanaClient::new(&test_config(server.base_url())).unwrap();
    let gid = client.create_task(&sample_task()).await.unwrap();

    assert_eq!(gid, "1200000001");
    mock.assert();
}

#[tokio::test]
async fn test_create_task_unauthorized_is_fatal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/tasks");
        then.status(401)
            .json_body(json!({"errors": [{"message": "Not Authorized"}]}));
    });

    let client = AsanaClient::new(&test_config(server.base_url())).unwrap();
    let err = client.create_task(&sample_task()).await.unwrap_err();

    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_create_task_server_error_is_retryable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/tasks");
        then.status(500).body("internal error");
    });

    let client = AsanaClient::new(&test_config(server.base_url())).unwrap();
    let err = client.create_task(&sample_task()).await.unwrap_err();

    assert!(err.is_retryable());
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_verify_token_returns_user() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/users/me")
            .header("authorization", "Bearer test-pat");
        then.status(200).json_body(json!({
            "data": {"gid": "42", "name": "测试用户", "email": "it@example.com"}
        }));
    });

    let client = AsanaClient::new(&test_config(server.base_url())).unwrap();
    let user = client.verify_token().await.unwrap();

    assert_eq!(user.gid, "42");
    assert_eq!(user.email, "it@example.com");
    mock.assert();
}

#[tokio::test]
async fn test_verify_token_rejects_bad_pat() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/users/me");
        then.status(401).body("");
    });

    let client = AsanaClient::new(&test_config(server.base_url())).unwrap();
    let err = client.verify_token().await.unwrap_err();

    assert!(err.is_fatal());
}
