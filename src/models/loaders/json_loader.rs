use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::error::{AppError, AppResult, FileError};
use crate::models::record::Record;

/// 从 JSON 文件加载记录
///
/// 顶层可以是单个对象（一条记录）或对象数组。
/// 非字符串的字段值序列化为紧凑 JSON 文本保存。
pub async fn load_records_from_json(path: impl AsRef<Path>) -> AppResult<Vec<Record>> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::File(FileError::ReadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| {
        AppError::File(FileError::JsonParseFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })
    })?;

    let objects = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => {
            return Err(AppError::Other(format!(
                "JSON 顶层必须是对象或数组: {}",
                path.display()
            )))
        }
    };

    let mut records = Vec::new();
    for object in objects {
        if let Value::Object(map) = object {
            let mut record = Record::new();
            for (name, value) in map {
                record.push(name, flatten_value(&value));
            }
            records.push(record);
        }
    }

    info!("📄 从 {} 加载了 {} 条记录", path.display(), records.len());
    Ok(records)
}

/// 把 JSON 值拍平成字符串
fn flatten_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
