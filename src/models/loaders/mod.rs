//! 记录加载器
//!
//! 从 CSV / JSON 数据文件加载待处理的记录列表。

pub mod csv_loader;
pub mod json_loader;

use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::models::record::Record;

pub use csv_loader::load_records_from_csv;
pub use json_loader::load_records_from_json;

/// 按文件扩展名选择加载器
pub async fn load_records_from_file(path: impl AsRef<Path>) -> AppResult<Vec<Record>> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("csv") => load_records_from_csv(path).await,
        Some("json") => load_records_from_json(path).await,
        other => Err(AppError::Other(format!(
            "不支持的数据文件类型: {:?} ({})",
            other,
            path.display()
        ))),
    }
}
