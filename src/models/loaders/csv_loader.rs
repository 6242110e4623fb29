use std::path::Path;

use tracing::info;

use crate::error::{AppError, AppResult, FileError};
use crate::models::record::Record;

/// 从 CSV 文件加载记录
///
/// 第一行作为字段名，之后每行一条记录；字段顺序即列顺序。
pub async fn load_records_from_csv(path: impl AsRef<Path>) -> AppResult<Vec<Record>> {
    let path = path.as_ref();
    let content = tokio::fs::read(path).await.map_err(|e| {
        AppError::File(FileError::ReadFailed {
            path: path.display().to_string(),
            source: Box::new(e),
        })
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_slice());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| csv_error(path, e))?;
        let mut record = Record::new();
        for (name, value) in headers.iter().zip(row.iter()) {
            record.push(name.clone(), value);
        }
        records.push(record);
    }

    info!("📄 从 {} 加载了 {} 条记录", path.display(), records.len());
    Ok(records)
}

fn csv_error(path: &Path, err: csv::Error) -> AppError {
    AppError::File(FileError::CsvParseFailed {
        path: path.display().to_string(),
        source: Box::new(err),
    })
}
