//! 已处理记录存档 - 业务能力层
//!
//! 记录已经成功创建过任务的记录标识符，避免重复运行时
//! 重复创建 Asana 任务。存档是一个 JSON 字符串数组文件。

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{AppError, AppResult, FileError};

/// 已处理记录存档
pub struct ProcessedStore {
    path: PathBuf,
    ids: Vec<String>,
}

impl ProcessedStore {
    /// 从存档文件加载
    ///
    /// 文件不存在视为空存档（首次运行）。
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            debug!("存档文件 {} 不存在，视为空存档", path.display());
            return Ok(Self {
                path,
                ids: Vec::new(),
            });
        }

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            AppError::File(FileError::ReadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;

        let ids: Vec<String> = serde_json::from_str(&content).map_err(|e| {
            AppError::File(FileError::JsonParseFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;

        debug!("已加载 {} 个已处理记录标识", ids.len());
        Ok(Self { path, ids })
    }

    /// 标识符是否已处理过
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// 标记一个标识符为已处理
    pub fn mark(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.contains(&id) {
            self.ids.push(id);
        }
    }

    /// 已处理记录数量
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// 写回存档文件
    pub async fn save(&self) -> AppResult<()> {
        let content = serde_json::to_string_pretty(&self.ids)?;
        tokio::fs::write(&self.path, content).await.map_err(|e| {
            AppError::File(FileError::WriteFailed {
                path: self.path.display().to_string(),
                source: Box::new(e),
            })
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.json");

        let store = ProcessedStore::load(&path).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_mark_save_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.json");

        let mut store = ProcessedStore::load(&path).await.unwrap();
        store.mark("sub-001");
        store.mark("sub-002");
        store.mark("sub-001");
        store.save().await.unwrap();

        let reloaded = ProcessedStore::load(&path).await.unwrap();
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("sub-001"));
        assert!(!reloaded.contains("sub-003"));
    }
}
