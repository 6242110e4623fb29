//! 记录模型
//!
//! 一条记录对应一次表单提交的数据：字段名到字段值的有序映射。

/// 单条提交记录
///
/// 字段顺序与数据源一致（CSV 的列序、JSON 的键序），
/// 创建后不再修改。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// 创建空记录
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// 从字段对列表创建记录
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self { fields: pairs }
    }

    /// 追加一个字段
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// 按字段名查找字段值
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// 按顺序遍历所有字段
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// 字段数量
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 是否为空记录
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 记录标识符（用于日志显示和去重）
    ///
    /// 依次尝试 submission_id / email / name，都没有时取第一个字段的值。
    pub fn identifier(&self) -> String {
        for key in ["submission_id", "email", "name"] {
            if let Some(value) = self.get(key) {
                if !value.is_empty() {
                    return value.to_string();
                }
            }
        }
        self.fields
            .first()
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| "<空记录>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::from_pairs(vec![
            ("name".to_string(), "Alice".to_string()),
            ("email".to_string(), "a@x.com".to_string()),
        ])
    }

    #[test]
    fn test_get_and_order() {
        let record = sample();
        assert_eq!(record.get("name"), Some("Alice"));
        assert_eq!(record.get("missing"), None);

        let names: Vec<&str> = record.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "email"]);
    }

    #[test]
    fn test_identifier_prefers_submission_id() {
        let mut record = sample();
        record.push("submission_id", "sub-42");
        assert_eq!(record.identifier(), "sub-42");
    }

    #[test]
    fn test_identifier_falls_back_to_email() {
        let record = sample();
        assert_eq!(record.identifier(), "a@x.com");
    }

    #[test]
    fn test_identifier_falls_back_to_first_field() {
        let record = Record::from_pairs(vec![(
            "address".to_string(),
            "123 Main Street".to_string(),
        )]);
        assert_eq!(record.identifier(), "123 Main Street");
    }
}
