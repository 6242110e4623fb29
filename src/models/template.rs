//! 任务模板
//!
//! 把一条记录渲染成 Asana 任务的名称和备注。
//! 模板中的 `{字段名}` 占位符取记录里的同名字段；
//! 记录缺少该字段时替换为空字符串，而不是报错。

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::models::record::Record;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("占位符正则无效"))
}

/// 任务模板
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaskTemplate {
    /// 任务名称模板
    #[serde(default = "default_name")]
    pub name: String,
    /// 任务备注模板
    #[serde(default)]
    pub notes: String,
    /// 截止日期 = 今天 + due_in_days 天
    #[serde(default = "default_due_in_days")]
    pub due_in_days: u64,
}

fn default_name() -> String {
    "{name}".to_string()
}

fn default_due_in_days() -> u64 {
    5
}

impl Default for TaskTemplate {
    fn default() -> Self {
        Self {
            name: default_name(),
            notes: String::new(),
            due_in_days: default_due_in_days(),
        }
    }
}

/// 渲染完成的任务内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTask {
    pub name: String,
    pub notes: String,
    /// 截止日期（YYYY-MM-DD）
    pub due_on: String,
}

impl TaskTemplate {
    /// 对一条记录渲染模板
    pub fn render(&self, record: &Record) -> RenderedTask {
        RenderedTask {
            name: interpolate(&self.name, record),
            notes: interpolate(&self.notes, record),
            due_on: self.due_on(),
        }
    }

    /// 模板引用的全部字段名
    pub fn placeholders(&self) -> BTreeSet<String> {
        let mut fields = BTreeSet::new();
        for text in [&self.name, &self.notes] {
            for caps in placeholder_re().captures_iter(text) {
                fields.insert(caps[1].to_string());
            }
        }
        fields
    }

    /// 计算截止日期
    fn due_on(&self) -> String {
        let due = chrono::Local::now().date_naive() + chrono::Days::new(self.due_in_days);
        due.format("%Y-%m-%d").to_string()
    }
}

/// 替换文本中的所有占位符
fn interpolate(template: &str, record: &Record) -> String {
    placeholder_re()
        .replace_all(template, |caps: &regex::Captures| {
            record.get(&caps[1]).unwrap_or("").to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_all_fields() {
        let template = TaskTemplate {
            name: "Task: {name}".to_string(),
            notes: "Email: {email}".to_string(),
            due_in_days: 5,
        };
        let record = Record::from_pairs(vec![
            ("name".to_string(), "Alice".to_string()),
            ("email".to_string(), "a@x.com".to_string()),
        ]);

        let rendered = template.render(&record);
        assert_eq!(rendered.name, "Task: Alice");
        assert_eq!(rendered.notes, "Email: a@x.com");
    }

    #[test]
    fn test_missing_field_renders_empty() {
        let template = TaskTemplate {
            name: "Task: {name}".to_string(),
            notes: "Email: {email}".to_string(),
            due_in_days: 5,
        };
        let record = Record::from_pairs(vec![("name".to_string(), "Bob".to_string())]);

        let rendered = template.render(&record);
        assert_eq!(rendered.name, "Task: Bob");
        assert_eq!(rendered.notes, "Email: ");
    }

    #[test]
    fn test_placeholders() {
        let template = TaskTemplate {
            name: "{address}".to_string(),
            notes: "工单号: {job_number}, 地址: {address}".to_string(),
            due_in_days: 5,
        };
        let fields: Vec<String> = template.placeholders().into_iter().collect();
        assert_eq!(fields, vec!["address".to_string(), "job_number".to_string()]);
    }

    #[test]
    fn test_due_on_format() {
        let template = TaskTemplate::default();
        let rendered = template.render(&Record::new());
        assert_eq!(rendered.due_on.len(), 10);
        assert_eq!(&rendered.due_on[4..5], "-");
    }
}
