//! 上传表格的原始数据
//!
//! 只负责承载“表名 + 表头 + 行”，不做任何类型约束，
//! 由 `services::database_loader` 一次性转换为强类型记录。

use serde::{Deserialize, Serialize};

/// 单元格值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawCell {
    /// 空单元格或只含空白的文本
    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 按整数读取，允许 `3`、`3.0` 和 `"3"`
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawCell::Int(v) => Some(*v),
            RawCell::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            RawCell::Text(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|v| v.fract() == 0.0 && v.is_finite())
                        .map(|v| v as i64)
                })
            }
            _ => None,
        }
    }

    /// 按文本读取，数值会被格式化，空单元格返回空串
    pub fn as_text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Bool(v) => v.to_string(),
            RawCell::Int(v) => v.to_string(),
            RawCell::Float(v) => v.to_string(),
            RawCell::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<&str> for RawCell {
    fn from(value: &str) -> Self {
        RawCell::Text(value.to_string())
    }
}

impl From<String> for RawCell {
    fn from(value: String) -> Self {
        RawCell::Text(value)
    }
}

impl From<i64> for RawCell {
    fn from(value: i64) -> Self {
        RawCell::Int(value)
    }
}

/// 一张工作表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub name: String,
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, headers: &[&str]) -> Self {
        Self {
            name: name.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// 追加一行，便于在测试和宿主层构造数据
    pub fn with_row(mut self, row: Vec<RawCell>) -> Self {
        self.rows.push(row);
        self
    }
}

/// 整个上传文件
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWorkbook {
    #[serde(default)]
    pub tables: Vec<RawTable>,
}

impl RawWorkbook {
    /// 按名称查找工作表（忽略首尾空白）
    pub fn table(&self, name: &str) -> Option<&RawTable> {
        self.tables.iter().find(|t| t.name.trim() == name)
    }
}
