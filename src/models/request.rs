use serde::{Deserialize, Serialize};

/// 一次工作表生成请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetRequest {
    /// 按工作表顺序排列的句型编号
    pub patterns: Vec<u32>,
    /// 自定义输出文件名（不含目录）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl WorksheetRequest {
    pub fn new(patterns: Vec<u32>) -> Self {
        Self {
            patterns,
            file_name: None,
        }
    }
}

/// 批量请求文件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestFile {
    #[serde(default)]
    pub worksheet: Vec<WorksheetRequest>,
}
