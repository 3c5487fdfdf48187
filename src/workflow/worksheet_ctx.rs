//! 工作表生成上下文
//!
//! 封装"正在生成第几张工作表、选了哪些句型"这一信息，只用于日志

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct WorksheetCtx {
    /// 请求序号（从1开始）
    pub request_index: usize,

    /// 请求的句型编号，顺序与请求一致
    pub patterns: Vec<u32>,
}

impl WorksheetCtx {
    pub fn new(request_index: usize, patterns: Vec<u32>) -> Self {
        Self {
            request_index,
            patterns,
        }
    }
}

impl Display for WorksheetCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let patterns = self
            .patterns
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "[工作表 #{} 句型 {}]", self.request_index, patterns)
    }
}
