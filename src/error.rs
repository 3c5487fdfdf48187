use thiserror::Error;

use crate::models::Section;

/// 应用程序错误类型
///
/// 核心流程（加载 → 选择 → 分配 → 排版）只返回这里的错误，
/// 文件读取和批量编排层使用 `anyhow` 包装。
#[derive(Debug, Error)]
pub enum AppError {
    /// 表结构错误（缺表、缺列、单元格无法解析）
    #[error("表结构错误: {0}")]
    Schema(#[from] SchemaError),
    /// 明细行引用了不存在的句型
    #[error("引用完整性错误: {0}")]
    Referential(#[from] ReferentialError),
    /// 某个 (句型, 部分) 题目数量不足
    #[error("题目数量不足: {0}")]
    InsufficientData(#[from] InsufficientDataError),
    /// 选择请求不合法
    #[error("句型选择错误: {0}")]
    Selection(#[from] SelectionError),
    /// Unscramble 题目缺少乱序单词
    #[error("乱序题格式错误: {0}")]
    MalformedScramble(#[from] MalformedScrambleError),
    /// 字体资源不可用或缺字
    #[error("字体资源错误: {0}")]
    FontResource(#[from] FontResourceError),
    /// PDF 序列化失败
    #[error("文档渲染失败: {0}")]
    Render(#[from] RenderError),
}

/// 表结构错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// 缺少必需的工作表
    #[error("缺少工作表 \"{table}\"")]
    MissingTable { table: String },
    /// 缺少必需的列
    #[error("工作表 \"{table}\" 缺少列: {}", .columns.join(", "))]
    MissingColumns { table: String, columns: Vec<String> },
    /// 单元格内容无法转换为目标类型
    #[error("工作表 \"{table}\" 第 {row} 行 \"{column}\" 列无效: {reason}")]
    InvalidCell {
        table: String,
        row: usize,
        column: String,
        reason: String,
    },
    /// 概览表中句型编号重复
    #[error("工作表 \"{table}\" 第 {row} 行句型编号 {pattern_number} 重复")]
    DuplicatePattern {
        table: String,
        row: usize,
        pattern_number: u32,
    },
}

/// 孤立的明细行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrphanRow {
    /// 表格中的行号（表头为第 1 行）
    pub row: usize,
    pub pattern_number: u32,
}

/// 引用完整性错误，包含全部孤立行
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{} 行明细引用了不存在的句型: {}", .orphans.len(), describe_orphans(.orphans))]
pub struct ReferentialError {
    pub orphans: Vec<OrphanRow>,
}

fn describe_orphans(orphans: &[OrphanRow]) -> String {
    orphans
        .iter()
        .map(|o| format!("第 {} 行 → Pattern {}", o.row, o.pattern_number))
        .collect::<Vec<_>>()
        .join("; ")
}

/// 某个 (句型, 部分) 的题目缺口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionDeficit {
    pub pattern_number: u32,
    pub section: Section,
    pub found: usize,
    pub required: usize,
}

/// 题目数量不足错误，包含全部不达标的组合
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{}", describe_deficits(.deficits))]
pub struct InsufficientDataError {
    pub deficits: Vec<SectionDeficit>,
}

fn describe_deficits(deficits: &[SectionDeficit]) -> String {
    deficits
        .iter()
        .map(|d| {
            format!(
                "Pattern {} / {}: {} 题 (至少 {} 题)",
                d.pattern_number, d.section, d.found, d.required
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// 句型选择错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("至少需要选择一个句型")]
    Empty,
    #[error("最多只能选择 {max} 个句型，实际选择了 {requested} 个")]
    TooMany { requested: usize, max: usize },
    #[error("句型 {pattern_number} 被重复选择")]
    Duplicate { pattern_number: u32 },
    #[error("句型 {pattern_number} 不存在于数据库中")]
    UnknownPattern { pattern_number: u32 },
}

/// 乱序题缺少单词
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Pattern {pattern_number} 第 {question_index} 题没有乱序单词")]
pub struct MalformedScrambleError {
    pub pattern_number: u32,
    pub question_index: i64,
}

/// 字体资源错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FontResourceError {
    /// 内容包含非拉丁字符，但没有可嵌入的字体
    #[error("内容包含字符 '{ch}'，但没有可用的嵌入字体")]
    Unavailable { ch: char },
    /// 字体文件无法解析
    #[error("无法解析字体 {name}: {reason}")]
    Unparsable { name: String, reason: String },
    /// 嵌入字体中没有该字符的字形
    #[error("字体 {name} 中缺少字符 '{ch}' 的字形")]
    MissingGlyph { name: String, ch: char },
}

/// PDF 序列化错误
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF 写入失败: {0}")]
    Pdf(#[from] lopdf::Error),
}

// ========== 便捷构造函数 ==========

impl SchemaError {
    /// 创建单元格无效错误
    pub fn invalid_cell(
        table: impl Into<String>,
        row: usize,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SchemaError::InvalidCell {
            table: table.into(),
            row,
            column: column.into(),
            reason: reason.into(),
        }
    }
}

impl From<lopdf::Error> for AppError {
    fn from(err: lopdf::Error) -> Self {
        AppError::Render(RenderError::Pdf(err))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
