//! 工作表生成流程 - 流程层
//!
//! 核心职责：定义"一张工作表"的完整生成流程
//!
//! 流程顺序：
//! 1. 校验句型选择
//! 2. 按部分分配题目并重新编号
//! 3. 格式化 Unscramble 乱序单词
//! 4. 组装文档 → 排版 → PDF
//!
//! 任何一步失败都直接返回错误，不会产生残缺的文档。

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::AppResult;
use crate::layout::{FontResource, HeaderMeta, LayoutEngine, WorksheetDocument};
use crate::models::{Section, ValidatedIndex, DEFAULT_UNIT};
use crate::services::{distribute, format_scramble, select_patterns, ScrambleDisplay, SelectionSet};
use crate::utils::logging::truncate_text;
use crate::workflow::worksheet_ctx::WorksheetCtx;

/// 日志中题干的最大显示长度
const LOG_PROMPT_LEN: usize = 40;

/// 工作表生成流程
///
/// - 只读访问索引和字体，可在多个线程间共享
/// - 不做任何文件读写
pub struct WorksheetFlow {
    font: Option<Arc<FontResource>>,
    engine: LayoutEngine,
    verbose_logging: bool,
}

impl WorksheetFlow {
    pub fn new(font: Option<Arc<FontResource>>) -> Self {
        Self {
            font,
            engine: LayoutEngine::a4(),
            verbose_logging: false,
        }
    }

    pub fn with_verbose_logging(mut self, verbose_logging: bool) -> Self {
        self.verbose_logging = verbose_logging;
        self
    }

    /// 校验请求并生成 PDF
    pub fn run(
        &self,
        index: &ValidatedIndex,
        requested: &[u32],
        ctx: &WorksheetCtx,
    ) -> AppResult<Vec<u8>> {
        let selection = select_patterns(index, requested)?;
        info!("{} 📝 开始生成工作表", ctx);

        let bytes = self.generate_inner(index, &selection, Some(ctx))?;

        info!("{} ✓ 生成完成 ({} 字节)", ctx, bytes.len());
        Ok(bytes)
    }

    /// 对已校验的选择生成 PDF
    pub fn generate(&self, index: &ValidatedIndex, selection: &SelectionSet) -> AppResult<Vec<u8>> {
        self.generate_inner(index, selection, None)
    }

    fn generate_inner(
        &self,
        index: &ValidatedIndex,
        selection: &SelectionSet,
        ctx: Option<&WorksheetCtx>,
    ) -> AppResult<Vec<u8>> {
        let trace = ctx.filter(|_| self.verbose_logging);
        render_selection(&self.engine, index, selection, self.font.as_deref(), trace)
    }
}

/// 分配 → 格式化 → 组装 → 排版；`trace` 存在时逐题输出 debug 日志
fn render_selection(
    engine: &LayoutEngine,
    index: &ValidatedIndex,
    selection: &SelectionSet,
    font: Option<&FontResource>,
    trace: Option<&WorksheetCtx>,
) -> AppResult<Vec<u8>> {
    let distribution = distribute(index, selection);

    let scrambles = distribution
        .section(Section::Unscramble)
        .iter()
        .map(|d| format_scramble(d.item))
        .collect::<AppResult<Vec<ScrambleDisplay>>>()?;

    if let Some(ctx) = trace {
        for section in Section::ALL {
            for d in distribution.section(section) {
                debug!(
                    "{} {} {}. {}",
                    ctx,
                    section,
                    d.number,
                    truncate_text(&d.item.prompt, LOG_PROMPT_LEN)
                );
            }
        }
    }

    let unit = selection
        .patterns()
        .first()
        .and_then(|&n| index.summary(n))
        .map(|s| s.unit.as_str())
        .unwrap_or(DEFAULT_UNIT);
    let header = HeaderMeta::new(unit, selection);
    let document = WorksheetDocument::assemble(&header, &distribution, &scrambles);

    engine.render(&document, font)
}

/// 生成一张工作表
///
/// 同样的索引、选择和字体总是得到同样的字节。
pub fn generate_worksheet(
    index: &ValidatedIndex,
    selection: &SelectionSet,
    font: Option<&FontResource>,
) -> AppResult<Vec<u8>> {
    render_selection(&LayoutEngine::a4(), index, selection, font, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, MalformedScrambleError};
    use crate::models::RawCell;
    use crate::services::load_database;
    use crate::test_support::sample_workbook;

    #[test]
    fn test_run_generates_pdf() {
        let index = load_database(&sample_workbook(&[1, 2], 5)).unwrap();
        let flow = WorksheetFlow::new(None).with_verbose_logging(true);
        let bytes = flow.run(&index, &[2, 1], &WorksheetCtx::new(1, vec![2, 1])).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_run_rejects_bad_selection() {
        let index = load_database(&sample_workbook(&[1, 2], 5)).unwrap();
        let flow = WorksheetFlow::new(None);
        let err = flow.run(&index, &[1, 1], &WorksheetCtx::new(1, vec![1, 1])).unwrap_err();
        assert!(matches!(err, AppError::Selection(_)));
    }

    #[test]
    fn test_empty_scramble_is_malformed() {
        let mut workbook = sample_workbook(&[1], 5);
        // 清空第一道 Unscramble 题的乱序单词
        let details = &mut workbook.tables[1];
        let scrambled_col = details.headers.len() - 1;
        let row = details
            .rows
            .iter_mut()
            .find(|r| r[2] == RawCell::from("Unscramble"))
            .unwrap();
        row[scrambled_col] = RawCell::Empty;

        let index = load_database(&workbook).unwrap();
        let selection = select_patterns(&index, &[1]).unwrap();
        let err = generate_worksheet(&index, &selection, None).unwrap_err();
        assert!(matches!(
            err,
            AppError::MalformedScramble(MalformedScrambleError {
                pattern_number: 1,
                question_index: 1
            })
        ));
    }
}
