//! 排版引擎
//!
//! `document`（内容）→ `composer`（行序列）→ `paginator`（分页）
//! → 坐标定位 → `renderer`（PDF 字节）。
//! 分页与序列化分开，测试可以直接检查 `PageLayout`。

pub mod composer;
pub mod document;
pub mod font;
pub mod paginator;
pub mod renderer;

pub use composer::{compose, Align, LayoutLine, LineRole, Segment, MM};
pub use document::{FooterLabels, HeaderMeta, RenderedItem, WorksheetDocument, WORKSHEET_TITLE};
pub use font::{FontBook, FontResource, TextMeasure};
pub use paginator::{paginate, PlacedLine};
pub use renderer::{DocumentRenderer, LaidOutPage, PageLayout, PdfRenderer, PositionedText};

use crate::error::AppResult;

/// 基线相对字号顶部的位置
const BASELINE_RATIO: f32 = 0.9;

/// 纸张尺寸与边距，单位 pt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// A4 纵向，四边 15mm
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin: 15.0 * MM,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn content_height(&self) -> f32 {
        self.height - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutEngine {
    geometry: PageGeometry,
}

impl LayoutEngine {
    pub fn new(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    pub fn a4() -> Self {
        Self::new(PageGeometry::a4())
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    /// 折行、分页并计算每段文字的坐标
    pub fn layout(&self, doc: &WorksheetDocument, measure: &dyn TextMeasure) -> PageLayout {
        let lines = compose(doc, measure, self.geometry.content_width());
        self.place(lines, measure)
    }

    fn place(&self, lines: Vec<LayoutLine>, measure: &dyn TextMeasure) -> PageLayout {
        let geometry = self.geometry;
        let pages = paginate(lines, geometry.content_height())
            .into_iter()
            .map(|placed| LaidOutPage {
                texts: placed
                    .iter()
                    .flat_map(|p| self.position(p, measure))
                    .collect(),
            })
            .collect();

        PageLayout {
            width: geometry.width,
            height: geometry.height,
            pages,
        }
    }

    fn position(&self, placed: &PlacedLine, measure: &dyn TextMeasure) -> Vec<PositionedText> {
        let geometry = self.geometry;
        let line = &placed.line;
        let y = geometry.height
            - geometry.margin
            - (placed.top + line.space_before + BASELINE_RATIO * line.size);

        line.segments
            .iter()
            .filter(|s| !s.text.is_empty())
            .map(|segment| {
                let width = measure.text_width(&segment.text, line.size, line.bold);
                let x = match segment.align {
                    Align::Left => geometry.margin + segment.offset,
                    Align::Center => (geometry.width - width) / 2.0,
                    Align::Right => geometry.width - geometry.margin - width,
                };
                PositionedText {
                    text: segment.text.clone(),
                    x,
                    y,
                    size: line.size,
                    bold: line.bold,
                }
            })
            .collect()
    }

    /// 排版并输出 PDF；没有字体资源时只能绘制 Latin 文本
    pub fn render(&self, doc: &WorksheetDocument, font: Option<&FontResource>) -> AppResult<Vec<u8>> {
        let fonts = FontBook::new(font)?;

        let lines = compose(doc, &fonts, self.geometry.content_width());
        for line in &lines {
            for segment in &line.segments {
                fonts.check_coverage(&segment.text)?;
            }
        }

        let layout = self.place(lines, &fonts);
        PdfRenderer::new(&fonts).render(&layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Section;
    use crate::services::{distribute, format_scramble, load_database, select_patterns};
    use crate::test_support::sample_workbook;

    fn document(patterns: &[u32]) -> WorksheetDocument {
        let index = load_database(&sample_workbook(&[1, 2, 3, 4, 5, 6], 5)).unwrap();
        let selection = select_patterns(&index, patterns).unwrap();
        let distribution = distribute(&index, &selection);
        let scrambles: Vec<_> = distribution
            .section(Section::Unscramble)
            .iter()
            .map(|d| format_scramble(d.item).unwrap())
            .collect();
        WorksheetDocument::assemble(&HeaderMeta::new("Level A", &selection), &distribution, &scrambles)
    }

    #[test]
    fn test_a4_geometry() {
        let geometry = PageGeometry::a4();
        assert!((geometry.margin - 42.52).abs() < 0.01);
        assert!((geometry.content_width() - 510.24).abs() < 0.01);
    }

    #[test]
    fn test_texts_stay_inside_margins() {
        let engine = LayoutEngine::a4();
        let fonts = FontBook::standard_only();
        let layout = engine.layout(&document(&[1, 2, 3, 4, 5]), &fonts);
        let geometry = engine.geometry();
        assert!(layout.pages.len() > 1);
        for page in &layout.pages {
            for text in &page.texts {
                assert!(text.x >= geometry.margin - 0.01, "{:?}", text);
                assert!(text.y >= geometry.margin - 0.01, "{:?}", text);
                assert!(text.y <= geometry.height - geometry.margin, "{:?}", text);
            }
        }
    }

    #[test]
    fn test_title_centered() {
        let engine = LayoutEngine::a4();
        let fonts = FontBook::standard_only();
        let layout = engine.layout(&document(&[1]), &fonts);
        let title = &layout.pages[0].texts[0];
        assert_eq!(title.text, "Weekly Test");
        let width = fonts.text_width("Weekly Test", title.size, true);
        assert!((title.x * 2.0 + width - layout.width).abs() < 0.01);
    }

    #[test]
    fn test_render_latin_only_without_font() {
        let bytes = LayoutEngine::a4().render(&document(&[2, 1]), None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
