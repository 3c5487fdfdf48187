//! 版面组合：把工作表文档展开为自上而下的行序列
//!
//! 固定顺序：标题 → 姓名/日期 → Speaking I → Speaking II → Speaking III
//! → Unscramble → GRADE/REMARK。行高和间距沿用纸质模板的数值。

use crate::layout::document::{RenderedItem, WorksheetDocument};
use crate::layout::font::TextMeasure;
use crate::models::Section;

/// 1 mm 对应的 pt
pub const MM: f32 = 72.0 / 25.4;

/// 行距系数
pub const LEADING: f32 = 1.2;

const TITLE_SIZE: f32 = 12.0;
const NAME_DATE_SIZE: f32 = 12.0;
const SECTION_SIZE: f32 = 10.0;
const ITEM_SIZE: f32 = 9.0;
const FOOTER_SIZE: f32 = 12.0;

const ITEM_SPACING: f32 = 2.0;

const NAME_LABEL: &str = "NAME: _______________________________";
const DATE_LABEL: &str = "DATE: _____ / _____";
const PATTERN_LABEL: &str = "PATTERN";
const REMARK_OFFSET_MM: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// 行内的一段文字
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub align: Align,
    /// 仅 `Align::Left` 使用：相对左边距的偏移
    pub offset: f32,
}

impl Segment {
    pub fn left(text: impl Into<String>, offset: f32) -> Self {
        Self {
            text: text.into(),
            align: Align::Left,
            offset,
        }
    }

    pub fn center(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            align: Align::Center,
            offset: 0.0,
        }
    }

    pub fn right(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            align: Align::Right,
            offset: 0.0,
        }
    }
}

/// 行在模板中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    Title,
    NameDate,
    SectionHeader(Section),
    Item(Section),
    AnswerRule,
    Footer,
    Spacer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    pub role: LineRole,
    pub segments: Vec<Segment>,
    pub size: f32,
    pub bold: bool,
    pub space_before: f32,
    pub space_after: f32,
    /// 不允许与下一条非空白行分页
    pub keep_with_next: bool,
}

impl LayoutLine {
    fn text(role: LineRole, segments: Vec<Segment>, size: f32, bold: bool) -> Self {
        Self {
            role,
            segments,
            size,
            bold,
            space_before: 0.0,
            space_after: 0.0,
            keep_with_next: false,
        }
    }

    pub fn spacer(height: f32) -> Self {
        Self {
            role: LineRole::Spacer,
            segments: Vec::new(),
            size: 0.0,
            bold: false,
            space_before: height,
            space_after: 0.0,
            keep_with_next: false,
        }
    }

    fn spacing(mut self, before: f32, after: f32) -> Self {
        self.space_before = before;
        self.space_after = after;
        self
    }

    fn keep(mut self, keep_with_next: bool) -> Self {
        self.keep_with_next = keep_with_next;
        self
    }

    pub fn is_spacer(&self) -> bool {
        self.role == LineRole::Spacer
    }

    pub fn height(&self) -> f32 {
        if self.is_spacer() {
            self.space_before
        } else {
            self.space_before + self.size * LEADING + self.space_after
        }
    }
}

/// 把文档展开为行序列，正文按 `content_width` 折行
pub fn compose(
    doc: &WorksheetDocument,
    measure: &dyn TextMeasure,
    content_width: f32,
) -> Vec<LayoutLine> {
    let mut lines = Vec::new();

    lines.push(
        LayoutLine::text(
            LineRole::Title,
            vec![Segment::center(&doc.title)],
            TITLE_SIZE,
            true,
        )
        .spacing(0.0, 5.0),
    );
    lines.push(
        LayoutLine::text(
            LineRole::Title,
            vec![Segment::center(&doc.subtitle)],
            TITLE_SIZE,
            true,
        )
        .spacing(0.0, 5.0),
    );
    lines.push(LayoutLine::text(
        LineRole::NameDate,
        vec![Segment::left(NAME_LABEL, 0.0), Segment::right(DATE_LABEL)],
        NAME_DATE_SIZE,
        false,
    ));
    lines.push(LayoutLine::spacer(5.0 * MM));

    for section in Section::ALL {
        let mut header = vec![Segment::left(section.heading(), 0.0)];
        if section == Section::SpeakingI {
            header.push(Segment::right(PATTERN_LABEL));
        }
        lines.push(
            LayoutLine::text(LineRole::SectionHeader(section), header, SECTION_SIZE, true)
                .keep(true),
        );

        match section {
            Section::Unscramble => {
                lines.push(LayoutLine::spacer(3.0 * MM));
                for item in doc.section(section) {
                    push_unscramble_item(&mut lines, item, measure, content_width);
                }
            }
            _ => {
                lines.push(LayoutLine::spacer(2.0 * MM));
                for item in doc.section(section) {
                    lines.extend(item_lines(section, item, measure, content_width));
                }
                lines.push(LayoutLine::spacer(6.0 * MM));
            }
        }
    }

    lines.push(LayoutLine::spacer(5.0 * MM));
    lines.push(LayoutLine::text(
        LineRole::Footer,
        vec![
            Segment::left(&doc.footer.grade, 0.0),
            Segment::left(&doc.footer.remark, REMARK_OFFSET_MM * MM),
        ],
        FOOTER_SIZE,
        true,
    ));

    lines
}

/// 编号 + 折行后的题干；同一题的各行不分页
fn item_lines(
    section: Section,
    item: &RenderedItem,
    measure: &dyn TextMeasure,
    content_width: f32,
) -> Vec<LayoutLine> {
    let indent = measure.text_width(&item.label, ITEM_SIZE, false);
    let wrapped = wrap_text(&item.text, content_width - indent, ITEM_SIZE, measure);
    let last = wrapped.len().saturating_sub(1);

    wrapped
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let mut segments = Vec::with_capacity(2);
            if i == 0 && !item.label.is_empty() {
                segments.push(Segment::left(&item.label, 0.0));
            }
            segments.push(Segment::left(text, indent));
            LayoutLine::text(LineRole::Item(section), segments, ITEM_SIZE, false)
                .spacing(ITEM_SPACING, ITEM_SPACING)
                .keep(i < last)
        })
        .collect()
}

/// 题干 → 书写空白 → 答题横线 → 题间距
fn push_unscramble_item(
    lines: &mut Vec<LayoutLine>,
    item: &RenderedItem,
    measure: &dyn TextMeasure,
    content_width: f32,
) {
    for line in item_lines(Section::Unscramble, item, measure, content_width) {
        lines.push(line.keep(true));
    }
    lines.push(LayoutLine::spacer(8.0 * MM));
    if let Some(rule) = &item.answer_rule {
        lines.push(LayoutLine::text(
            LineRole::AnswerRule,
            vec![Segment::left(rule, 0.0)],
            ITEM_SIZE,
            false,
        ));
    }
    lines.push(LayoutLine::spacer(5.0 * MM));
}

/// 按空白贪心折行；单个词超宽时按字符断开
pub fn wrap_text(text: &str, max_width: f32, size: f32, measure: &dyn TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if measure.text_width(&candidate, size, false) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if measure.text_width(word, size, false) <= max_width {
            current = word.to_string();
        } else {
            for ch in word.chars() {
                current.push(ch);
                if measure.text_width(&current, size, false) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 每个字符固定为半个字号宽
    struct HalfEm;

    impl TextMeasure for HalfEm {
        fn text_width(&self, text: &str, size: f32, _bold: bool) -> f32 {
            text.chars().count() as f32 * size * 0.5
        }
    }

    #[test]
    fn test_wrap_text_greedy() {
        // 每字符 5pt，宽 50pt → 每行最多 10 个字符
        let lines = wrap_text("one two three four five", 50.0, 10.0, &HalfEm);
        assert_eq!(lines, vec!["one two", "three four", "five"]);
    }

    #[test]
    fn test_wrap_text_breaks_long_word() {
        let lines = wrap_text("abcdefghijklmnop", 25.0, 10.0, &HalfEm);
        assert_eq!(lines, vec!["abcde", "fghij", "klmno", "p"]);
    }

    #[test]
    fn test_wrap_text_empty() {
        assert_eq!(wrap_text("   ", 50.0, 10.0, &HalfEm), vec![String::new()]);
    }

    #[test]
    fn test_item_lines_keep_together() {
        let item = RenderedItem {
            label: "1. ".to_string(),
            text: "alpha beta gamma delta".to_string(),
            answer_rule: None,
        };
        let lines = item_lines(Section::SpeakingI, &item, &HalfEm, 60.0);
        assert!(lines.len() > 1);
        assert_eq!(lines[0].segments[0].text, "1. ");
        assert!(lines[..lines.len() - 1].iter().all(|l| l.keep_with_next));
        assert!(!lines[lines.len() - 1].keep_with_next);
    }

    #[test]
    fn test_spacer_height() {
        assert_eq!(LayoutLine::spacer(7.5).height(), 7.5);
    }
}
