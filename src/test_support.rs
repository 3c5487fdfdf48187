//! 单元测试共用的表格构造工具

use crate::layout::FontResource;
use crate::models::{RawCell, RawTable, RawWorkbook, Section};
use crate::services::database_loader::{DETAILS_TABLE, OVERVIEW_TABLE};
use std::path::Path;

pub const OVERVIEW_HEADERS: [&str; 3] = ["Pattern Number", "Pattern Name", "Total Items"];
pub const DETAIL_HEADERS: [&str; 7] = [
    "Pattern #",
    "Pattern Name",
    "Section",
    "Question #",
    "Korean/Question",
    "English/Answer",
    "Scrambled",
];

pub fn overview_row(pattern: i64, name: &str, total: i64) -> Vec<RawCell> {
    vec![RawCell::Int(pattern), name.into(), RawCell::Int(total)]
}

pub fn detail_row(
    pattern: i64,
    section: &str,
    question: i64,
    prompt: &str,
    scrambled: &str,
) -> Vec<RawCell> {
    vec![
        RawCell::Int(pattern),
        format!("Pattern {pattern}").into(),
        section.into(),
        RawCell::Int(question),
        prompt.into(),
        format!("Answer {question}").into(),
        scrambled.into(),
    ]
}

/// 题干形如 `P2 Speaking I Q3`，便于断言顺序
pub fn prompt_for(pattern: u32, section: Section, question: i64) -> String {
    format!("P{} {} Q{}", pattern, section.label(), question)
}

/// 每个句型每个部分 `per_section` 道题，全部为拉丁字符
pub fn sample_workbook(patterns: &[u32], per_section: i64) -> RawWorkbook {
    let mut overview = RawTable::new(OVERVIEW_TABLE, &OVERVIEW_HEADERS);
    let mut details = RawTable::new(DETAILS_TABLE, &DETAIL_HEADERS);

    for &p in patterns {
        overview = overview.with_row(overview_row(
            i64::from(p),
            &format!("Pattern {p}"),
            per_section * 4,
        ));
        for section in Section::ALL {
            for q in 1..=per_section {
                let scrambled = if section == Section::Unscramble {
                    format!("(is / P{p} / word{q})")
                } else {
                    String::new()
                };
                details = details.with_row(detail_row(
                    i64::from(p),
                    section.label(),
                    q,
                    &prompt_for(p, section, q),
                    &scrambled,
                ));
            }
        }
    }

    RawWorkbook {
        tables: vec![overview, details],
    }
}

/// 测试字体：ASCII + "나는다생이학"，不含 '한'；ASCII 宽 600，韩文宽 1000
pub fn fixture_font() -> FontResource {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/PatternTest.ttf");
    let data = std::fs::read(&path).unwrap();
    FontResource::from_file_bytes(&path, data).unwrap()
}
