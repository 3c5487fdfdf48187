//! 数据库加载与校验 - 业务能力层
//!
//! 把上传表格的两张工作表转换为强类型记录，并校验：
//! 1. 两张表和全部必需列存在
//! 2. 每条明细都引用已声明的句型（收集全部孤立行）
//! 3. 每个句型的四个部分各至少 `QUOTA` 道题（收集全部缺口）

use crate::error::{
    AppResult, InsufficientDataError, OrphanRow, ReferentialError, SchemaError, SectionDeficit,
};
use crate::models::{
    PatternItem, PatternSummary, RawCell, RawTable, RawWorkbook, Section, ValidatedIndex,
    DEFAULT_UNIT, QUOTA,
};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

pub const OVERVIEW_TABLE: &str = "Pattern Overview";
pub const DETAILS_TABLE: &str = "Pattern Details";

const COL_PATTERN_NUMBER: &str = "Pattern Number";
const COL_PATTERN_NAME: &str = "Pattern Name";
const COL_TOTAL_ITEMS: &str = "Total Items";
const COL_UNIT: &str = "Unit";

const COL_DETAIL_PATTERN: &str = "Pattern #";
const COL_SECTION: &str = "Section";
const COL_QUESTION: &str = "Question #";
const COL_PROMPT: &str = "Korean/Question";
const COL_ANSWER: &str = "English/Answer";
const COL_SCRAMBLED: &str = "Scrambled";

const OVERVIEW_COLUMNS: [&str; 3] = [COL_PATTERN_NUMBER, COL_PATTERN_NAME, COL_TOTAL_ITEMS];
const DETAIL_COLUMNS: [&str; 7] = [
    COL_DETAIL_PATTERN,
    COL_PATTERN_NAME,
    COL_SECTION,
    COL_QUESTION,
    COL_PROMPT,
    COL_ANSWER,
    COL_SCRAMBLED,
];

/// 表头在第 1 行，数据从第 2 行开始
const FIRST_DATA_ROW: usize = 2;

/// 校验上传的表格并构建只读索引
pub fn load_database(raw: &RawWorkbook) -> AppResult<ValidatedIndex> {
    let overview = require_table(raw, OVERVIEW_TABLE)?;
    let details = require_table(raw, DETAILS_TABLE)?;

    let overview_cols = ColumnMap::resolve(overview, &OVERVIEW_COLUMNS)?;
    let detail_cols = ColumnMap::resolve(details, &DETAIL_COLUMNS)?;

    let summaries = parse_overview(overview, &overview_cols)?;
    let items = parse_details(details, &detail_cols)?;

    check_references(&summaries, &items)?;

    let partitions = build_partitions(items);
    check_quotas(&summaries, &partitions)?;

    for summary in summaries.values() {
        let actual: usize = Section::ALL
            .iter()
            .map(|s| partitions.get(&(summary.pattern_number, *s)).map_or(0, Vec::len))
            .sum();
        if summary.total_items != actual as i64 {
            warn!(
                "⚠️ Pattern {} 声明 {} 题，明细表中实际有 {} 题",
                summary.pattern_number, summary.total_items, actual
            );
        }
    }

    info!(
        "✓ 数据库校验通过: {} 个句型, {} 个题目分组",
        summaries.len(),
        partitions.len()
    );

    Ok(ValidatedIndex::from_parts(summaries, partitions))
}

fn require_table<'a>(raw: &'a RawWorkbook, name: &str) -> Result<&'a RawTable, SchemaError> {
    raw.table(name).ok_or_else(|| SchemaError::MissingTable {
        table: name.to_string(),
    })
}

/// 列名 → 列下标
struct ColumnMap {
    table: String,
    positions: HashMap<String, usize>,
}

impl ColumnMap {
    fn resolve(table: &RawTable, required: &[&str]) -> Result<Self, SchemaError> {
        let mut positions = HashMap::new();
        for (idx, header) in table.headers.iter().enumerate() {
            positions.entry(normalize_header(header)).or_insert(idx);
        }

        let missing: Vec<String> = required
            .iter()
            .filter(|col| !positions.contains_key(&normalize_header(col)))
            .map(|col| col.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns {
                table: table.name.trim().to_string(),
                columns: missing,
            });
        }

        Ok(Self {
            table: table.name.trim().to_string(),
            positions,
        })
    }

    fn index(&self, column: &str) -> Option<usize> {
        self.positions.get(&normalize_header(column)).copied()
    }

    /// 读取单元格，短行缺失的单元格视为空
    fn cell<'r>(&self, row: &'r [RawCell], column: &str) -> &'r RawCell {
        static EMPTY: RawCell = RawCell::Empty;
        self.index(column)
            .and_then(|idx| row.get(idx))
            .unwrap_or(&EMPTY)
    }

    fn text(&self, row: &[RawCell], column: &str) -> String {
        self.cell(row, column).as_text()
    }

    fn int(&self, row: &[RawCell], row_number: usize, column: &str) -> Result<i64, SchemaError> {
        let cell = self.cell(row, column);
        cell.as_int().ok_or_else(|| {
            SchemaError::invalid_cell(
                &self.table,
                row_number,
                column,
                format!("期望整数，实际为 {:?}", cell),
            )
        })
    }

    fn pattern_number(
        &self,
        row: &[RawCell],
        row_number: usize,
        column: &str,
    ) -> Result<u32, SchemaError> {
        let value = self.int(row, row_number, column)?;
        u32::try_from(value)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                SchemaError::invalid_cell(
                    &self.table,
                    row_number,
                    column,
                    format!("句型编号必须为正整数，实际为 {}", value),
                )
            })
    }
}

fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn parse_overview(
    table: &RawTable,
    cols: &ColumnMap,
) -> Result<BTreeMap<u32, PatternSummary>, SchemaError> {
    let mut summaries = BTreeMap::new();

    for (offset, row) in table.rows.iter().enumerate() {
        let row_number = offset + FIRST_DATA_ROW;
        if cols.cell(row, COL_PATTERN_NUMBER).is_blank() {
            continue;
        }

        let pattern_number = cols.pattern_number(row, row_number, COL_PATTERN_NUMBER)?;
        let total_items = cols.int(row, row_number, COL_TOTAL_ITEMS)?;
        let unit = Some(cols.text(row, COL_UNIT))
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_UNIT.to_string());

        let summary = PatternSummary {
            pattern_number,
            name: cols.text(row, COL_PATTERN_NAME),
            total_items,
            unit,
        };

        if summaries.insert(pattern_number, summary).is_some() {
            return Err(SchemaError::DuplicatePattern {
                table: cols.table.clone(),
                row: row_number,
                pattern_number,
            });
        }
    }

    Ok(summaries)
}

fn parse_details(table: &RawTable, cols: &ColumnMap) -> Result<Vec<PatternItem>, SchemaError> {
    let mut items = Vec::with_capacity(table.rows.len());

    for (offset, row) in table.rows.iter().enumerate() {
        let row_number = offset + FIRST_DATA_ROW;
        if cols.cell(row, COL_DETAIL_PATTERN).is_blank() {
            continue;
        }

        let pattern_number = cols.pattern_number(row, row_number, COL_DETAIL_PATTERN)?;
        let section_label = cols.text(row, COL_SECTION);
        let section = Section::from_label(&section_label).ok_or_else(|| {
            SchemaError::invalid_cell(
                &cols.table,
                row_number,
                COL_SECTION,
                format!("未知的部分 \"{}\"", section_label),
            )
        })?;
        let question_index = cols.int(row, row_number, COL_QUESTION)?;

        let answer = Some(cols.text(row, COL_ANSWER)).filter(|a| !a.is_empty());
        let scrambled = cols.text(row, COL_SCRAMBLED);
        let scrambled_tokens = if section == Section::Unscramble {
            split_scrambled(&scrambled)
        } else {
            if !scrambled.is_empty() {
                debug!(
                    "第 {} 行属于 {}，忽略 Scrambled 列内容",
                    row_number, section
                );
            }
            Vec::new()
        };

        items.push(PatternItem {
            pattern_number,
            section,
            question_index,
            prompt: cols.text(row, COL_PROMPT),
            answer,
            scrambled_tokens,
            source_row: row_number,
        });
    }

    Ok(items)
}

/// 拆分 Scrambled 列：去掉外层括号，有 "/" 时按 "/" 分隔，否则按空白分隔
pub fn split_scrambled(raw: &str) -> Vec<String> {
    static SLASH: OnceLock<Regex> = OnceLock::new();
    let slash = SLASH.get_or_init(|| Regex::new(r"\s*/\s*").expect("valid regex"));

    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed);

    let tokens: Vec<&str> = if inner.contains('/') {
        slash.split(inner).collect()
    } else {
        inner.split_whitespace().collect()
    };

    tokens
        .into_iter()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_references(
    summaries: &BTreeMap<u32, PatternSummary>,
    items: &[PatternItem],
) -> Result<(), ReferentialError> {
    let orphans: Vec<OrphanRow> = items
        .iter()
        .filter(|item| !summaries.contains_key(&item.pattern_number))
        .map(|item| OrphanRow {
            row: item.source_row,
            pattern_number: item.pattern_number,
        })
        .collect();

    if orphans.is_empty() {
        Ok(())
    } else {
        Err(ReferentialError { orphans })
    }
}

fn build_partitions(items: Vec<PatternItem>) -> HashMap<(u32, Section), Vec<PatternItem>> {
    let mut partitions: HashMap<(u32, Section), Vec<PatternItem>> = HashMap::new();
    for item in items {
        partitions
            .entry((item.pattern_number, item.section))
            .or_default()
            .push(item);
    }
    // 同序号按原始行顺序，sort_by_key 是稳定排序
    for list in partitions.values_mut() {
        list.sort_by_key(|item| item.question_index);
    }
    partitions
}

fn check_quotas(
    summaries: &BTreeMap<u32, PatternSummary>,
    partitions: &HashMap<(u32, Section), Vec<PatternItem>>,
) -> Result<(), InsufficientDataError> {
    let deficits: Vec<SectionDeficit> = summaries
        .keys()
        .flat_map(|&pattern_number| {
            Section::ALL.iter().filter_map(move |&section| {
                let found = partitions
                    .get(&(pattern_number, section))
                    .map_or(0, Vec::len);
                (found < QUOTA).then_some(SectionDeficit {
                    pattern_number,
                    section,
                    found,
                    required: QUOTA,
                })
            })
        })
        .collect();

    if deficits.is_empty() {
        Ok(())
    } else {
        Err(InsufficientDataError { deficits })
    }
}
