use crate::models::pattern::{PatternItem, PatternListing, PatternSummary, Section};
use std::collections::{BTreeMap, HashMap};

/// 校验通过的只读数据库索引
///
/// 只能由 `services::database_loader::load_database` 构造，
/// 因此每个已声明句型的四个部分都至少有 `QUOTA` 道题。
#[derive(Debug, Clone, Default)]
pub struct ValidatedIndex {
    summaries: BTreeMap<u32, PatternSummary>,
    partitions: HashMap<(u32, Section), Vec<PatternItem>>,
}

impl ValidatedIndex {
    /// `partitions` 中的题目必须已按 question_index 稳定排序
    pub(crate) fn from_parts(
        summaries: BTreeMap<u32, PatternSummary>,
        partitions: HashMap<(u32, Section), Vec<PatternItem>>,
    ) -> Self {
        Self {
            summaries,
            partitions,
        }
    }

    pub fn contains(&self, pattern_number: u32) -> bool {
        self.summaries.contains_key(&pattern_number)
    }

    pub fn summary(&self, pattern_number: u32) -> Option<&PatternSummary> {
        self.summaries.get(&pattern_number)
    }

    /// 某个 (句型, 部分) 的全部题目，按 question_index 升序
    pub fn items(&self, pattern_number: u32, section: Section) -> &[PatternItem] {
        self.partitions
            .get(&(pattern_number, section))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn pattern_count(&self) -> usize {
        self.summaries.len()
    }

    /// 按编号排序的句型目录
    pub fn catalog(&self) -> Vec<PatternListing> {
        self.summaries
            .values()
            .map(|s| PatternListing {
                number: s.pattern_number,
                name: s.name.clone(),
                unit: s.unit.clone(),
            })
            .collect()
    }
}
