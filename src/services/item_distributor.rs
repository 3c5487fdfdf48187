//! 题目分配 - 业务能力层
//!
//! 对每个部分：按选择顺序遍历句型，取每个句型前 `QUOTA` 道题
//! （question_index 升序），拼接后重新编号为 1..QUOTA×|S|。
//! 纯函数，同样的输入总是得到同样的输出。

use crate::models::{PatternItem, Section, ValidatedIndex, QUOTA};
use crate::services::pattern_selector::SelectionSet;
use std::collections::BTreeMap;

/// 分配到工作表中的一道题
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributedItem<'a> {
    /// 在该部分中的显示编号（从 1 开始）
    pub number: usize,
    pub item: &'a PatternItem,
}

/// 四个部分各自的题目序列
#[derive(Debug, Clone, Default)]
pub struct Distribution<'a> {
    sections: BTreeMap<Section, Vec<DistributedItem<'a>>>,
}

impl<'a> Distribution<'a> {
    pub fn section(&self, section: Section) -> &[DistributedItem<'a>] {
        self.sections
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

pub fn distribute<'a>(index: &'a ValidatedIndex, selection: &SelectionSet) -> Distribution<'a> {
    let sections = Section::ALL
        .into_iter()
        .map(|section| {
            let items: Vec<DistributedItem<'a>> = selection
                .patterns()
                .iter()
                .flat_map(|&pattern_number| {
                    index.items(pattern_number, section).iter().take(QUOTA)
                })
                .enumerate()
                .map(|(idx, item)| DistributedItem {
                    number: idx + 1,
                    item,
                })
                .collect();
            (section, items)
        })
        .collect();

    Distribution { sections }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::database_loader::load_database;
    use crate::services::pattern_selector::select_patterns;
    use crate::test_support::{prompt_for, sample_workbook};

    #[test]
    fn test_quota_per_section() {
        let index = load_database(&sample_workbook(&[1, 2, 3], 5)).unwrap();
        let selection = select_patterns(&index, &[1, 2, 3]).unwrap();
        let distribution = distribute(&index, &selection);

        for section in Section::ALL {
            assert_eq!(distribution.section(section).len(), QUOTA * 3);
        }
    }

    #[test]
    fn test_selection_order_and_renumbering() {
        let index = load_database(&sample_workbook(&[1, 2, 3], 5)).unwrap();
        let selection = select_patterns(&index, &[2, 1]).unwrap();
        let distribution = distribute(&index, &selection);

        let items = distribution.section(Section::SpeakingI);
        let numbers: Vec<usize> = items.iter().map(|d| d.number).collect();
        assert_eq!(numbers, (1..=10).collect::<Vec<_>>());

        let expected: Vec<String> = (1..=5)
            .map(|q| prompt_for(2, Section::SpeakingI, q))
            .chain((1..=5).map(|q| prompt_for(1, Section::SpeakingI, q)))
            .collect();
        let prompts: Vec<String> = items.iter().map(|d| d.item.prompt.clone()).collect();
        assert_eq!(prompts, expected);
    }

    #[test]
    fn test_extra_items_are_truncated() {
        let index = load_database(&sample_workbook(&[1], 8)).unwrap();
        let selection = select_patterns(&index, &[1]).unwrap();
        let distribution = distribute(&index, &selection);

        let indices: Vec<i64> = distribution
            .section(Section::Unscramble)
            .iter()
            .map(|d| d.item.question_index)
            .collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_distribution_is_deterministic() {
        let index = load_database(&sample_workbook(&[1, 2], 7)).unwrap();
        let selection = select_patterns(&index, &[2, 1]).unwrap();
        let first = distribute(&index, &selection);
        let second = distribute(&index, &selection);
        for section in Section::ALL {
            assert_eq!(first.section(section), second.section(section));
        }
    }
}
