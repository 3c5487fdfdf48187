use crate::models::Section;
use crate::services::item_distributor::Distribution;
use crate::services::pattern_selector::SelectionSet;
use crate::services::scramble_formatter::ScrambleDisplay;
use std::collections::BTreeMap;

pub const WORKSHEET_TITLE: &str = "Weekly Test";

/// 页眉信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMeta {
    pub title: String,
    /// 例如 `Pattern Level A`
    pub level_label: String,
    /// 例如 `2, 1`
    pub patterns_label: String,
    pub pattern_numbers: Vec<u32>,
}

impl HeaderMeta {
    pub fn new(unit: &str, selection: &SelectionSet) -> Self {
        Self {
            title: WORKSHEET_TITLE.to_string(),
            level_label: format!("Pattern {}", unit),
            patterns_label: selection.describe(),
            pattern_numbers: selection.patterns().to_vec(),
        }
    }

    /// `Pattern Level A - Patterns: 2, 1`
    pub fn subtitle(&self) -> String {
        format!("{} - Patterns: {}", self.level_label, self.patterns_label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterLabels {
    pub grade: String,
    pub remark: String,
}

impl Default for FooterLabels {
    fn default() -> Self {
        Self {
            grade: "GRADE:".to_string(),
            remark: "REMARK:".to_string(),
        }
    }
}

/// 工作表中的一行题目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem {
    /// 编号前缀，例如 `3. `；Speaking III 为空
    pub label: String,
    pub text: String,
    /// Unscramble 题目下方的答题横线
    pub answer_rule: Option<String>,
}

impl RenderedItem {
    pub fn display(&self) -> String {
        format!("{}{}", self.label, self.text)
    }
}

/// 一次生成的工作表内容，排版完成后即丢弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetDocument {
    pub title: String,
    pub subtitle: String,
    pub sections: BTreeMap<Section, Vec<RenderedItem>>,
    pub footer: FooterLabels,
}

impl WorksheetDocument {
    /// `scrambles` 与 Unscramble 部分的题目一一对应
    pub fn assemble(
        header: &HeaderMeta,
        distribution: &Distribution<'_>,
        scrambles: &[ScrambleDisplay],
    ) -> Self {
        let mut sections = BTreeMap::new();

        for section in [Section::SpeakingI, Section::SpeakingII] {
            let items = distribution
                .section(section)
                .iter()
                .map(|d| RenderedItem {
                    label: format!("{}. ", d.number),
                    text: d.item.prompt.clone(),
                    answer_rule: None,
                })
                .collect();
            sections.insert(section, items);
        }

        let speaking_three = header
            .pattern_numbers
            .iter()
            .map(|n| RenderedItem {
                label: String::new(),
                text: format!("Pattern {}", n),
                answer_rule: None,
            })
            .collect();
        sections.insert(Section::SpeakingIII, speaking_three);

        debug_assert_eq!(distribution.section(Section::Unscramble).len(), scrambles.len());
        let unscramble = distribution
            .section(Section::Unscramble)
            .iter()
            .zip(scrambles)
            .map(|(d, scramble)| {
                let text = if d.item.prompt.is_empty() {
                    scramble.tokens_line.clone()
                } else {
                    format!("{} ({})", d.item.prompt, scramble.tokens_line)
                };
                RenderedItem {
                    label: format!("{}. ", d.number),
                    text,
                    answer_rule: Some(scramble.answer_rule.clone()),
                }
            })
            .collect();
        sections.insert(Section::Unscramble, unscramble);

        Self {
            title: header.title.clone(),
            subtitle: header.subtitle(),
            sections,
            footer: FooterLabels::default(),
        }
    }

    pub fn section(&self, section: Section) -> &[RenderedItem] {
        self.sections
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
