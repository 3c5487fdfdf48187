use serde::{Deserialize, Serialize};

/// 每个句型在每个部分抽取的题目数量
pub const QUOTA: usize = 5;

/// 一次最多可选择的句型数量
pub const MAX_SELECTION: usize = 5;

/// 概览表中没有 Unit 列时使用的级别
pub const DEFAULT_UNIT: &str = "Level A";

/// 工作表的四个固定部分
///
/// 排序即为工作表中的版面顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Section {
    SpeakingI,
    SpeakingII,
    SpeakingIII,
    Unscramble,
}

static SECTION_LABELS: phf::Map<&'static str, Section> = phf::phf_map! {
    "speaking i" => Section::SpeakingI,
    "speaking ii" => Section::SpeakingII,
    "speaking iii" => Section::SpeakingIII,
    "unscramble" => Section::Unscramble,
};

impl Section {
    /// 全部部分，按版面顺序
    pub const ALL: [Section; 4] = [
        Section::SpeakingI,
        Section::SpeakingII,
        Section::SpeakingIII,
        Section::Unscramble,
    ];

    /// 明细表 Section 列中的标准写法
    pub fn label(self) -> &'static str {
        match self {
            Section::SpeakingI => "Speaking I",
            Section::SpeakingII => "Speaking II",
            Section::SpeakingIII => "Speaking III",
            Section::Unscramble => "Unscramble",
        }
    }

    /// 工作表中的部分标题
    pub fn heading(self) -> &'static str {
        match self {
            Section::SpeakingI => "Speaking I - Answer the questions",
            Section::SpeakingII => "Speaking II - Say in English",
            Section::SpeakingIII => "Speaking III - With your teacher",
            Section::Unscramble => "Unscramble",
        }
    }

    /// 从 Section 列解析（忽略大小写和多余空白）
    pub fn from_label(s: &str) -> Option<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        SECTION_LABELS.get(normalized.to_lowercase().as_str()).copied()
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 概览表中的一个句型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSummary {
    pub pattern_number: u32,
    pub name: String,
    pub total_items: i64,
    pub unit: String,
}

/// 明细表中的一道题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternItem {
    pub pattern_number: u32,
    pub section: Section,
    pub question_index: i64,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default)]
    pub scrambled_tokens: Vec<String>,
    /// 在明细表中的行号，用于同序号时的稳定排序和报错
    pub source_row: usize,
}

/// 供选择界面展示的句型目录项
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternListing {
    pub number: u32,
    pub name: String,
    pub unit: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_from_label() {
        assert_eq!(Section::from_label("Speaking I"), Some(Section::SpeakingI));
        assert_eq!(Section::from_label(" speaking  iii "), Some(Section::SpeakingIII));
        assert_eq!(Section::from_label("UNSCRAMBLE"), Some(Section::Unscramble));
        assert_eq!(Section::from_label("Speaking IV"), None);
    }

    #[test]
    fn test_section_order_matches_layout() {
        let mut sections = vec![Section::Unscramble, Section::SpeakingII, Section::SpeakingI];
        sections.sort();
        assert_eq!(
            sections,
            vec![Section::SpeakingI, Section::SpeakingII, Section::Unscramble]
        );
    }
}
