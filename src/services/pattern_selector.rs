use crate::error::{AppResult, SelectionError};
use crate::models::{ValidatedIndex, MAX_SELECTION};
use std::collections::HashSet;

/// 一次生成所选的句型，顺序即工作表中的句型顺序
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    patterns: Vec<u32>,
}

impl SelectionSet {
    pub fn patterns(&self) -> &[u32] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// 校验通过的选择不会为空
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// 副标题中的句型列表，例如 `2, 1`
    pub fn describe(&self) -> String {
        self.patterns
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// 校验请求的句型编号并保持调用方给出的顺序
pub fn select_patterns(index: &ValidatedIndex, requested: &[u32]) -> AppResult<SelectionSet> {
    if requested.is_empty() {
        return Err(SelectionError::Empty.into());
    }
    if requested.len() > MAX_SELECTION {
        return Err(SelectionError::TooMany {
            requested: requested.len(),
            max: MAX_SELECTION,
        }
        .into());
    }

    let mut seen = HashSet::with_capacity(requested.len());
    for &pattern_number in requested {
        if !seen.insert(pattern_number) {
            return Err(SelectionError::Duplicate { pattern_number }.into());
        }
        if !index.contains(pattern_number) {
            return Err(SelectionError::UnknownPattern { pattern_number }.into());
        }
    }

    Ok(SelectionSet {
        patterns: requested.to_vec(),
    })
}
