use crate::error::{AppResult, MalformedScrambleError};
use crate::models::PatternItem;

/// 乱序单词之间的分隔符
pub const SCRAMBLE_SEPARATOR: &str = " / ";

/// 答题横线的长度（下划线个数）
pub const ANSWER_RULE_LENGTH: usize = 85;

/// Unscramble 题目的显示内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrambleDisplay {
    /// 按原顺序拼接的单词，例如 `My / is / name / Jade`
    pub tokens_line: String,
    /// 单词下方的答题横线
    pub answer_rule: String,
}

/// 格式化乱序单词，单词顺序以输入为准，不做任何重排
pub fn format_scramble(item: &PatternItem) -> AppResult<ScrambleDisplay> {
    if item.scrambled_tokens.is_empty() {
        return Err(MalformedScrambleError {
            pattern_number: item.pattern_number,
            question_index: item.question_index,
        }
        .into());
    }

    Ok(ScrambleDisplay {
        tokens_line: item.scrambled_tokens.join(SCRAMBLE_SEPARATOR),
        answer_rule: answer_rule(),
    })
}

pub fn answer_rule() -> String {
    "_".repeat(ANSWER_RULE_LENGTH)
}
