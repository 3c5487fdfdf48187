//! 分页策略
//!
//! - 下一行放不下时另起一页
//! - `keep_with_next` 的行与其后的行作为整体判断（部分标题不会孤零零留在页尾）
//! - 页首的空白行直接丢弃

use crate::layout::composer::LayoutLine;

/// 浮点累加误差
const EPSILON: f32 = 0.01;

/// 页内已定位的行，`top` 为距内容区顶部的距离
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub top: f32,
    pub line: LayoutLine,
}

pub fn paginate(lines: Vec<LayoutLine>, content_height: f32) -> Vec<Vec<PlacedLine>> {
    let groups = group_heights(&lines);

    let mut pages = Vec::new();
    let mut current: Vec<PlacedLine> = Vec::new();
    let mut cursor = 0.0_f32;

    for (line, group) in lines.into_iter().zip(groups) {
        let height = line.height();

        if line.is_spacer() {
            if current.is_empty() {
                continue;
            }
            if cursor + height > content_height + EPSILON {
                pages.push(std::mem::take(&mut current));
                cursor = 0.0;
            } else {
                cursor += height;
            }
            continue;
        }

        if !current.is_empty() && cursor + group > content_height + EPSILON {
            pages.push(std::mem::take(&mut current));
            cursor = 0.0;
        }

        current.push(PlacedLine { top: cursor, line });
        cursor += height;
    }

    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

/// 每行与必须同页的后续行的总高度（中间的空白行计入，末尾的不计）
fn group_heights(lines: &[LayoutLine]) -> Vec<f32> {
    (0..lines.len())
        .map(|start| {
            let mut total = lines[start].height();
            if !lines[start].keep_with_next {
                return total;
            }
            let mut pending_spacing = 0.0;
            for line in &lines[start + 1..] {
                if line.is_spacer() {
                    pending_spacing += line.height();
                    continue;
                }
                total += pending_spacing + line.height();
                pending_spacing = 0.0;
                if !line.keep_with_next {
                    break;
                }
            }
            total
        })
        .collect()
}
