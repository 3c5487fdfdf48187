//! 单个请求处理器 - 编排层
//!
//! ## 核心功能
//!
//! 1. **构建上下文**：请求序号 + 句型列表
//! 2. **阻塞执行**：排版是纯 CPU 计算，放入 `spawn_blocking`
//! 3. **写出文件**：按请求或默认规则命名

use crate::models::{ValidatedIndex, WorksheetRequest};
use crate::workflow::{WorksheetCtx, WorksheetFlow};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// 处理单个生成请求，返回写出的文件路径
///
/// # 参数
/// - `flow`: 共享的生成流程（持有字体）
/// - `index`: 本次运行使用的索引快照
/// - `request`: 生成请求
/// - `request_index`: 请求序号（用于日志和默认文件名）
/// - `output_folder`: 输出目录（需已存在）
/// - `stamp`: 本次运行的时间戳，形如 `1017_093000`
pub async fn process_request(
    flow: Arc<WorksheetFlow>,
    index: Arc<ValidatedIndex>,
    request: WorksheetRequest,
    request_index: usize,
    output_folder: &Path,
    stamp: &str,
) -> Result<PathBuf> {
    let ctx = WorksheetCtx::new(request_index, request.patterns.clone());
    let patterns = request.patterns.clone();

    let bytes = tokio::task::spawn_blocking(move || flow.run(&index, &patterns, &ctx))
        .await
        .context("生成任务异常退出")??;

    let path = output_folder.join(output_file_name(&request, request_index, stamp));
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("无法写入文件: {}", path.display()))?;

    info!("[工作表 {}] 💾 已保存: {}", request_index, path.display());
    Ok(path)
}

/// 输出文件名
///
/// 请求给出的文件名只保留最后一段并补全 `.pdf`；
/// 否则为 `Worksheet_<MMDD_HHMMSS>_<nn>.pdf`
pub fn output_file_name(request: &WorksheetRequest, request_index: usize, stamp: &str) -> String {
    let custom = request
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name.trim()).file_name())
        .map(|name| name.to_string_lossy().to_string());

    match custom {
        Some(name) if name.to_lowercase().ends_with(".pdf") => name,
        Some(name) => format!("{}.pdf", name),
        None => format!("Worksheet_{}_{:02}.pdf", stamp, request_index),
    }
}
