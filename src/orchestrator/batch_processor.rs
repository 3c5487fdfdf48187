//! 批量工作表处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源加载和批量请求的调度。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：日志文件、字体、数据库索引
//! 2. **请求加载**：请求文件或 `PATTERNS` 环境变量
//! 3. **并发控制**：使用 Semaphore 限制同时生成的数量
//! 4. **索引替换**：重新加载数据库时替换索引，进行中的请求继续使用旧快照
//! 5. **全局统计**：汇总所有请求的生成结果

use crate::config::Config;
use crate::layout::FontResource;
use crate::models::{self, ValidatedIndex, WorksheetRequest};
use crate::orchestrator::request_processor;
use crate::services::load_database;
use crate::utils::logging;
use crate::workflow::WorksheetFlow;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{RwLock, Semaphore};
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: Arc<WorksheetFlow>,
    index: RwLock<Arc<ValidatedIndex>>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(config.max_concurrent_worksheets);

        let font = load_font(Path::new(&config.font_path)).await.map(Arc::new);
        let flow = WorksheetFlow::new(font).with_verbose_logging(config.verbose_logging);

        let index = load_index(Path::new(&config.database_path)).await?;
        logging::log_catalog(&index.catalog());

        Ok(Self {
            config,
            flow: Arc::new(flow),
            index: RwLock::new(Arc::new(index)),
        })
    }

    /// 重新加载数据库并替换当前索引
    ///
    /// 加载失败时保留原索引
    pub async fn reload_database(&self) -> Result<Arc<ValidatedIndex>> {
        let index = Arc::new(load_index(Path::new(&self.config.database_path)).await?);
        *self.index.write().await = Arc::clone(&index);
        info!("🔄 数据库已重新加载，共 {} 个句型", index.pattern_count());
        Ok(index)
    }

    /// 当前索引快照
    pub async fn current_index(&self) -> Arc<ValidatedIndex> {
        Arc::clone(&*self.index.read().await)
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let requests = self.load_requests().await?;

        if requests.is_empty() {
            warn!("⚠️ 没有待生成的工作表（请设置 PATTERNS 或 REQUESTS_FILE），程序结束");
            return Ok(());
        }

        logging::log_requests_loaded(requests.len(), self.config.max_concurrent_worksheets);

        let stats = self.process_all(requests).await?;

        logging::print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(())
    }

    /// 加载生成请求：请求文件优先，其次 PATTERNS
    async fn load_requests(&self) -> Result<Vec<WorksheetRequest>> {
        if let Some(file) = &self.config.requests_file {
            info!("\n📁 正在读取请求文件: {}", file);
            return models::load_requests_file(Path::new(file)).await;
        }

        match &self.config.patterns {
            Some(patterns) => {
                let patterns = models::parse_pattern_list(patterns)?;
                Ok(vec![WorksheetRequest::new(patterns)])
            }
            None => Ok(Vec::new()),
        }
    }

    /// 并发生成所有工作表
    async fn process_all(&self, requests: Vec<WorksheetRequest>) -> Result<ProcessingStats> {
        let output_folder = PathBuf::from(&self.config.output_folder);
        tokio::fs::create_dir_all(&output_folder)
            .await
            .with_context(|| format!("无法创建输出目录: {}", output_folder.display()))?;

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_worksheets));
        let stamp = chrono::Local::now().format("%m%d_%H%M%S").to_string();
        let index = self.current_index().await;

        let mut handles = Vec::with_capacity(requests.len());
        for (idx, request) in requests.into_iter().enumerate() {
            let request_index = idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let flow = Arc::clone(&self.flow);
            let index = Arc::clone(&index);
            let output_folder = output_folder.clone();
            let stamp = stamp.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let result = request_processor::process_request(
                    flow,
                    index,
                    request,
                    request_index,
                    &output_folder,
                    &stamp,
                )
                .await;
                if let Err(e) = &result {
                    error!("[工作表 {}] ❌ 生成失败: {:#}", request_index, e);
                }
                (request_index, result)
            }));
        }

        let mut stats = ProcessingStats {
            total: handles.len(),
            ..Default::default()
        };

        for joined in futures::future::join_all(handles).await {
            match joined {
                Ok((_, Ok(_))) => stats.success += 1,
                Ok((_, Err(_))) => stats.failed += 1,
                Err(e) => {
                    error!("任务执行失败: {}", e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    success: usize,
    failed: usize,
    total: usize,
}

/// 加载并校验数据库
async fn load_index(path: &Path) -> Result<ValidatedIndex> {
    let workbook = models::load_workbook_file(path).await?;
    let index = load_database(&workbook)
        .with_context(|| format!("数据库校验失败: {}", path.display()))?;
    Ok(index)
}

/// 加载嵌入字体；不可用时只能生成拉丁字符内容
async fn load_font(path: &Path) -> Option<FontResource> {
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) => {
            warn!(
                "⚠️ 无法读取字体 {}: {}，仅支持拉丁字符内容",
                path.display(),
                e
            );
            return None;
        }
    };

    match FontResource::from_file_bytes(path, data) {
        Ok(font) => {
            info!("🔤 已加载字体: {}", font.name());
            Some(font)
        }
        Err(e) => {
            warn!("⚠️ {}，仅支持拉丁字符内容", e);
            None
        }
    }
}
