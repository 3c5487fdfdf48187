//! # Pattern Worksheet
//!
//! 根据句型数据库生成可打印的英语句型练习工作表（PDF）
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 数据层（Models）
//! - `models/` - 原始表格、强类型句型记录、只读索引
//! - `loaders` - 从 TOML / JSON 导出文件读取表格和生成请求
//!
//! ### ② 业务能力层（Services / Layout）
//! - `services/` - 描述"我能做什么"，全部为纯函数
//! - `load_database` - 表结构、引用完整性、题量校验
//! - `select_patterns` / `distribute` / `format_scramble`
//! - `layout/` - 组版、分页和 PDF 输出
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张工作表"的完整生成流程
//! - `WorksheetCtx` - 上下文封装（请求序号 + 句型列表）
//! - `WorksheetFlow` - 流程编排（选择 → 分配 → 格式化 → 排版）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 加载资源，管理并发
//! - `orchestrator/request_processor` - 单个请求的执行与落盘
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod test_support;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use layout::{FontResource, LayoutEngine};
pub use models::{RawCell, RawTable, RawWorkbook, Section, ValidatedIndex, WorksheetRequest};
pub use orchestrator::App;
pub use services::{load_database, select_patterns, SelectionSet};
pub use workflow::{generate_worksheet, WorksheetCtx, WorksheetFlow};
