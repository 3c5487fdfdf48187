//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责资源加载和批量调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量工作表处理器
//! - 管理应用生命周期（日志文件、字体、数据库索引）
//! - 加载生成请求（请求文件或 PATTERNS）
//! - 控制并发数量（Semaphore）
//! - 输出全局统计信息
//!
//! ### `request_processor` - 单个请求处理器
//! - 在阻塞线程池中执行 WorksheetFlow
//! - 决定输出文件名并写入 PDF
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<WorksheetRequest>)
//!     ↓
//! request_processor (处理单个 WorksheetRequest)
//!     ↓
//! workflow::WorksheetFlow (选择 → 分配 → 排版)
//!     ↓
//! services / layout
//! ```
//!
//! 索引和字体只在本层加载，向下以 `Arc` 只读共享。

pub mod batch_processor;
pub mod request_processor;

// 重新导出主要类型
pub use batch_processor::App;
pub use request_processor::{output_file_name, process_request};
