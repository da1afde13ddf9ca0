//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量生成任务的调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! batch_generator (调度 Vec<GenerationTask>)
//!     ↓
//! workflow::GenerationFlow (处理单个 (角色, 系数) 任务)
//!     ↓
//! services (能力层：llm / prompt / snapshot / exporter)
//!     ↓
//! parsing (解析核心：repair / extractor / batch)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：编排层只做调度和统计，不做具体业务判断
//! 2. **失败隔离**：任务互不影响，部分成功如实上报
//! 3. **向下依赖**：编排层 → workflow → services → parsing

pub mod batch_generator;

// 重新导出主要类型
pub use batch_generator::{BatchGenerator, BatchStats, GenerationTask};
