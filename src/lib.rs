//! # Interview Question Gen
//!
//! 面向技术岗位招录的 AI 面试题库生成系统
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 解析核心（Parsing）
//! - `parsing/` - 响应归一化级联，系统里唯一的算法密集区
//! - `repair` - 纯文本修复（括号补全、转义归一、围栏剥离）
//! - `extractor` - 单条记录抽取（含嵌套载荷恢复）
//! - `batch` - 四级策略级联的批量解析器
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程
//! - `LlmService` - LLM 调用能力（超时与重试兜底）
//! - `PromptBuilder` - 单一参数化提示词模板
//! - `SnapshotWriter` / `DocumentExporter` - 落盘能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义一次 (角色, 系数) 任务的完整流程
//! - `GenerationCtx` - 上下文封装（角色 + 系数 + 分布）
//! - `GenerationFlow` - 流程编排（合并请求 → 降级 → 解析 → 标注）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_generator` - 批量任务调度器，管理并发与统计
//!
//! ## 模块结构

pub mod cli;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod parsing;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::question::{QuestionRecord, RoleGenerationResult};
pub use orchestrator::{BatchGenerator, BatchStats, GenerationTask};
pub use parsing::{parse_batch, ParseOutcome, ParseReport};
pub use workflow::{CategoryRequest, GenerationCtx, GenerationFlow};
