//! 业务能力层：每个服务只描述"我能做什么"，不关心流程

pub mod exporter;
pub mod llm_service;
pub mod prompt;
pub mod snapshot;

pub use exporter::DocumentExporter;
pub use llm_service::LlmService;
pub use prompt::{PromptBuilder, PromptContext, PromptOptions, Tone};
pub use snapshot::SnapshotWriter;
