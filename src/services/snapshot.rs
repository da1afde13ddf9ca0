//! 生成结果 JSON 快照 - 业务能力层
//!
//! 只负责"把一次生成结果落成 JSON 文件"能力，不关心流程。
//! 快照字段名是对外契约：`role` / `salary_coefficient` / `questions` /
//! `total_questions`，其中 questions 是类别代码到
//! `{question, expected_answer}` 列表的映射。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::info;

use crate::models::question::RoleGenerationResult;

/// 快照写入服务
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    output_dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 快照文件名：`<角色代码>_<系数>x_questions.json`
    pub fn snapshot_path(&self, result: &RoleGenerationResult) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}x_questions.json",
            result.role_code, result.salary_coefficient
        ))
    }

    /// 组装快照 JSON（纯函数，便于单测校验字段契约）
    pub fn render(result: &RoleGenerationResult) -> Value {
        let questions: serde_json::Map<String, Value> = result
            .questions
            .iter()
            .map(|(category, records)| {
                let list: Vec<Value> = records
                    .iter()
                    .map(|record| {
                        json!({
                            "question": record.question,
                            "expected_answer": record.expected_answer,
                        })
                    })
                    .collect();
                (category.clone(), Value::Array(list))
            })
            .collect();

        json!({
            "role": result.role,
            "salary_coefficient": result.salary_coefficient,
            "questions": questions,
            "total_questions": result.total_questions,
        })
    }

    /// 写入快照文件，按需创建父目录
    pub async fn write(&self, result: &RoleGenerationResult) -> Result<PathBuf> {
        let path = self.snapshot_path(result);
        let payload = serde_json::to_string_pretty(&Self::render(result))?;

        write_with_parents(&path, &payload).await?;

        info!(
            "💾 快照已保存: {} ({} 道题)",
            path.display(),
            result.total_questions
        );
        Ok(path)
    }
}

/// 创建父目录后写文件
pub async fn write_with_parents(path: &Path, payload: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("无法创建输出目录: {}", parent.display()))?;
    }
    tokio::fs::write(path, payload)
        .await
        .with_context(|| format!("无法写入文件: {}", path.display()))?;
    Ok(())
}
