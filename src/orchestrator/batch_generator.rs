//! 批量生成编排器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量生成任务的调度与资源管理。
//!
//! ## 核心功能
//!
//! 1. **单任务生成**：一个 (角色, 系数) 任务的完整闭环（校验 → 生成 → 快照 → 导出）
//! 2. **全档位生成**：一个角色的全部薪酬档位依次生成
//! 3. **并发控制**：使用 Semaphore 限制并行任务数量
//! 4. **分批处理**：任务分批次执行，每批完成后再开始下一批
//! 5. **任务文件**：从 TOML 配置文件展开批量任务，启动前整体校验
//! 6. **全局统计**：汇总所有任务的成败与产出数量
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个类别的细节，向下委托 GenerationFlow
//! - **失败隔离**：任务之间互不影响，部分失败如实上报而非掩盖
//! - **配置先行**：未知角色、不支持的系数在任何任务启动前就报错退出

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppError, ConfigError, FileError};
use crate::models::category::Category;
use crate::models::question::RoleGenerationResult;
use crate::models::role::{get_role_profile, validate_role};
use crate::models::rubric::split_across_categories;
use crate::services::{DocumentExporter, SnapshotWriter};
use crate::workflow::{CategoryRequest, GenerationCtx, GenerationFlow};

/// 一个待执行的生成任务
#[derive(Debug, Clone)]
pub struct GenerationTask {
    pub role_code: String,
    pub salary_coefficient: u8,
    pub total_count: u32,
}

/// 批量处理统计
#[derive(Debug, Default)]
pub struct BatchStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
    pub total_questions: usize,
}

/// 批量生成编排器
#[derive(Clone)]
pub struct BatchGenerator {
    config: Config,
    flow: GenerationFlow,
    snapshots: SnapshotWriter,
    exporter: DocumentExporter,
}

impl BatchGenerator {
    /// 初始化编排器；API 密钥缺失等配置问题在这里就报错
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let flow = GenerationFlow::new(&config);
        let snapshots = SnapshotWriter::new(&config.output_dir);
        let exporter = DocumentExporter::new(&config.output_dir);

        Ok(Self {
            config,
            flow,
            snapshots,
            exporter,
        })
    }

    /// 为一个 (角色, 系数) 任务生成题目并落盘
    ///
    /// 配置错误（未知角色、不支持的系数）立刻返回错误；
    /// 类别级的请求/解析失败不算错误，体现在结果的小结里。
    /// 文档导出失败只记日志，不撤回已写出的 JSON 快照。
    pub async fn generate_one(
        &self,
        role_code: &str,
        salary_coefficient: u8,
        total_count: u32,
        job_file: Option<&str>,
        export_doc: bool,
    ) -> Result<RoleGenerationResult> {
        let profile = validate_role(role_code, salary_coefficient)?;

        let job_context = self.load_job_context(role_code, profile.name, job_file).await;

        // 总数按 1:2:2 切到三个类别
        let counts = split_across_categories(total_count);
        let requests: Vec<CategoryRequest> = Category::all()
            .iter()
            .zip(counts.iter())
            .map(|(category, count)| CategoryRequest {
                category: *category,
                count: *count,
            })
            .collect();

        let ctx = GenerationCtx::new(role_code, profile, salary_coefficient, job_context);
        let result = self.flow.generate_for_role(&ctx, &requests).await;

        self.snapshots.write(&result).await?;

        if export_doc {
            if let Err(e) = self.exporter.export(&result).await {
                error!(
                    "[{} {}x] 📄 文档导出失败（快照不受影响）: {}",
                    role_code, salary_coefficient, e
                );
            }
        }

        Ok(result)
    }

    /// 一个角色的全部薪酬档位依次生成
    pub async fn generate_all_difficulties(
        &self,
        role_code: &str,
        total_count: u32,
        job_file: Option<&str>,
        export_doc: bool,
    ) -> Result<Vec<RoleGenerationResult>> {
        let profile = get_role_profile(role_code)?;
        info!(
            "🎯 {} 共 {} 个薪酬档位待生成",
            profile.name,
            profile.salary_multipliers.len()
        );

        let mut results = Vec::new();
        for coefficient in profile.salary_multipliers {
            match self
                .generate_one(role_code, *coefficient, total_count, job_file, export_doc)
                .await
            {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!("[{} {}x] ❌ 档位生成失败: {}", role_code, coefficient, e);
                }
            }
        }

        if results.is_empty() {
            anyhow::bail!("角色 {} 的所有档位均生成失败", role_code);
        }
        Ok(results)
    }

    /// 并行执行一组独立任务
    ///
    /// 启动前整体校验所有任务的角色与系数组合（配置错误致命）；
    /// 运行期的任务失败互不影响，最终以统计形式如实上报。
    pub async fn generate_many(
        &self,
        tasks: Vec<GenerationTask>,
        export_doc: bool,
        max_concurrent: Option<usize>,
    ) -> Result<BatchStats> {
        // 配置先行：任何任务启动前校验全部组合
        for task in &tasks {
            validate_role(&task.role_code, task.salary_coefficient)?;
        }

        let max_concurrent = max_concurrent
            .unwrap_or(self.config.max_concurrent_tasks)
            .max(1);
        let total_tasks = tasks.len();
        log_startup(total_tasks, max_concurrent);

        let semaphore = Arc::new(Semaphore::new(max_concurrent));
        let mut stats = BatchStats {
            total: total_tasks,
            ..Default::default()
        };

        // 分批处理
        for batch_start in (0..total_tasks).step_by(max_concurrent) {
            let batch_end = (batch_start + max_concurrent).min(total_tasks);
            let batch_tasks = &tasks[batch_start..batch_end];
            let batch_num = batch_start / max_concurrent + 1;
            let total_batches = (total_tasks + max_concurrent - 1) / max_concurrent;

            log_batch_start(batch_num, total_batches, batch_start + 1, batch_end, total_tasks);

            let mut batch_handles = Vec::new();
            for task in batch_tasks {
                let permit = semaphore.clone().acquire_owned().await?;
                let generator = self.clone();
                let role_code = task.role_code.clone();
                let coefficient = task.salary_coefficient;
                let task = task.clone();

                let handle = tokio::spawn(async move {
                    let _permit = permit;
                    generator
                        .generate_one(
                            &task.role_code,
                            task.salary_coefficient,
                            task.total_count,
                            None,
                            export_doc,
                        )
                        .await
                });
                batch_handles.push((role_code, coefficient, handle));
            }

            // 等待本批所有任务完成
            let mut batch_success = 0usize;
            for (role_code, coefficient, handle) in batch_handles {
                match handle.await {
                    Ok(Ok(result)) => {
                        stats.success += 1;
                        stats.total_questions += result.total_questions;
                        batch_success += 1;
                        if !result.all_categories_succeeded() {
                            warn!(
                                "[{} {}x] ⚠️ 部分类别失败: {:?}",
                                role_code,
                                coefficient,
                                result
                                    .failed_categories()
                                    .iter()
                                    .map(|s| s.category.as_str())
                                    .collect::<Vec<_>>()
                            );
                        }
                    }
                    Ok(Err(e)) => {
                        error!("[{} {}x] ❌ 任务失败: {}", role_code, coefficient, e);
                        stats.failed += 1;
                    }
                    Err(e) => {
                        error!("[{} {}x] 任务执行失败: {}", role_code, coefficient, e);
                        stats.failed += 1;
                    }
                }
            }

            log_batch_complete(batch_num, batch_success, batch_end - batch_start);
        }

        print_final_stats(&stats);
        Ok(stats)
    }

    /// 从 TOML 任务配置文件展开并执行批量生成
    pub async fn generate_from_task_file(&self, path: &str, export_doc: bool) -> Result<BatchStats> {
        let task_file = load_task_file(path).await?;

        let mut tasks = Vec::new();
        for entry in &task_file.roles {
            let profile = get_role_profile(&entry.role_code)?;
            let coefficients = entry
                .salary_coefficients
                .clone()
                .unwrap_or_else(|| profile.salary_multipliers.to_vec());
            let count = entry
                .question_count
                .or(task_file.default_question_count)
                .unwrap_or(15);

            for coefficient in coefficients {
                tasks.push(GenerationTask {
                    role_code: entry.role_code.clone(),
                    salary_coefficient: coefficient,
                    total_count: count,
                });
            }
        }

        info!("📋 任务文件 {} 展开为 {} 个生成任务", path, tasks.len());
        self.generate_many(tasks, export_doc, task_file.max_concurrent)
            .await
    }

    /// 加载岗位描述文本；缺失时降级为默认描述并告警
    async fn load_job_context(
        &self,
        role_code: &str,
        role_name: &str,
        job_file: Option<&str>,
    ) -> String {
        let path = match job_file {
            Some(path) => path.to_string(),
            None => format!("{}/{}.txt", self.config.job_context_dir, role_code),
        };

        match tokio::fs::read_to_string(&path).await {
            Ok(content) if !content.trim().is_empty() => {
                info!("📁 岗位描述已加载: {}", path);
                content.trim().to_string()
            }
            Ok(_) => {
                warn!("⚠️ 岗位描述文件为空: {}，使用默认描述", path);
                format!("{} 岗位招录面试", role_name)
            }
            Err(e) => {
                warn!("⚠️ 岗位描述文件不可用 ({}): {}，使用默认描述", path, e);
                format!("{} 岗位招录面试", role_name)
            }
        }
    }
}

/// TOML 任务配置文件
#[derive(Debug, Deserialize)]
struct TaskFile {
    /// 并发上限（缺省沿用全局配置）
    max_concurrent: Option<usize>,
    /// 各角色的默认题目总数
    default_question_count: Option<u32>,
    roles: Vec<TaskFileRole>,
}

#[derive(Debug, Deserialize)]
struct TaskFileRole {
    role_code: String,
    question_count: Option<u32>,
    /// 缺省使用角色档案开放的全部档位
    salary_coefficients: Option<Vec<u8>>,
}

/// 读取并校验任务配置文件
async fn load_task_file(path: &str) -> Result<TaskFile> {
    if !Path::new(path).exists() {
        return Err(AppError::File(FileError::NotFound {
            path: path.to_string(),
        })
        .into());
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取任务配置文件: {}", path))?;

    let task_file: TaskFile =
        toml::from_str(&content).with_context(|| format!("无法解析任务配置文件: {}", path))?;

    if task_file.roles.is_empty() {
        return Err(AppError::Config(ConfigError::InvalidTaskFile {
            path: path.to_string(),
            detail: "roles 列表为空".to_string(),
        })
        .into());
    }

    Ok(task_file)
}

// ========== 日志辅助函数 ==========

fn log_startup(total: usize, max_concurrent: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 批量生成启动 - 并行任务模式");
    info!("📊 任务总数: {}，最大并发: {}", total, max_concurrent);
    info!("{}", "=".repeat(60));
}

fn log_batch_start(batch_num: usize, total_batches: usize, start: usize, end: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批任务: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

fn log_batch_complete(batch_num: usize, success: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 成功 {}/{}", batch_num, success, total);
    info!("{}", "─".repeat(60));
}

fn print_final_stats(stats: &BatchStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部任务完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.success, stats.total);
    info!("❌ 失败: {}", stats.failed);
    info!("📝 累计产出: {} 道题", stats.total_questions);
    info!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_task_file_rejects_missing_path() {
        let err = load_task_file("no/such/tasks.toml").await.unwrap_err();
        assert!(err.to_string().contains("文件不存在"));
    }

    #[tokio::test]
    async fn test_load_task_file_parses_entries() {
        let dir = std::env::temp_dir().join("iqg_task_file_test");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("tasks.toml");
        tokio::fs::write(
            &path,
            r#"
max_concurrent = 2
default_question_count = 10

[[roles]]
role_code = "devops_engineer"

[[roles]]
role_code = "software_engineer"
question_count = 20
salary_coefficients = [2]
"#,
        )
        .await
        .unwrap();

        let task_file = load_task_file(path.to_str().unwrap()).await.unwrap();
        assert_eq!(task_file.max_concurrent, Some(2));
        assert_eq!(task_file.default_question_count, Some(10));
        assert_eq!(task_file.roles.len(), 2);
        assert_eq!(task_file.roles[1].question_count, Some(20));
    }

    #[tokio::test]
    async fn test_load_task_file_rejects_empty_roles() {
        let dir = std::env::temp_dir().join("iqg_task_file_empty");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("tasks.toml");
        tokio::fs::write(&path, "roles = []\n").await.unwrap();

        let err = load_task_file(path.to_str().unwrap()).await.unwrap_err();
        assert!(err.to_string().contains("roles 列表为空"));
    }
}
