//! 类别编排流程 - 流程层
//!
//! 核心职责：定义一次 (角色, 系数) 生成任务的完整流程
//!
//! 流程顺序：
//! 1. 机会主义地发一次覆盖全部类别的合并请求
//! 2. 合并请求整体失败时，一次性降级为逐类别请求（不反复重试）
//! 3. 每个响应交给解析级联归一化，逐条标注元数据
//! 4. 汇总类别 → 记录列表映射与成败小结
//!
//! 单个类别的请求或解析失败只产出该类别的空列表并记入小结，
//! 绝不拖垮兄弟类别。

use std::collections::BTreeMap;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::category::Category;
use crate::models::question::{
    CategorySummary, GeneratedQuestion, QuestionRecord, RoleGenerationResult,
};
use crate::parsing::{self, ParseOutcome};
use crate::services::prompt::{PromptBuilder, PromptOptions};
use crate::services::LlmService;
use crate::utils::logging::truncate_text;
use crate::workflow::generation_ctx::GenerationCtx;

/// 单个类别的生成请求
#[derive(Debug, Clone, Copy)]
pub struct CategoryRequest {
    pub category: Category,
    pub count: u32,
}

/// 类别编排流程
///
/// - 编排完整的生成流程（合并请求 → 降级 → 解析 → 标注）
/// - 不持有任何输出资源（文件落盘由上层服务负责）
/// - 只依赖业务能力（services）与解析核心（parsing）
#[derive(Clone)]
pub struct GenerationFlow {
    llm: LlmService,
    prompts: PromptBuilder,
    verbose_logging: bool,
}

impl GenerationFlow {
    pub fn new(config: &Config) -> Self {
        Self::with_prompt_options(config, PromptOptions::default())
    }

    /// 使用自定义模板配置创建
    pub fn with_prompt_options(config: &Config, options: PromptOptions) -> Self {
        Self {
            llm: LlmService::new(config),
            prompts: PromptBuilder::new(options),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 详细模式下输出原始响应预览
    fn log_raw_preview(&self, ctx: &GenerationCtx, raw: &str) {
        if self.verbose_logging {
            debug!(
                "[{} {}x] 原始响应预览: {}",
                ctx.role_code,
                ctx.salary_coefficient,
                truncate_text(raw, 200)
            );
        }
    }

    /// 为一个 (角色, 系数) 任务生成全部类别的题目
    pub async fn generate_for_role(
        &self,
        ctx: &GenerationCtx,
        requests: &[CategoryRequest],
    ) -> RoleGenerationResult {
        let total_requested: u32 = requests.iter().map(|r| r.count).sum();
        info!(
            "[{} {}x] 🚀 开始生成，共请求 {} 道题，{} 个类别",
            ctx.role_code,
            ctx.salary_coefficient,
            total_requested,
            requests.iter().filter(|r| r.count > 0).count()
        );

        let result = if total_requested == 0 {
            // 全部类别都是零请求：不触发任何网络调用
            self.assemble(ctx, requests.iter().map(|r| (r.category, r.count, Ok(Vec::new()))))
        } else {
            match self.try_combined(ctx, requests).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(
                        "[{} {}x] ⚠️ 合并请求失败，一次性降级为逐类别请求: {}",
                        ctx.role_code, ctx.salary_coefficient, e
                    );
                    self.generate_per_category(ctx, requests).await
                }
            }
        };

        log_generation_summary(ctx, &result);
        result
    }

    /// 合并路径：一次请求覆盖全部类别
    ///
    /// 传输失败或响应整体零产出都算合并路径失败，交由调用方降级。
    async fn try_combined(
        &self,
        ctx: &GenerationCtx,
        requests: &[CategoryRequest],
    ) -> Result<RoleGenerationResult> {
        let active: Vec<(Category, u32)> = requests
            .iter()
            .filter(|r| r.count > 0)
            .map(|r| (r.category, r.count))
            .collect();

        let prompt = self.prompts.combined_prompt(&ctx.prompt_context(), &active);
        let system = self.prompts.system_message();
        let raw = self.llm.send(&prompt, Some(system.as_str())).await?;
        self.log_raw_preview(ctx, &raw);

        let codes: Vec<&str> = active.iter().map(|(category, _)| category.code()).collect();
        let mut parsed = parsing::parse_combined(&raw, &codes);
        log_parse_warnings(ctx, "合并响应", &parsed.warnings);

        if parsed.total_records() == 0 {
            anyhow::bail!("合并响应未产出任何记录");
        }

        info!(
            "[{} {}x] ✓ 合并请求成功，解析出 {} 道题",
            ctx.role_code,
            ctx.salary_coefficient,
            parsed.total_records()
        );

        Ok(self.assemble(
            ctx,
            requests.iter().map(|r| {
                let records = parsed
                    .per_category
                    .remove(r.category.code())
                    .unwrap_or_default();
                if r.count > 0 && records.is_empty() {
                    (r.category, r.count, Err("合并响应中该类别为空".to_string()))
                } else {
                    (r.category, r.count, Ok(records))
                }
            }),
        ))
    }

    /// 逐类别路径：每个类别一次独立请求
    async fn generate_per_category(
        &self,
        ctx: &GenerationCtx,
        requests: &[CategoryRequest],
    ) -> RoleGenerationResult {
        let mut outcomes: Vec<(Category, u32, Result<Vec<QuestionRecord>, String>)> = Vec::new();

        for request in requests {
            if request.count == 0 {
                outcomes.push((request.category, 0, Ok(Vec::new())));
                continue;
            }

            info!(
                "[{} {}x] 📝 {} 生成 {} 道题...",
                ctx.role_code,
                ctx.salary_coefficient,
                request.category.name(),
                request.count
            );

            let prompt =
                self.prompts
                    .batch_prompt(&ctx.prompt_context(), request.category, request.count);

            let system = self.prompts.system_message();
            let raw = match self.llm.send(&prompt, Some(system.as_str())).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        "[{} {}x] ❌ {} 请求失败: {}",
                        ctx.role_code,
                        ctx.salary_coefficient,
                        request.category.name(),
                        e
                    );
                    outcomes.push((request.category, request.count, Err(e.to_string())));
                    continue;
                }
            };

            self.log_raw_preview(ctx, &raw);
            let report = parsing::parse_batch(&raw);
            log_parse_warnings(ctx, request.category.name(), &report.warnings);

            match report.outcome {
                ParseOutcome::Success { records, strategy } => {
                    info!(
                        "[{} {}x] ✓ {} 解析成功（{}）: {} 道题",
                        ctx.role_code,
                        ctx.salary_coefficient,
                        request.category.name(),
                        strategy.name(),
                        records.len()
                    );
                    outcomes.push((request.category, request.count, Ok(records)));
                }
                ParseOutcome::Failure { reason } => {
                    warn!(
                        "[{} {}x] ❌ {} 解析失败: {}",
                        ctx.role_code,
                        ctx.salary_coefficient,
                        request.category.name(),
                        reason
                    );
                    outcomes.push((request.category, request.count, Err(reason.to_string())));
                }
            }
        }

        self.assemble(ctx, outcomes.into_iter())
    }

    /// 汇总：标注元数据、挂映射、生成类别小结
    ///
    /// 记录顺序保持各响应数组中的原始顺序；数量为零的类别
    /// 以显式空列表出现在映射里。
    fn assemble(
        &self,
        ctx: &GenerationCtx,
        outcomes: impl Iterator<Item = (Category, u32, Result<Vec<QuestionRecord>, String>)>,
    ) -> RoleGenerationResult {
        let distribution_map = ctx.distribution.as_map();
        let mut questions: BTreeMap<String, Vec<GeneratedQuestion>> = BTreeMap::new();
        let mut summaries = Vec::new();

        for (category, requested, outcome) in outcomes {
            match outcome {
                Ok(records) => {
                    let annotated: Vec<GeneratedQuestion> = records
                        .into_iter()
                        .map(|record| {
                            GeneratedQuestion::from_record(
                                record,
                                category.code(),
                                &ctx.role_name,
                                ctx.salary_coefficient,
                                &distribution_map,
                            )
                        })
                        .collect();
                    summaries.push(CategorySummary {
                        category: category.code().to_string(),
                        requested,
                        produced: annotated.len(),
                        succeeded: requested == 0 || !annotated.is_empty(),
                        detail: None,
                    });
                    questions.insert(category.code().to_string(), annotated);
                }
                Err(detail) => {
                    summaries.push(CategorySummary {
                        category: category.code().to_string(),
                        requested,
                        produced: 0,
                        succeeded: false,
                        detail: Some(detail),
                    });
                    questions.insert(category.code().to_string(), Vec::new());
                }
            }
        }

        let total_questions = questions.values().map(Vec::len).sum();

        RoleGenerationResult {
            role: ctx.role_name.clone(),
            role_code: ctx.role_code.clone(),
            salary_coefficient: ctx.salary_coefficient,
            difficulty_distribution: distribution_map,
            questions,
            total_questions,
            category_summaries: summaries,
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_parse_warnings(ctx: &GenerationCtx, scope: &str, warnings: &[String]) {
    for warning in warnings {
        warn!(
            "[{} {}x] ⚠️ {} 解析告警: {}",
            ctx.role_code, ctx.salary_coefficient, scope, warning
        );
    }
}

fn log_generation_summary(ctx: &GenerationCtx, result: &RoleGenerationResult) {
    info!(
        "[{} {}x] 📊 生成完成: 共 {} 道题",
        ctx.role_code, ctx.salary_coefficient, result.total_questions
    );
    for summary in &result.category_summaries {
        if summary.succeeded {
            info!(
                "[{} {}x]   ✅ {}: {}/{} 道",
                ctx.role_code,
                ctx.salary_coefficient,
                summary.category,
                summary.produced,
                summary.requested
            );
        } else {
            warn!(
                "[{} {}x]   ❌ {}: 0/{} 道 ({})",
                ctx.role_code,
                ctx.salary_coefficient,
                summary.category,
                summary.requested,
                summary.detail.as_deref().unwrap_or("未知原因")
            );
        }
    }
}
