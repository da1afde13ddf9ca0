//! 提示词构建 - 业务能力层
//!
//! 单一参数化模板：语气、是否允许代码、类别格式规则都是模板的
//! 配置项，而不是互相抄改的多份模板副本。输出形状（JSON 数组 +
//! 关键词尾句）在这里约定，解析核心按同一约定做恢复。

use crate::models::category::Category;
use crate::models::rubric::{DistributionTable, RubricLevel};
use crate::parsing::extractor::KEYWORD_MARKER;

/// 提示词语气
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// 正式（机关单位招录的默认语气）
    Formal,
    /// 口语化
    Conversational,
}

/// 模板配置项
#[derive(Debug, Clone, Copy)]
pub struct PromptOptions {
    pub tone: Tone,
    /// 是否允许题目里出现写代码的要求
    pub code_allowed: bool,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            tone: Tone::Formal,
            code_allowed: false,
        }
    }
}

/// 一次生成任务的提示词上下文
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub role_name: &'a str,
    /// 招聘启事原文（岗位背景）
    pub job_context: &'a str,
    /// 岗位特殊条件描述
    pub description: &'a str,
    pub salary_coefficient: u8,
    pub distribution: &'a DistributionTable,
}

/// 提示词构建器
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    options: PromptOptions,
}

impl PromptBuilder {
    pub fn new(options: PromptOptions) -> Self {
        Self { options }
    }

    /// 系统消息：人力资源出题专家的人设与硬性规则
    pub fn system_message(&self) -> String {
        let tone_rule = match self.options.tone {
            Tone::Formal => "所有问题保持正式、严谨的招录语气，符合机关单位的用语规范。",
            Tone::Conversational => "问题可以使用自然的口语表达，但内容必须专业。",
        };
        let code_rule = if self.options.code_allowed {
            "必要时可以要求候选人书写或补全代码。"
        } else {
            "严禁出任何要求写代码的题：不得要求编写代码、算法、脚本、函数或补全代码片段，\
只能要求解释、分析、评述或分享经验。"
        };

        format!(
            "你是一名人力资源领域的技术面试专家，负责为技术岗位招录编制结构化、可评分的面试题。\
每道题都要针对指定岗位、指定类别与指定难度层级。{tone_rule}{code_rule}\
每道题聚焦单一技术主题，主题从岗位特殊条件中选取，不得重复；\
每道题附一段面向评委的\"预期回答\"，以观察者视角说明候选人应展示的知识、技能或思路，\
并在结尾空一行后列出 4-5 个答案要点{KEYWORD_MARKER}。\
全部输出必须严格遵守指定的 JSON 结构。"
        )
    }

    /// 单类别批量出题提示词
    pub fn batch_prompt(&self, ctx: &PromptContext<'_>, category: Category, count: u32) -> String {
        format!(
            r#"招聘启事：{job_context}
岗位：{role_name}
薪酬系数：{coefficient}x
特殊条件：{description}

请为该岗位在"{category_name}"类别（{category_rule}）下编制 {count} 道面试题及预期回答。
重要：{count} 道题必须覆盖互不相同的技术主题，不得围绕同一主题反复出题。

题目难度按 {coefficient}x 档位的层级权重分布：
{distribution_lines}

预期回答以评委视角书写，3-4 句，说明候选人应展示的知识与经验，
结尾空一行后给出 4-5 个{keyword_marker}。

输出格式 - 只返回 JSON 数组，不要任何说明文字、不要 Markdown 围栏：

[
  {{"question": "题目正文", "expected_answer": "预期回答正文\n\n{keyword_marker}：要点一, 要点二, 要点三"}}
]

- 直接以 [ 开头、以 ] 结尾！
- 共 {count} 道题！
- {keyword_marker}写在 expected_answer 字段内部！"#,
            job_context = ctx.job_context,
            role_name = ctx.role_name,
            coefficient = ctx.salary_coefficient,
            description = ctx.description,
            category_name = category.name(),
            category_rule = category.description(),
            count = count,
            distribution_lines = distribution_lines(ctx.distribution),
            keyword_marker = KEYWORD_MARKER,
        )
    }

    /// 合并请求提示词：一次覆盖全部类别
    ///
    /// `counts` 只应包含数量大于零的类别。
    pub fn combined_prompt(&self, ctx: &PromptContext<'_>, counts: &[(Category, u32)]) -> String {
        let total: u32 = counts.iter().map(|(_, count)| count).sum();
        let category_lines: Vec<String> = counts
            .iter()
            .map(|(category, count)| {
                format!("- {}（{}）：{} 道", category.name(), category.description(), count)
            })
            .collect();
        let format_lines: Vec<String> = counts
            .iter()
            .map(|(category, _)| {
                format!(
                    r#"  "{}": [ {{"question": "...", "expected_answer": "...\n\n{}：..."}} ]"#,
                    category.code(),
                    KEYWORD_MARKER
                )
            })
            .collect();

        format!(
            r#"招聘启事：{job_context}
岗位：{role_name}
薪酬系数：{coefficient}x
特殊条件：{description}

请为该岗位一次性编制共 {total} 道面试题，按以下类别分配：

{category_lines}

所有题目覆盖互不相同的技术主题。题目难度按 {coefficient}x 档位的层级权重分布：
{distribution_lines}

预期回答以评委视角书写，3-4 句，结尾空一行后给出 4-5 个{keyword_marker}。

输出格式 - 只返回一个 JSON 对象（键为类别代码），不要任何说明文字：

{{
{format_lines}
}}"#,
            job_context = ctx.job_context,
            role_name = ctx.role_name,
            coefficient = ctx.salary_coefficient,
            description = ctx.description,
            total = total,
            category_lines = category_lines.join("\n"),
            distribution_lines = distribution_lines(ctx.distribution),
            keyword_marker = KEYWORD_MARKER,
            format_lines = format_lines.join(",\n"),
        )
    }
}

/// 层级权重的逐行说明
fn distribution_lines(distribution: &DistributionTable) -> String {
    RubricLevel::all()
        .iter()
        .map(|level| {
            format!(
                "- {}（{}%）：{}",
                level.name(),
                distribution.percent(*level),
                level.guidance()
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}
