//! 问题记录与生成结果模型

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 问题记录：一道面试题与其参考答案，产出的原子单位
///
/// 两个字段都允许为空 —— 空字段原样保留而不是丢弃，
/// 是否可用由下游消费方判断（见 [`QuestionRecord::is_complete`]）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub expected_answer: String,
}

impl QuestionRecord {
    pub fn new(question: impl Into<String>, expected_answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            expected_answer: expected_answer.into(),
        }
    }

    /// 两个字段都非空才算完整记录
    pub fn is_complete(&self) -> bool {
        !self.question.is_empty() && !self.expected_answer.is_empty()
    }
}

/// 附带元数据的生成结果记录
///
/// 解析出的每条记录都标注角色、薪酬系数、类别代码与当次使用的
/// 难度分布，供导出与留档使用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    pub expected_answer: String,
    pub category: String,
    pub role: String,
    pub salary_coefficient: u8,
    pub difficulty_distribution: BTreeMap<String, u8>,
}

impl GeneratedQuestion {
    pub fn from_record(
        record: QuestionRecord,
        category: &str,
        role: &str,
        salary_coefficient: u8,
        difficulty_distribution: &BTreeMap<String, u8>,
    ) -> Self {
        Self {
            question: record.question,
            expected_answer: record.expected_answer,
            category: category.to_string(),
            role: role.to_string(),
            salary_coefficient,
            difficulty_distribution: difficulty_distribution.clone(),
        }
    }
}

/// 单个类别的生成小结，用于最终成败清点
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub requested: u32,
    pub produced: usize,
    pub succeeded: bool,
    /// 失败原因（成功时为 None）
    pub detail: Option<String>,
}

/// 一次 (角色, 系数) 任务的完整生成结果
#[derive(Debug, Clone, Serialize)]
pub struct RoleGenerationResult {
    pub role: String,
    pub role_code: String,
    pub salary_coefficient: u8,
    pub difficulty_distribution: BTreeMap<String, u8>,
    /// 类别代码 → 记录列表。请求过的类别必然在场，数量为零的类别挂显式空列表
    pub questions: BTreeMap<String, Vec<GeneratedQuestion>>,
    pub total_questions: usize,
    pub category_summaries: Vec<CategorySummary>,
}

impl RoleGenerationResult {
    /// 是否所有类别都成功（部分失败时仍会产出结果，但要如实上报）
    pub fn all_categories_succeeded(&self) -> bool {
        self.category_summaries.iter().all(|s| s.succeeded)
    }

    pub fn failed_categories(&self) -> Vec<&CategorySummary> {
        self.category_summaries
            .iter()
            .filter(|s| !s.succeeded)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_completeness() {
        assert!(QuestionRecord::new("题目", "答案").is_complete());
        assert!(!QuestionRecord::new("题目", "").is_complete());
        assert!(!QuestionRecord::new("", "答案").is_complete());
    }

    #[test]
    fn test_record_deserializes_with_missing_fields() {
        let record: QuestionRecord = serde_json::from_str(r#"{"question": "只有题目"}"#).unwrap();
        assert_eq!(record.question, "只有题目");
        assert_eq!(record.expected_answer, "");
    }

    #[test]
    fn test_generated_question_carries_metadata() {
        let mut distribution = BTreeMap::new();
        distribution.insert("K1_基础知识".to_string(), 45u8);
        let generated = GeneratedQuestion::from_record(
            QuestionRecord::new("Q", "A"),
            "theoretical_knowledge",
            "软件开发工程师",
            2,
            &distribution,
        );
        assert_eq!(generated.category, "theoretical_knowledge");
        assert_eq!(generated.salary_coefficient, 2);
        assert_eq!(generated.difficulty_distribution["K1_基础知识"], 45);
    }
}
