//! 面试题文档导出 - 业务能力层
//!
//! 把一次生成结果渲染成评委可用的 Markdown 文档。纯排版，
//! 不做任何判断逻辑；与核心的唯一契约是记录映射的形状。

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::models::category::Category;
use crate::models::question::RoleGenerationResult;
use crate::models::rubric::{difficulty_label, DistributionTable, RubricLevel};
use crate::services::snapshot::write_with_parents;

/// 文档导出服务
#[derive(Debug, Clone)]
pub struct DocumentExporter {
    output_dir: PathBuf,
}

impl DocumentExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn document_path(&self, result: &RoleGenerationResult) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}x_questions.md",
            result.role_code, result.salary_coefficient
        ))
    }

    /// 渲染 Markdown 文档（纯函数）
    pub fn render(result: &RoleGenerationResult) -> String {
        let mut doc = String::new();

        doc.push_str(&format!(
            "# {} 面试题（{}x · {}）\n\n",
            result.role,
            result.salary_coefficient,
            difficulty_label(result.salary_coefficient)
        ));
        doc.push_str(&format!("共 {} 道题。\n\n", result.total_questions));

        doc.push_str("## 难度层级分布\n\n");
        doc.push_str("| 层级 | 占比 |\n| --- | --- |\n");
        for level in RubricLevel::all() {
            let percent = result
                .difficulty_distribution
                .get(level.key())
                .copied()
                .unwrap_or(0);
            doc.push_str(&format!("| {} | {}% |\n", level.name(), percent));
        }
        doc.push('\n');

        // 按类别固有顺序输出，而不是映射的字典序
        for category in Category::all() {
            let Some(records) = result.questions.get(category.code()) else {
                continue;
            };
            doc.push_str(&format!(
                "## {}（{} 道）\n\n",
                category.name(),
                records.len()
            ));
            if records.is_empty() {
                doc.push_str("（本类别无产出）\n\n");
                continue;
            }
            for (index, record) in records.iter().enumerate() {
                doc.push_str(&format!("### {}. {}\n\n", index + 1, record.question));
                if record.expected_answer.is_empty() {
                    doc.push_str("**预期回答**：（缺失）\n\n");
                } else {
                    doc.push_str(&format!("**预期回答**：{}\n\n", record.expected_answer));
                }
            }
        }

        doc
    }

    /// 渲染并写入文档文件
    pub async fn export(&self, result: &RoleGenerationResult) -> Result<PathBuf> {
        let path = self.document_path(result);
        write_with_parents(&path, &Self::render(result)).await?;

        info!("📄 文档已导出: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::{GeneratedQuestion, QuestionRecord};
    use std::collections::BTreeMap;

    fn sample_result() -> RoleGenerationResult {
        let distribution = DistributionTable::for_coefficient(3).as_map();
        let mut questions = BTreeMap::new();
        for category in Category::all() {
            questions.insert(category.code().to_string(), Vec::new());
        }
        questions.insert(
            "professional_experience".to_string(),
            vec![
                GeneratedQuestion::from_record(
                    QuestionRecord::new("请分享一次容量规划的实战经历。", "候选人应说明…"),
                    "professional_experience",
                    "高级数据库工程师（PostgreSQL）",
                    3,
                    &distribution,
                ),
                GeneratedQuestion::from_record(
                    QuestionRecord::new("第二道题", ""),
                    "professional_experience",
                    "高级数据库工程师（PostgreSQL）",
                    3,
                    &distribution,
                ),
            ],
        );

        RoleGenerationResult {
            role: "高级数据库工程师（PostgreSQL）".to_string(),
            role_code: "senior_database_engineer".to_string(),
            salary_coefficient: 3,
            difficulty_distribution: distribution,
            questions,
            total_questions: 2,
            category_summaries: Vec::new(),
        }
    }

    #[test]
    fn test_render_contains_header_and_distribution() {
        let doc = DocumentExporter::render(&sample_result());
        assert!(doc.contains("# 高级数据库工程师（PostgreSQL） 面试题（3x · 中级）"));
        assert!(doc.contains("| 故障排查 | 35% |"));
    }

    #[test]
    fn test_render_orders_categories_and_numbers_questions() {
        let doc = DocumentExporter::render(&sample_result());
        let experience = doc.find("## 职业经验问题").unwrap();
        let theory = doc.find("## 理论知识问题").unwrap();
        let practice = doc.find("## 实践应用问题").unwrap();
        assert!(experience < theory && theory < practice);
        assert!(doc.contains("### 1. 请分享一次容量规划的实战经历。"));
        assert!(doc.contains("### 2. 第二道题"));
        assert!(doc.contains("**预期回答**：（缺失）"));
    }

    #[test]
    fn test_document_path_naming() {
        let exporter = DocumentExporter::new("out");
        assert_eq!(
            exporter.document_path(&sample_result()),
            PathBuf::from("out/senior_database_engineer_3x_questions.md")
        );
    }
}
