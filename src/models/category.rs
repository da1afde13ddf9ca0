//! 题目类别枚举

/// 题目类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Category {
    /// 职业经验
    ProfessionalExperience,
    /// 理论知识
    TheoreticalKnowledge,
    /// 实践应用
    PracticalApplication,
}

impl Category {
    /// 全部类别，按出题顺序排列
    pub fn all() -> [Category; 3] {
        [
            Category::ProfessionalExperience,
            Category::TheoreticalKnowledge,
            Category::PracticalApplication,
        ]
    }

    /// 类别代码（快照与导出中的稳定键名）
    pub fn code(self) -> &'static str {
        match self {
            Category::ProfessionalExperience => "professional_experience",
            Category::TheoreticalKnowledge => "theoretical_knowledge",
            Category::PracticalApplication => "practical_application",
        }
    }

    /// 显示名称
    pub fn name(self) -> &'static str {
        match self {
            Category::ProfessionalExperience => "职业经验问题",
            Category::TheoreticalKnowledge => "理论知识问题",
            Category::PracticalApplication => "实践应用问题",
        }
    }

    /// 出题侧重说明，拼入提示词的"类别格式规则"
    pub fn description(self) -> &'static str {
        match self {
            Category::ProfessionalExperience => {
                "考察候选人过往项目经历、团队分工与行业实践，问题应落在真实经验的复盘上"
            }
            Category::TheoreticalKnowledge => {
                "考察与岗位相关的概念、协议、标准与体系结构等理论功底"
            }
            Category::PracticalApplication => {
                "考察真实场景下的解决方案，可给出问题情境、案例分析或系统配置场景"
            }
        }
    }

    /// 从类别代码解析
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "professional_experience" => Some(Category::ProfessionalExperience),
            "theoretical_knowledge" => Some(Category::TheoreticalKnowledge),
            "practical_application" => Some(Category::PracticalApplication),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for category in Category::all() {
            assert_eq!(Category::from_code(category.code()), Some(category));
        }
        assert_eq!(Category::from_code("unknown"), None);
    }

    #[test]
    fn test_order_is_stable() {
        let codes: Vec<&str> = Category::all().iter().map(|c| c.code()).collect();
        assert_eq!(
            codes,
            vec![
                "professional_experience",
                "theoretical_knowledge",
                "practical_application"
            ]
        );
    }
}
