//! 生成上下文封装

use crate::models::role::RoleProfile;
use crate::models::rubric::DistributionTable;
use crate::services::prompt::PromptContext;

/// 一次 (角色, 系数) 生成任务的静态上下文
#[derive(Debug, Clone)]
pub struct GenerationCtx {
    pub role_code: String,
    pub role_name: String,
    /// 岗位特殊条件描述
    pub description: String,
    /// 招聘启事原文
    pub job_context: String,
    pub salary_coefficient: u8,
    pub distribution: DistributionTable,
}

impl GenerationCtx {
    pub fn new(
        role_code: &str,
        profile: &RoleProfile,
        salary_coefficient: u8,
        job_context: String,
    ) -> Self {
        Self {
            role_code: role_code.to_string(),
            role_name: profile.name.to_string(),
            description: profile.description.to_string(),
            job_context,
            salary_coefficient,
            distribution: DistributionTable::for_coefficient(salary_coefficient),
        }
    }

    /// 提示词构建所需的借用视图
    pub fn prompt_context(&self) -> PromptContext<'_> {
        PromptContext {
            role_name: &self.role_name,
            job_context: &self.job_context,
            description: &self.description,
            salary_coefficient: self.salary_coefficient,
            distribution: &self.distribution,
        }
    }
}
