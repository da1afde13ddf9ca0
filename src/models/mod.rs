//! 领域模型与静态配置表

pub mod category;
pub mod question;
pub mod role;
pub mod rubric;

// 重新导出常用类型
pub use category::Category;
pub use question::{CategorySummary, GeneratedQuestion, QuestionRecord, RoleGenerationResult};
pub use role::{available_roles, get_role_profile, validate_role, RoleProfile};
pub use rubric::{difficulty_label, split_across_categories, DistributionTable, RubricLevel};
