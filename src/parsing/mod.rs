//! 响应归一化解析核心
//!
//! 把生成模型自由发挥、经常畸形的文本输出，强制归一成严格的
//! 记录序列。修复只纠正语法，绝不发明内容。
//!
//! 分层（自底向上）：
//! - `repair` - 纯文本修复工具
//! - `extractor` - 单条记录抽取（含嵌套载荷恢复）
//! - `batch` - 四级策略级联的批量解析器

pub mod batch;
pub mod extractor;
pub mod repair;

// 重新导出常用类型
pub use batch::{parse_batch, parse_combined, CombinedParse, ParseFailure, ParseOutcome, ParseReport, Strategy};
pub use extractor::{extract, ExtractOutcome, KEYWORD_MARKER};
