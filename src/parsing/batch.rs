//! 批量响应解析器 - 解析核心的中枢
//!
//! 一段原始响应理应携带一个记录数组，但实际形态千奇百怪。
//! 本模块按固定优先级依次尝试四种策略，第一个产出非空记录序列的
//! 策略胜出，后续策略不再尝试，不同策略的结果绝不混用：
//!
//! 1. 直接解析：文本本身就是 `[...]` 数组
//! 2. 围栏解析：取第一个内容形如数组的 ``` 代码块
//! 3. 括号区间解析：取第一个 `[` 到最后一个 `]` 的区间，先修复再解析
//! 4. 单对象重释：模型把整批塌缩成了单个对象，数组藏在 question 字段里
//!
//! 四种策略全部失败时返回显式的空结果与失败原因，绝不抛错 ——
//! 调用方应把它当作"该请求零产出"，而不是崩溃。

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::models::question::QuestionRecord;
use crate::parsing::{extractor, repair};

/// 解析策略标识，用于结果归因与日志
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// 直接数组解析
    Direct,
    /// 围栏代码块解析
    FencedBlock,
    /// 括号区间解析（带修复）
    BracketSpan,
    /// 单对象重释（嵌套数组恢复）
    SingleRecord,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Direct => "直接解析",
            Strategy::FencedBlock => "围栏解析",
            Strategy::BracketSpan => "括号区间解析",
            Strategy::SingleRecord => "单对象重释",
        }
    }
}

/// 批量解析的失败原因（作为值传递，不作为异常抛出）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("响应为空")]
    EmptyResponse,
    #[error("四种解析策略均告失败")]
    AllStrategiesFailed,
}

/// 批量解析结局：要么整批成功，要么显式失败
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Success {
        records: Vec<QuestionRecord>,
        strategy: Strategy,
    },
    Failure {
        reason: ParseFailure,
    },
}

/// 解析报告：结局 + 过程中积累的告警
///
/// 告警是显式返回值而非全局日志状态，核心因此可以独立测试。
#[derive(Debug, Clone)]
pub struct ParseReport {
    pub outcome: ParseOutcome,
    pub warnings: Vec<String>,
}

impl ParseReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ParseOutcome::Success { .. })
    }

    /// 取出记录序列；失败时为空序列
    pub fn into_records(self) -> Vec<QuestionRecord> {
        match self.outcome {
            ParseOutcome::Success { records, .. } => records,
            ParseOutcome::Failure { .. } => Vec::new(),
        }
    }

    pub fn records(&self) -> &[QuestionRecord] {
        match &self.outcome {
            ParseOutcome::Success { records, .. } => records,
            ParseOutcome::Failure { .. } => &[],
        }
    }
}

/// 解析一段理应携带记录数组的原始响应
pub fn parse_batch(raw: &str) -> ParseReport {
    let mut warnings = Vec::new();

    if raw.trim().is_empty() {
        return ParseReport {
            outcome: ParseOutcome::Failure {
                reason: ParseFailure::EmptyResponse,
            },
            warnings,
        };
    }

    if let Some(records) = try_direct(raw, &mut warnings) {
        return success(records, Strategy::Direct, warnings);
    }
    if let Some(records) = try_fenced_block(raw, &mut warnings) {
        return success(records, Strategy::FencedBlock, warnings);
    }
    if let Some(records) = try_bracket_span(raw, &mut warnings) {
        return success(records, Strategy::BracketSpan, warnings);
    }
    if let Some(records) = try_single_record(raw, &mut warnings) {
        return success(records, Strategy::SingleRecord, warnings);
    }

    ParseReport {
        outcome: ParseOutcome::Failure {
            reason: ParseFailure::AllStrategiesFailed,
        },
        warnings,
    }
}

fn success(records: Vec<QuestionRecord>, strategy: Strategy, warnings: Vec<String>) -> ParseReport {
    ParseReport {
        outcome: ParseOutcome::Success { records, strategy },
        warnings,
    }
}

/// 策略 1：文本 trim 后就是 `[...]`，严格解析
fn try_direct(raw: &str, warnings: &mut Vec<String>) -> Option<Vec<QuestionRecord>> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return None;
    }
    decode_array(trimmed, warnings)
}

/// 策略 2：找第一个内容形如数组的围栏代码块，对其内容做直接解析
fn try_fenced_block(raw: &str, warnings: &mut Vec<String>) -> Option<Vec<QuestionRecord>> {
    let re = Regex::new(r"(?s)```(?:json)?\s*(\[.*?\])\s*```").ok()?;
    let captured = re.captures(raw)?;
    let content = captured.get(1)?.as_str();
    try_direct(content, warnings)
}

/// 策略 3：第一个 `[` 到最后一个 `]` 的区间，修复后解析
///
/// 这是最宽容的位置启发式，也最依赖修复：悬挂逗号、双重转义、
/// 缺失的闭括号在这里统一处理。闭括号彻底缺失时区间延伸到文末，
/// 由括号补全收尾。
fn try_bracket_span(raw: &str, warnings: &mut Vec<String>) -> Option<Vec<QuestionRecord>> {
    let start = raw.find('[')?;
    let span = match raw.rfind(']') {
        Some(end) if end > start => &raw[start..=end],
        _ => &raw[start..],
    };

    // 先补全括号再清逗号：截断的数组往往同时带着悬挂逗号
    let repaired = repair::balance_delimiters(span, repair::DEFAULT_PAIRS);
    let repaired = repair::fix_dangling_commas(&repaired);
    let repaired = repair::normalize_escapes(&repaired);

    decode_array(&repaired, warnings)
}

/// 策略 4：整批被塌缩成单个对象，数组以文本形式藏在 question 字段里
fn try_single_record(raw: &str, warnings: &mut Vec<String>) -> Option<Vec<QuestionRecord>> {
    let outcome = extractor::extract(raw);
    warnings.extend(outcome.warnings);

    // 在抽取出的 question 文本里再找一次数组区间
    try_bracket_span(&outcome.record.question, warnings)
}

/// 数组解码 + 元素有效性过滤
///
/// 仅保留"含 question 键的对象"元素（值可以为空）；
/// 其余元素跳过并记告警，不拖垮整批。输出顺序与源数组一致。
/// 解码失败或过滤后为空时返回 None，让级联继续。
fn decode_array(text: &str, warnings: &mut Vec<String>) -> Option<Vec<QuestionRecord>> {
    let items = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items,
        _ => return None,
    };

    let records = filter_records(items, warnings);
    if records.is_empty() {
        None
    } else {
        Some(records)
    }
}

/// 元素有效性过滤：保留含 question 键的对象，其余跳过并记告警
fn filter_records(items: Vec<Value>, warnings: &mut Vec<String>) -> Vec<QuestionRecord> {
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match item {
            Value::Object(map) if map.contains_key("question") => {
                match serde_json::from_value::<QuestionRecord>(Value::Object(map)) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        warnings.push(format!("第 {} 个元素反序列化失败，已跳过: {}", index + 1, e));
                    }
                }
            }
            _ => {
                warnings.push(format!("第 {} 个元素缺少 question 键，已跳过", index + 1));
            }
        }
    }
    records
}

/// 合并请求的解析结果：类别代码 → 记录列表
#[derive(Debug, Clone)]
pub struct CombinedParse {
    pub per_category: BTreeMap<String, Vec<QuestionRecord>>,
    pub warnings: Vec<String>,
}

impl CombinedParse {
    pub fn total_records(&self) -> usize {
        self.per_category.values().map(Vec::len).sum()
    }
}

/// 解析一次合并请求的响应：单个对象，按类别代码挂数组
///
/// 未出现或非数组的类别键得到显式空列表并记告警；
/// 响应里多出的未知键直接忽略。元素有效性过滤与批量解析一致。
pub fn parse_combined(raw: &str, category_codes: &[&str]) -> CombinedParse {
    let mut warnings = Vec::new();
    let mut per_category: BTreeMap<String, Vec<QuestionRecord>> = category_codes
        .iter()
        .map(|code| (code.to_string(), Vec::new()))
        .collect();

    let cleaned = repair::strip_markup_fences(raw);
    let cleaned = repair::trim_to_outer_container(&cleaned, '{', '}');

    let map = match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(map)) => map,
        _ => {
            warnings.push("合并响应无法按 JSON 对象解析".to_string());
            return CombinedParse {
                per_category,
                warnings,
            };
        }
    };

    for code in category_codes {
        match map.get(*code) {
            Some(Value::Array(items)) => {
                let mut category_warnings = Vec::new();
                let records = filter_records(items.clone(), &mut category_warnings);
                per_category.insert(code.to_string(), records);
                warnings.extend(
                    category_warnings
                        .into_iter()
                        .map(|w| format!("[{}] {}", code, w)),
                );
            }
            Some(_) => warnings.push(format!("类别 {} 的值不是数组，按空列表处理", code)),
            None => warnings.push(format!("合并响应中缺少类别 {}", code)),
        }
    }

    CombinedParse {
        per_category,
        warnings,
    }
}
