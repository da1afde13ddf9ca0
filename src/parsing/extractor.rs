//! 单条记录抽取器
//!
//! 从一段原始模型输出中解析出恰好一条 `question` / `expected_answer`
//! 记录。容忍围栏包裹、前后客套话，以及"question 字段里又嵌套了一份
//! JSON 文本"的观测病灶。
//!
//! 本层的解析失败只通过 [`ExtractOutcome::parsed`] 标记传递，
//! 从不抛错 —— 是否重试、是否接受降级结果由上层决定。

use regex::Regex;
use serde_json::Value;

use crate::models::question::QuestionRecord;
use crate::parsing::repair;

/// 提示词约定的答案尾部标记：`expected_answer` 末尾空一行后的关键词列表。
/// 修正模式与提示词模板都以它为锚点。
pub const KEYWORD_MARKER: &str = "关键词";

/// 单条记录的抽取结果
///
/// `parsed == false` 表示严格解析彻底失败，此时 `record.question`
/// 里放的是清理后的原文，`expected_answer` 为空。
#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    pub record: QuestionRecord,
    pub parsed: bool,
    pub warnings: Vec<String>,
}

/// 从原始输出中抽取单条记录
///
/// 流程：剥围栏 → 裁剪到最外层 `{...}` → 关键词尾部修正 →
/// 严格 JSON 解析 → 必要时对 question 字段做一次嵌套解析。
/// 全部失败时把清理后的原文当作 question 返回。
pub fn extract(raw: &str) -> ExtractOutcome {
    let mut warnings = Vec::new();

    let cleaned = repair::strip_markup_fences(raw);
    let cleaned = repair::trim_to_outer_container(&cleaned, '{', '}');
    let cleaned = apply_keyword_tail_fixes(&cleaned, &mut warnings);

    let map = match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Object(map)) => map,
        _ => {
            warnings.push("无法按 JSON 对象解析，降级为纯文本返回".to_string());
            return ExtractOutcome {
                record: QuestionRecord {
                    question: cleaned,
                    expected_answer: String::new(),
                },
                parsed: false,
                warnings,
            };
        }
    };

    let mut question = field_as_string(&map, "question");
    let mut expected_answer = field_as_string(&map, "expected_answer");

    // 嵌套病灶：question 字段的值本身又是一个序列化的 JSON 对象
    let inner_candidate = repair::strip_markup_fences(&question);
    if inner_candidate.starts_with('{') && inner_candidate.ends_with('}') {
        let inner_fixed = apply_keyword_tail_fixes(&inner_candidate, &mut warnings);
        match serde_json::from_str::<Value>(&inner_fixed) {
            Ok(Value::Object(inner)) => {
                if inner.contains_key("question") {
                    question = field_as_string(&inner, "question");
                }
                let inner_answer = field_as_string(&inner, "expected_answer");
                // 内层覆盖外层；内层答案为空时外层答案保留
                if !inner_answer.is_empty() {
                    expected_answer = inner_answer;
                }
            }
            _ => {
                warnings.push("嵌套 JSON 解析失败，保留外层字段".to_string());
            }
        }
    }

    ExtractOutcome {
        record: QuestionRecord {
            question,
            expected_answer,
        },
        parsed: true,
        warnings,
    }
}

/// 关键词尾部修正
///
/// 针对性处理一类病灶：模型把本该拼接在 `expected_answer` 末尾的
/// `\n\n关键词：...` 尾句序列化成了一个多余的字符串元素。
/// 两条有序的确定性文本替换，不做结构解析：
///
/// 1. 锚定 `"expected_answer": "..."` 与随后闭合花括号的完整形态；
/// 2. 通用的 `", "<尾句>"` 形态。
pub fn apply_keyword_tail_fixes(text: &str, warnings: &mut Vec<String>) -> String {
    let mut fixed = text.to_string();

    let pattern_full = format!(
        r#"("expected_answer"\s*:\s*"[^"]*)"\s*,\s*"(\\n\\n{KEYWORD_MARKER}[：:][^"]*)("\s*\}})"#
    );
    if let Ok(re) = Regex::new(&pattern_full) {
        if re.is_match(&fixed) {
            fixed = re.replace_all(&fixed, "${1}${2}${3}").into_owned();
            warnings.push("关键词尾部修正已应用（完整形态）".to_string());
        }
    }

    let pattern_general = format!(r#""\s*,\s*"(\\n\\n{KEYWORD_MARKER}[：:][^"]*)""#);
    if let Ok(re) = Regex::new(&pattern_general) {
        if re.is_match(&fixed) {
            fixed = re.replace_all(&fixed, "${1}\"").into_owned();
            warnings.push("关键词尾部修正已应用（通用形态）".to_string());
        }
    }

    fixed
}

/// 按字段名取字符串值；字段缺失时返回空串，非字符串值按 JSON 文本呈现
fn field_as_string(map: &serde_json::Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_object() {
        let raw = r#"{"question": "什么是容器编排？", "expected_answer": "考察候选人对调度的理解。"}"#;
        let outcome = extract(raw);
        assert!(outcome.parsed);
        assert_eq!(outcome.record.question, "什么是容器编排？");
        assert_eq!(outcome.record.expected_answer, "考察候选人对调度的理解。");
    }

    #[test]
    fn test_extract_with_fences_and_prose() {
        let raw = "以下是生成的题目：\n```json\n{\"question\": \"Q\", \"expected_answer\": \"A\"}\n```\n祝面试顺利！";
        let outcome = extract(raw);
        assert!(outcome.parsed);
        assert_eq!(outcome.record.question, "Q");
        assert_eq!(outcome.record.expected_answer, "A");
    }

    #[test]
    fn test_extract_missing_fields_default_empty() {
        let raw = r#"{"question": "只有题目"}"#;
        let outcome = extract(raw);
        assert!(outcome.parsed);
        assert_eq!(outcome.record.question, "只有题目");
        assert_eq!(outcome.record.expected_answer, "");
        assert!(!outcome.record.is_complete());
    }

    #[test]
    fn test_extract_falls_back_to_verbatim_text() {
        let raw = "这里完全不是 JSON";
        let outcome = extract(raw);
        assert!(!outcome.parsed);
        assert_eq!(outcome.record.question, "这里完全不是 JSON");
        assert_eq!(outcome.record.expected_answer, "");
    }

    #[test]
    fn test_extract_nested_object_overrides_outer() {
        let raw = r#"{"question": "{\"question\": \"内层题目\", \"expected_answer\": \"内层答案\"}", "expected_answer": ""}"#;
        let outcome = extract(raw);
        assert!(outcome.parsed);
        assert_eq!(outcome.record.question, "内层题目");
        assert_eq!(outcome.record.expected_answer, "内层答案");
    }

    #[test]
    fn test_extract_outer_answer_wins_when_inner_empty() {
        let raw = r#"{"question": "{\"question\": \"内层题目\", \"expected_answer\": \"\"}", "expected_answer": "外层答案"}"#;
        let outcome = extract(raw);
        assert_eq!(outcome.record.question, "内层题目");
        assert_eq!(outcome.record.expected_answer, "外层答案");
    }

    #[test]
    fn test_extract_nested_failure_keeps_outer() {
        let raw = r#"{"question": "{这不是合法的嵌套}", "expected_answer": "外层答案"}"#;
        let outcome = extract(raw);
        assert!(outcome.parsed);
        assert_eq!(outcome.record.question, "{这不是合法的嵌套}");
        assert_eq!(outcome.record.expected_answer, "外层答案");
        assert!(outcome.warnings.iter().any(|w| w.contains("嵌套")));
    }

    #[test]
    fn test_keyword_tail_fix_full_form() {
        let raw = "{\"question\": \"Q\", \"expected_answer\": \"答案正文\", \"\\n\\n关键词：容器, 调度\" }";
        let outcome = extract(raw);
        assert!(outcome.parsed);
        assert_eq!(
            outcome.record.expected_answer,
            "答案正文\n\n关键词：容器, 调度"
        );
    }

    #[test]
    fn test_keyword_tail_fix_leaves_valid_input_untouched() {
        let raw = r#"{"question": "Q", "expected_answer": "正文\n\n关键词：容器"}"#;
        let mut warnings = Vec::new();
        assert_eq!(apply_keyword_tail_fixes(raw, &mut warnings), raw);
        assert!(warnings.is_empty());
    }
}
