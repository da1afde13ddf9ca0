//! 文本修复工具 - 解析核心的最底层
//!
//! 提供纯函数式的近似合法结构化文本修复能力：
//! - 括号补全（只补不删）
//! - 双重转义归一化
//! - Markdown 围栏剥离
//! - 外层容器裁剪
//! - 悬挂逗号清理
//!
//! 所有函数均为纯函数，永不失败，对已合法的输入幂等。

/// 默认的括号配对表：花括号、方括号、圆括号
pub const DEFAULT_PAIRS: &[(char, char)] = &[('{', '}'), ('[', ']'), ('(', ')')];

/// 补全缺失的闭合括号
///
/// 逐字符扫描（跳过字符串字面量内部），记录未闭合的开括号栈，
/// 在文本末尾按嵌套顺序补上缺失的闭括号。模型截断输出时
/// 字符串本身也可能没有收尾，此时先补一个闭合引号。
///
/// 多余的闭括号保持原样不删除：模型漏写闭括号的频率远高于多写。
pub fn balance_delimiters(text: &str, pairs: &[(char, char)]) -> String {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for ch in text.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        if ch == '"' {
            in_string = true;
            continue;
        }
        if pairs.iter().any(|&(open, _)| open == ch) {
            stack.push(ch);
        } else if let Some(&(open, _)) = pairs.iter().find(|&&(_, close)| close == ch) {
            // 只弹出与栈顶匹配的开括号，错配或多余的闭括号不动
            if stack.last() == Some(&open) {
                stack.pop();
            }
        }
    }

    if stack.is_empty() && !in_string {
        return text.to_string();
    }

    let mut repaired = text.to_string();
    if in_string {
        repaired.push('"');
    }
    while let Some(open) = stack.pop() {
        if let Some(&(_, close)) = pairs.iter().find(|&&(o, _)| o == open) {
            repaired.push(close);
        }
    }
    repaired
}

/// 归一化双重转义伪影
///
/// 模型把已转义的 JSON 字符串再转义一层时，文本里会出现
/// `\\"` 与 `\\n` 这类序列。把它们还原成单层转义，
/// 让 JSON 解析器看到正常内容。没有伪影时原样返回。
pub fn normalize_escapes(text: &str) -> String {
    text.replace("\\\\\"", "\\\"").replace("\\\\n", "\\n")
}

/// 剥离首尾的 Markdown 代码围栏
///
/// 去掉包裹载荷的 ``` 标记（可带 json 语言标签）。
/// 尽力而为：没有围栏时只做 trim，不算错误。
pub fn strip_markup_fences(text: &str) -> String {
    let mut s = text.trim();

    if let Some(rest) = s.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        s = rest.trim_start();
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim().to_string()
}

/// 裁剪到最外层容器
///
/// 定位第一个 `open_char` 与最后一个 `close_char`，丢弃区间之外的
/// 所有内容（常见于载荷前后的模型"客套话"）。
/// 任一字符缺失或顺序颠倒时原样返回。
pub fn trim_to_outer_container(text: &str, open_char: char, close_char: char) -> String {
    match (text.find(open_char), text.rfind(close_char)) {
        (Some(start), Some(end)) if start < end => {
            text[start..end + close_char.len_utf8()].to_string()
        }
        _ => text.to_string(),
    }
}

/// 清理悬挂逗号
///
/// 删除紧邻闭合括号前的逗号（生成模型的高频伪影）。
/// 字符串字面量内部的逗号不受影响。
pub fn fix_dangling_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            out.push(ch);
            i += 1;
            continue;
        }
        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
                i += 1;
            }
            ',' => {
                // 向前看：下一个非空白字符若是闭合括号，丢弃该逗号
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                    i += 1;
                } else {
                    out.push(ch);
                    i += 1;
                }
            }
            _ => {
                out.push(ch);
                i += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_delimiters_appends_missing_closers() {
        let input = r#"[{"question":"Q1","expected_answer":"A1""#;
        let repaired = balance_delimiters(input, DEFAULT_PAIRS);
        assert_eq!(repaired, r#"[{"question":"Q1","expected_answer":"A1"}]"#);
    }

    #[test]
    fn test_balance_delimiters_closes_truncated_string() {
        let input = r#"[{"question":"未写完的题目"#;
        let repaired = balance_delimiters(input, DEFAULT_PAIRS);
        assert!(repaired.ends_with(r#""}]"#));
    }

    #[test]
    fn test_balance_delimiters_idempotent() {
        let input = r#"[{"question":"Q1"}"#;
        let once = balance_delimiters(input, DEFAULT_PAIRS);
        let twice = balance_delimiters(&once, DEFAULT_PAIRS);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_balance_delimiters_keeps_valid_input() {
        let input = r#"{"a": [1, 2, (3)]}"#;
        assert_eq!(balance_delimiters(input, DEFAULT_PAIRS), input);
    }

    #[test]
    fn test_balance_delimiters_never_removes_extra_closers() {
        let input = "[1, 2]]";
        assert_eq!(balance_delimiters(input, DEFAULT_PAIRS), "[1, 2]]");
    }

    #[test]
    fn test_balance_delimiters_ignores_brackets_in_strings() {
        let input = r#"{"text": "数组写作 [1, 2"}"#;
        assert_eq!(balance_delimiters(input, DEFAULT_PAIRS), input);
    }

    #[test]
    fn test_normalize_escapes_collapses_double_escape() {
        assert_eq!(normalize_escapes(r#"a\\nb"#), r#"a\nb"#);
        assert_eq!(normalize_escapes(r#"说 \\"你好\\" 了"#), r#"说 \"你好\" 了"#);
    }

    #[test]
    fn test_normalize_escapes_noop_on_clean_input() {
        let input = r#"{"question": "第一行\n第二行"}"#;
        assert_eq!(normalize_escapes(input), input);
    }

    #[test]
    fn test_strip_markup_fences_with_language_tag() {
        let input = "```json\n{\"question\": \"Q\"}\n```";
        assert_eq!(strip_markup_fences(input), "{\"question\": \"Q\"}");
    }

    #[test]
    fn test_strip_markup_fences_without_tag() {
        let input = "```\n[1, 2]\n```";
        assert_eq!(strip_markup_fences(input), "[1, 2]");
    }

    #[test]
    fn test_strip_markup_fences_noop_without_fence() {
        assert_eq!(strip_markup_fences("  {\"q\": 1}  "), "{\"q\": 1}");
    }

    #[test]
    fn test_trim_to_outer_container_drops_prose() {
        let input = "好的，以下是结果：{\"question\": \"Q\"} 希望有帮助";
        assert_eq!(
            trim_to_outer_container(input, '{', '}'),
            "{\"question\": \"Q\"}"
        );
    }

    #[test]
    fn test_trim_to_outer_container_unchanged_when_absent() {
        assert_eq!(trim_to_outer_container("没有容器", '{', '}'), "没有容器");
        assert_eq!(trim_to_outer_container("} 顺序颠倒 {", '{', '}'), "} 顺序颠倒 {");
    }

    #[test]
    fn test_fix_dangling_commas_before_closers() {
        assert_eq!(fix_dangling_commas("[1, 2,]"), "[1, 2]");
        assert_eq!(fix_dangling_commas("{\"a\": 1, }"), "{\"a\": 1 }");
        assert_eq!(fix_dangling_commas("[1,\n  ]"), "[1\n  ]");
    }

    #[test]
    fn test_fix_dangling_commas_keeps_string_content() {
        let input = r#"["句子里有逗号, ] 也有括号",]"#;
        assert_eq!(fix_dangling_commas(input), r#"["句子里有逗号, ] 也有括号"]"#);
    }

    #[test]
    fn test_fix_dangling_commas_idempotent() {
        let input = "[1, 2,]";
        let once = fix_dangling_commas(input);
        assert_eq!(fix_dangling_commas(&once), once);
    }
}
