use std::collections::BTreeMap;

use interview_question_gen::config::Config;
use interview_question_gen::models::question::{GeneratedQuestion, QuestionRecord, RoleGenerationResult};
use interview_question_gen::models::rubric::{split_across_categories, DistributionTable};
use interview_question_gen::orchestrator::BatchGenerator;
use interview_question_gen::parsing::{parse_batch, ParseOutcome};
use interview_question_gen::services::{DocumentExporter, SnapshotWriter};
use interview_question_gen::utils::logging;

/// 构造三条带特殊字符的合法记录，序列化为 JSON 数组文本
fn sample_records() -> (Vec<QuestionRecord>, String) {
    let records = vec![
        QuestionRecord::new(
            "请解释读写分离架构下的数据一致性取舍。",
            "候选人应说明主从延迟、读己之写等问题。\n\n关键词：读写分离, 主从延迟, 一致性",
        ),
        QuestionRecord::new(
            "日志里出现 \"connection refused\" 时你的排查路径是什么？",
            "候选人应从端口、防火墙、服务状态逐层定位。",
        ),
        QuestionRecord::new("第三道题, 标题里带逗号与问号？", "第三个答案"),
    ];
    let json = serde_json::to_string(&records).unwrap();
    (records, json)
}

/// 级联解析恢复性：各种包裹变形下内容逐字节一致
#[test]
fn test_cascade_recovers_wrapped_arrays_byte_identical() {
    let (records, json) = sample_records();

    // (说明, 变形函数)；缺闭括号的变形只与不追加尾文本的变形组合
    let wrapped: Vec<(&str, String)> = vec![
        ("原样", json.clone()),
        ("围栏包裹", format!("```json\n{}\n```", json)),
        ("无标签围栏", format!("```\n{}\n```", json)),
        ("前导客套话", format!("好的，这是您要的题目：\n{}", json)),
        ("尾随客套话", format!("{}\n以上，祝面试顺利。", json)),
        (
            "前后都有客套话",
            format!("说明如下：{}（完）", json),
        ),
        ("悬挂逗号", {
            let mut s = json.clone();
            s.insert(s.len() - 1, ',');
            s
        }),
        ("缺少闭括号", json[..json.len() - 1].to_string()),
        ("前导客套话 + 缺闭括号", {
            format!("以下是题目：\n{}", &json[..json.len() - 1])
        }),
        ("悬挂逗号 + 缺闭括号", {
            let mut s = json[..json.len() - 1].to_string();
            s.push(',');
            s
        }),
        ("围栏 + 悬挂逗号", {
            let mut s = json.clone();
            s.insert(s.len() - 1, ',');
            format!("```json\n{}\n```", s)
        }),
    ];

    for (label, input) in wrapped {
        let report = parse_batch(&input);
        assert!(report.is_success(), "{} 变形解析失败", label);
        let parsed = report.into_records();
        assert_eq!(parsed.len(), records.len(), "{} 变形记录数不符", label);
        for (expected, actual) in records.iter().zip(parsed.iter()) {
            assert_eq!(expected.question, actual.question, "{} 变形题目不一致", label);
            assert_eq!(
                expected.expected_answer, actual.expected_answer,
                "{} 变形答案不一致",
                label
            );
        }
    }
}

/// 单对象塌缩：question 字段里嵌着 M 条记录的数组
#[test]
fn test_collapsed_batch_recovered_from_question_field() {
    let (records, json) = sample_records();
    let collapsed = serde_json::json!({
        "question": json,
        "expected_answer": "",
    })
    .to_string();

    let report = parse_batch(&collapsed);
    match &report.outcome {
        ParseOutcome::Success { records: parsed, .. } => {
            assert_eq!(parsed.len(), records.len());
            assert_eq!(parsed[0].question, records[0].question);
        }
        ParseOutcome::Failure { reason } => panic!("塌缩批次未恢复: {}", reason),
    }
}

/// 规划器守恒性：五桶计数之和恒等于总数
#[test]
fn test_planner_sums_hold_for_spec_scenarios() {
    let table = DistributionTable::for_coefficient(3);
    let counts = table.plan_counts(17);
    assert_eq!(counts.iter().sum::<u32>(), 17);
    // 最大占比桶（故障排查 35%）吸收舍入余差
    assert_eq!(counts[2], 7);

    for total in [0u32, 1, 2, 9, 10, 99, 1000, 10_000] {
        for coefficient in [2u8, 3, 4, 6] {
            let counts = DistributionTable::for_coefficient(coefficient).plan_counts(total);
            assert_eq!(counts.iter().sum::<u32>(), total);
        }
    }

    for total in 0u32..=60 {
        assert_eq!(split_across_categories(total).iter().sum::<u32>(), total);
    }
}

fn build_result(output_records: Vec<QuestionRecord>) -> RoleGenerationResult {
    let distribution = DistributionTable::for_coefficient(3).as_map();
    let annotated: Vec<GeneratedQuestion> = output_records
        .into_iter()
        .map(|record| {
            GeneratedQuestion::from_record(
                record,
                "theoretical_knowledge",
                "DevOps 工程师",
                3,
                &distribution,
            )
        })
        .collect();
    let total = annotated.len();

    let mut questions = BTreeMap::new();
    questions.insert("theoretical_knowledge".to_string(), annotated);
    questions.insert("professional_experience".to_string(), Vec::new());
    questions.insert("practical_application".to_string(), Vec::new());

    RoleGenerationResult {
        role: "DevOps 工程师".to_string(),
        role_code: "devops_engineer".to_string(),
        salary_coefficient: 3,
        difficulty_distribution: distribution,
        questions,
        total_questions: total,
        category_summaries: Vec::new(),
    }
}

/// 快照落盘后可以重新读回，字段契约完整
#[test]
fn test_snapshot_round_trips_through_disk() {
    let (records, _) = sample_records();
    let result = build_result(records);

    let dir = std::env::temp_dir().join("iqg_integration_snapshot");
    let writer = SnapshotWriter::new(&dir);

    let path = tokio_test::block_on(writer.write(&result)).expect("快照写入失败");
    let content = std::fs::read_to_string(&path).expect("快照读回失败");
    let snapshot: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(snapshot["role"], "DevOps 工程师");
    assert_eq!(snapshot["salary_coefficient"], 3);
    assert_eq!(snapshot["total_questions"], 3);
    assert_eq!(
        snapshot["questions"]["theoretical_knowledge"]
            .as_array()
            .unwrap()
            .len(),
        3
    );
    // 零产出类别以显式空列表在场
    assert!(snapshot["questions"]["professional_experience"]
        .as_array()
        .unwrap()
        .is_empty());
}

/// 文档导出与快照互不影响
#[test]
fn test_document_export_alongside_snapshot() {
    let (records, _) = sample_records();
    let result = build_result(records);

    let dir = std::env::temp_dir().join("iqg_integration_doc");
    let exporter = DocumentExporter::new(&dir);

    let path = tokio_test::block_on(exporter.export(&result)).expect("文档导出失败");
    let doc = std::fs::read_to_string(&path).unwrap();
    assert!(doc.contains("# DevOps 工程师 面试题（3x · 中级）"));
    assert!(doc.contains("### 1."));
}

/// 真实 LLM 端到端生成
///
/// 运行方式：
/// ```bash
/// LLM_API_KEY=... cargo test test_generate_one_live -- --ignored --nocapture
/// ```
#[tokio::test]
#[ignore]
async fn test_generate_one_live() {
    logging::init();

    let mut config = Config::from_env();
    config.output_dir = std::env::temp_dir()
        .join("iqg_live_test")
        .to_string_lossy()
        .to_string();

    let generator = BatchGenerator::new(config).expect("初始化失败");
    let result = generator
        .generate_one("devops_engineer", 3, 5, None, true)
        .await
        .expect("生成失败");

    println!("共生成 {} 道题", result.total_questions);
    assert!(result.total_questions > 0);
}
