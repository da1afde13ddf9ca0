//! K1-K5 认知层级量表与难度分布规划
//!
//! 薪酬系数（2x、3x、4x、5x+）决定一套固定的百分比表；
//! 规划函数把总题数按表切成五个认知层级的子计数，
//! 以及按 1:2:2 权重切成三个类别的子计数。两个切分都保证
//! 子计数之和严格等于请求总数。

use std::collections::BTreeMap;

/// 认知层级（K1-K5），按表序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RubricLevel {
    /// 基础知识：定义、概念解释
    BasicKnowledge,
    /// 应用知识：配置、方法、使用建议
    Applied,
    /// 故障排查：日志分析、错误定位与评估
    Troubleshooting,
    /// 架构设计：体系结构、技术选型对比、可扩展性
    Design,
    /// 战略规划：流程改进、技术决策依据等管理向议题
    Strategic,
}

impl RubricLevel {
    /// 全部层级，按表序（K1 → K5）
    pub fn all() -> [RubricLevel; 5] {
        [
            RubricLevel::BasicKnowledge,
            RubricLevel::Applied,
            RubricLevel::Troubleshooting,
            RubricLevel::Design,
            RubricLevel::Strategic,
        ]
    }

    /// 分布映射里的稳定键名，前缀保证按表序排序
    pub fn key(self) -> &'static str {
        match self {
            RubricLevel::BasicKnowledge => "K1_基础知识",
            RubricLevel::Applied => "K2_应用知识",
            RubricLevel::Troubleshooting => "K3_故障排查",
            RubricLevel::Design => "K4_架构设计",
            RubricLevel::Strategic => "K5_战略规划",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RubricLevel::BasicKnowledge => "基础知识",
            RubricLevel::Applied => "应用知识",
            RubricLevel::Troubleshooting => "故障排查",
            RubricLevel::Design => "架构设计",
            RubricLevel::Strategic => "战略规划",
        }
    }

    /// 出题指引，拼入提示词的分布说明
    pub fn guidance(self) -> &'static str {
        match self {
            RubricLevel::BasicKnowledge => "定义、概念解释（不含代码）",
            RubricLevel::Applied => "配置、方法、使用建议（不含代码）",
            RubricLevel::Troubleshooting => "日志分析、错误定位与评估（不含代码）",
            RubricLevel::Design => "体系结构、技术对比、可扩展性等议题",
            RubricLevel::Strategic => "流程改进、技术选型、决策依据等管理向问题",
        }
    }
}

/// 一档薪酬系数对应的百分比表，按 K1 → K5 的表序存放
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistributionTable {
    percents: [u8; 5],
}

impl DistributionTable {
    /// 按薪酬系数取分布（四档）
    pub fn for_coefficient(coefficient: u8) -> Self {
        let percents = if coefficient <= 2 {
            // 2x - 初级：概念与应用为主
            [45, 40, 10, 5, 0]
        } else if coefficient == 3 {
            // 3x - 中级：排障比重最大
            [20, 25, 35, 20, 0]
        } else if coefficient == 4 {
            // 4x - 高级：架构决策为主
            [5, 15, 25, 35, 20]
        } else {
            // 5x+ - 负责人：战略与大规模架构
            [5, 10, 20, 30, 35]
        };
        Self { percents }
    }

    pub fn percent(&self, level: RubricLevel) -> u8 {
        let index = RubricLevel::all()
            .iter()
            .position(|l| *l == level)
            .unwrap_or(0);
        self.percents[index]
    }

    /// 键名 → 百分比的映射（键名前缀保证迭代顺序即表序）
    pub fn as_map(&self) -> BTreeMap<String, u8> {
        RubricLevel::all()
            .iter()
            .map(|level| (level.key().to_string(), self.percent(*level)))
            .collect()
    }

    /// 把总题数按百分比切成五个层级的子计数
    ///
    /// 每桶取最近整数份额；四舍五入造成的差额全部由占比最大的桶
    /// 吸收（占比并列时取表序靠前者）。子计数之和严格等于总数。
    pub fn plan_counts(&self, total: u32) -> [u32; 5] {
        let mut counts = [0i64; 5];
        for (index, percent) in self.percents.iter().enumerate() {
            counts[index] = ((*percent as f64 / 100.0) * total as f64).round() as i64;
        }

        let assigned: i64 = counts.iter().sum();
        let difference = total as i64 - assigned;
        if difference != 0 {
            let largest = self
                .percents
                .iter()
                .enumerate()
                .max_by(|(ia, a), (ib, b)| a.cmp(b).then(ib.cmp(ia)))
                .map(|(index, _)| index)
                .unwrap_or(0);
            counts[largest] += difference;
        }

        let mut result = [0u32; 5];
        for (index, count) in counts.iter().enumerate() {
            result[index] = (*count).max(0) as u32;
        }
        result
    }

    /// 键名 → 子计数的映射形式
    pub fn plan_counts_map(&self, total: u32) -> BTreeMap<String, u32> {
        let counts = self.plan_counts(total);
        RubricLevel::all()
            .iter()
            .zip(counts.iter())
            .map(|(level, count)| (level.key().to_string(), *count))
            .collect()
    }
}

/// 按 1:2:2 权重把总题数切成三个类别的子计数
///
/// 余量按第二类 → 第三类 → 第一类的顺序逐个分配，超过三单位时循环。
pub fn split_across_categories(total: u32) -> [u32; 3] {
    let unit = total / 5;
    let mut counts = [unit, unit * 2, unit * 2];
    let leftover = total - unit * 5;

    let order = [1usize, 2, 0];
    for i in 0..leftover {
        counts[order[i as usize % 3]] += 1;
    }
    counts
}

/// 薪酬系数对应的难度档位名称
pub fn difficulty_label(coefficient: u8) -> &'static str {
    match coefficient {
        0..=2 => "初级",
        3 => "中级",
        4 => "高级",
        5 => "负责人",
        _ => "专家",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_counts_total_17_coefficient_3() {
        // 20/25/35/20/0：四舍五入后差额由 K3（最大占比）吸收
        let table = DistributionTable::for_coefficient(3);
        let counts = table.plan_counts(17);
        assert_eq!(counts.iter().sum::<u32>(), 17);
        assert_eq!(counts, [3, 4, 7, 3, 0]);
    }

    #[test]
    fn test_plan_counts_sums_exactly_across_tiers() {
        for coefficient in [2u8, 3, 4, 5] {
            let table = DistributionTable::for_coefficient(coefficient);
            for total in (0u32..=200).chain((201..=10_000).step_by(487)) {
                let counts = table.plan_counts(total);
                assert_eq!(
                    counts.iter().sum::<u32>(),
                    total,
                    "系数 {} 总数 {} 的分布不守恒",
                    coefficient,
                    total
                );
            }
        }
    }

    #[test]
    fn test_plan_counts_remainder_goes_to_largest_bucket() {
        // 总数 1，2x 档：全部份额四舍五入为 0，缺额 1 归入 K1（45%）
        let table = DistributionTable::for_coefficient(2);
        assert_eq!(table.plan_counts(1), [1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_plan_counts_tie_broken_by_table_order() {
        // 5x 档没有并列；构造校验依赖 percent 接口的并列语义即可：
        // 最大占比并列时应取表序靠前者
        let table = DistributionTable { percents: [30, 30, 20, 10, 10] };
        let counts = table.plan_counts(1);
        assert_eq!(counts, [1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_distribution_map_iterates_in_table_order() {
        let table = DistributionTable::for_coefficient(4);
        let keys: Vec<String> = table.as_map().keys().cloned().collect();
        assert_eq!(
            keys,
            vec![
                "K1_基础知识",
                "K2_应用知识",
                "K3_故障排查",
                "K4_架构设计",
                "K5_战略规划"
            ]
        );
    }

    #[test]
    fn test_split_across_categories_ratio_and_leftovers() {
        assert_eq!(split_across_categories(5), [1, 2, 2]);
        assert_eq!(split_across_categories(10), [2, 4, 4]);
        // 余 1 → 第二类；余 2 → 第二、三类；余 3 → 第二、三、一类；余 4 → 再回到第二类
        assert_eq!(split_across_categories(6), [1, 3, 2]);
        assert_eq!(split_across_categories(7), [1, 3, 3]);
        assert_eq!(split_across_categories(8), [2, 3, 3]);
        assert_eq!(split_across_categories(9), [2, 4, 3]);
    }

    #[test]
    fn test_split_across_categories_sums_exactly() {
        for total in 0u32..=100 {
            let counts = split_across_categories(total);
            assert_eq!(counts.iter().sum::<u32>(), total);
        }
    }

    #[test]
    fn test_difficulty_labels() {
        assert_eq!(difficulty_label(2), "初级");
        assert_eq!(difficulty_label(3), "中级");
        assert_eq!(difficulty_label(4), "高级");
        assert_eq!(difficulty_label(5), "负责人");
        assert_eq!(difficulty_label(7), "专家");
    }
}
