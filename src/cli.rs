//! 命令行接口定义

use clap::{Parser, Subcommand};

/// 面试题库生成系统
#[derive(Debug, Parser)]
#[command(name = "interview_question_gen", version, about = "面向技术岗位招录的 AI 面试题库生成系统")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 为单个角色在指定薪酬系数下生成面试题
    Generate {
        /// 角色代码（见 roles 子命令）
        #[arg(short, long)]
        role: String,
        /// 薪酬系数（2、3、4…）
        #[arg(short, long)]
        difficulty: u8,
        /// 题目总数
        #[arg(short, long, default_value_t = 15)]
        count: u32,
        /// 岗位描述文本文件路径（缺省按角色代码在岗位描述目录查找）
        #[arg(long)]
        job_file: Option<String>,
        /// 输出目录（覆盖环境配置）
        #[arg(long)]
        output_dir: Option<String>,
        /// 只写 JSON 快照，不导出 Markdown 文档
        #[arg(long)]
        no_doc: bool,
    },
    /// 为单个角色生成其开放的全部薪酬档位
    Batch {
        /// 角色代码
        #[arg(short, long)]
        role: String,
        /// 每个档位的题目总数
        #[arg(short, long, default_value_t = 15)]
        count: u32,
        /// 岗位描述文本文件路径
        #[arg(long)]
        job_file: Option<String>,
        /// 输出目录（覆盖环境配置）
        #[arg(long)]
        output_dir: Option<String>,
        /// 只写 JSON 快照，不导出 Markdown 文档
        #[arg(long)]
        no_doc: bool,
    },
    /// 按 TOML 任务配置文件批量并行生成
    Mass {
        /// 任务配置文件路径
        #[arg(short, long)]
        config: String,
        /// 输出目录（覆盖环境配置）
        #[arg(long)]
        output_dir: Option<String>,
        /// 只写 JSON 快照，不导出 Markdown 文档
        #[arg(long)]
        no_doc: bool,
    },
    /// 列出全部可用角色
    Roles,
}
