use anyhow::Result;
use clap::Parser;

use interview_question_gen::cli::{Cli, Command};
use interview_question_gen::config::Config;
use interview_question_gen::models::role::available_roles;
use interview_question_gen::orchestrator::BatchGenerator;
use interview_question_gen::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    let cli = Cli::parse();

    // 加载配置
    let mut config = Config::from_env();

    match cli.command {
        Command::Generate {
            role,
            difficulty,
            count,
            job_file,
            output_dir,
            no_doc,
        } => {
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            let generator = BatchGenerator::new(config)?;
            generator
                .generate_one(&role, difficulty, count, job_file.as_deref(), !no_doc)
                .await?;
        }
        Command::Batch {
            role,
            count,
            job_file,
            output_dir,
            no_doc,
        } => {
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            let generator = BatchGenerator::new(config)?;
            generator
                .generate_all_difficulties(&role, count, job_file.as_deref(), !no_doc)
                .await?;
        }
        Command::Mass {
            config: task_file,
            output_dir,
            no_doc,
        } => {
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            let generator = BatchGenerator::new(config)?;
            generator.generate_from_task_file(&task_file, !no_doc).await?;
        }
        Command::Roles => {
            println!("可用角色：");
            for (code, name) in available_roles() {
                println!("  {:32} {}", code, name);
            }
        }
    }

    Ok(())
}
