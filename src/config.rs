use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 采样温度
    pub llm_temperature: f32,
    /// 单次请求的输出上限（大批量出题需要较大值）
    pub llm_max_tokens: u32,
    /// 网络调用超时（唯一的取消机制）
    pub llm_timeout_secs: u64,
    /// 传输层失败的重试次数
    pub llm_max_retries: u32,
    // --- 任务调度 ---
    /// 并行生成任务的工作池大小
    pub max_concurrent_tasks: usize,
    // --- 输出 ---
    /// 快照与导出文档的输出目录
    pub output_dir: String,
    /// 岗位描述文本目录
    pub job_context_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_temperature: 0.8,
            llm_max_tokens: 16000,
            llm_timeout_secs: 60,
            llm_max_retries: 3,
            max_concurrent_tasks: 3,
            output_dir: "output/generated_questions".to_string(),
            job_context_dir: "data/job_descriptions".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_temperature),
            llm_max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_max_tokens),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_timeout_secs),
            llm_max_retries: std::env::var("LLM_MAX_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_max_retries),
            max_concurrent_tasks: std::env::var("MAX_CONCURRENT_TASKS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_tasks),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            job_context_dir: std::env::var("JOB_CONTEXT_DIR").unwrap_or(default.job_context_dir),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 生成前的配置校验：API 密钥缺失是致命配置错误，绝不静默默认
    pub fn validate(&self) -> AppResult<()> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }
        Ok(())
    }
}
