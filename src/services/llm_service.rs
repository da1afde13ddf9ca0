//! LLM 服务 - 业务能力层
//!
//! 只负责"向 LLM 要一段文本"的能力，不关心提示词内容与解析
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure, Gemini, Doubao 等）

use std::time::Duration;

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, LlmError};

/// LLM 服务
///
/// 职责：
/// - 调用 LLM API 获取单段文本响应
/// - 超时与重试由本层兜住，调用方只看到最终成败
/// - 不关心提示词语义，不接触解析
#[derive(Clone)]
pub struct LlmService {
    client: Client<OpenAIConfig>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
    timeout_secs: u64,
    max_retries: u32,
}

impl LlmService {
    /// 创建新的 LLM 服务
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            model_name: config.llm_model_name.clone(),
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
            timeout_secs: config.llm_timeout_secs,
            max_retries: config.llm_max_retries.max(1),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 发送一次生成请求
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应文本。超时或传输失败会按配置重试，
    /// 全部失败后返回最后一次的错误。
    pub async fn send(&self, user_message: &str, system_message: Option<&str>) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut last_error = String::new();

        for attempt in 1..=self.max_retries {
            let call = self.request_once(user_message, system_message);
            match tokio::time::timeout(Duration::from_secs(self.timeout_secs), call).await {
                Ok(Ok(content)) => {
                    debug!("LLM API 调用成功 (第 {} 次尝试)", attempt);
                    return Ok(content);
                }
                Ok(Err(e)) => {
                    warn!(
                        "LLM API 调用失败 (第 {}/{} 次): {}",
                        attempt, self.max_retries, e
                    );
                    last_error = e.to_string();
                }
                Err(_) => {
                    warn!(
                        "LLM API 调用超时 (第 {}/{} 次, {}秒)",
                        attempt, self.max_retries, self.timeout_secs
                    );
                    last_error = AppError::Llm(LlmError::TimedOut {
                        model: self.model_name.clone(),
                        seconds: self.timeout_secs,
                    })
                    .to_string();
                }
            }
        }

        Err(AppError::llm_api_failed(&self.model_name, last_error).into())
    }

    /// 单次 API 调用，不含超时与重试
    async fn request_once(&self, user_message: &str, system_message: Option<&str>) -> Result<String> {
        // 构建消息列表
        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()?;

        // 调用 API
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e.to_string()))?;

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| {
                AppError::Llm(LlmError::EmptyContent {
                    model: self.model_name.clone(),
                })
            })?;

        Ok(content.trim().to_string())
    }
}
