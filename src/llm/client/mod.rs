//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::Result;
use async_trait::async_trait;
use std::future::Future;

use crate::config::LLMConfig;
use crate::llm::LanguageModel;
use crate::llm::client::utils::evaluate_befitting_model;

mod providers;
pub mod utils;

use providers::ProviderClient;

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: LLMConfig,
    client: ProviderClient,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: LLMConfig) -> Result<Self> {
        let client = ProviderClient::new(&config)?;
        Ok(Self { client, config })
    }

    /// 检查模型连接和功能是否正常
    pub async fn check_connection(&self) -> Result<()> {
        println!("🔄 正在检查模型连接...");
        match self
            .prompt_with_model(
                "System: You are a helpful assistant.",
                "Hello",
                &self.config.model_efficient,
            )
            .await
        {
            Ok(_) => {
                println!("✅ 模型连接正常");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ 模型连接失败: {}", e);
                Err(e)
            }
        }
    }

    /// 失败后按固定间隔 `retry_delay_ms` 重试，最多 `retry_attempts` 次
    async fn retry_with_delay<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, anyhow::Error>>,
    {
        let max_retries = self.config.retry_attempts.max(1);
        let retry_delay_ms = self.config.retry_delay_ms;
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    tracing::warn!(
                        attempt = retries,
                        max_attempts = max_retries,
                        "调用模型服务出错: {}",
                        err
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(std::time::Duration::from_millis(retry_delay_ms)).await;
                }
            }
        }
    }

    /// 使用指定模型的单轮对话（不使用工具）
    async fn prompt_with_model(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        model: &str,
    ) -> Result<String> {
        let agent = self.client.create_agent(model, system_prompt, &self.config)?;

        self.retry_with_delay(|| async { agent.prompt(user_prompt).await })
            .await
    }

    /// 单轮对话，首选模型多次失败后切换到兜底模型
    pub async fn prompt(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let (befitting_model, fallover_model) =
            evaluate_befitting_model(&self.config, system_prompt, user_prompt);

        match self
            .prompt_with_model(system_prompt, user_prompt, &befitting_model)
            .await
        {
            Ok(response) => Ok(response),
            Err(e) => match fallover_model {
                Some(model) => {
                    eprintln!(
                        "❌ 调用模型服务出错，尝试 {} 次均失败，尝试使用备选模型{}...{}",
                        self.config.retry_attempts, model, e
                    );
                    self.prompt_with_model(system_prompt, user_prompt, &model)
                        .await
                }
                None => Err(e),
            },
        }
    }
}

#[async_trait]
impl LanguageModel for LLMClient {
    async fn invoke(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.prompt(system_prompt, user_prompt).await
    }
}
