use anyhow::Result;
use async_trait::async_trait;

pub mod client;

/// 语言模型协作方 - 输入提示词，返回自由文本
///
/// 输出没有任何结构保证，调用方必须能容忍任意文本。
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn invoke(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
