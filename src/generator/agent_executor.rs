use anyhow::{Result, anyhow};

use crate::generator::context::GeneratorContext;

pub struct AgentExecuteParams {
    pub prompt_sys: String,
    pub prompt_user: String,
    pub cache_scope: String,
    pub log_tag: String,
}

/// 带缓存与超时的单轮模型调用
pub async fn prompt(context: &GeneratorContext, params: AgentExecuteParams) -> Result<String> {
    let AgentExecuteParams {
        prompt_sys,
        prompt_user,
        cache_scope,
        log_tag,
    } = params;
    let prompt_key = format!("{}|{}", prompt_sys, prompt_user);

    if let Some(cached) = context
        .cache_manager
        .read()
        .await
        .get::<String>(&cache_scope, &prompt_key)
        .await?
    {
        println!("   ✅ 使用缓存的AI分析结果: {}", log_tag);
        return Ok(cached);
    }

    println!("   🤖 正在进行AI分析: {}", log_tag);
    let timeout = context.llm_timeout();
    let reply = tokio::time::timeout(timeout, context.llm.invoke(&prompt_sys, &prompt_user))
        .await
        .map_err(|_| anyhow!("{} 的模型调用超时（{}秒）", log_tag, timeout.as_secs()))??;

    if let Err(e) = context
        .cache_manager
        .write()
        .await
        .set(&cache_scope, &prompt_key, &reply)
        .await
    {
        tracing::warn!(tag = %log_tag, "写入模型回答缓存失败: {}", e);
    }

    Ok(reply)
}
