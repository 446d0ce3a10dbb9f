use crate::config::LLMConfig;

/// 提示词长度阈值（字节），超过后直接使用powerful模型
const EFFICIENT_PROMPT_LIMIT: usize = 32 * 1024;

/// 根据提示词长度选择模型，返回（首选模型，兜底模型）
pub fn evaluate_befitting_model(
    llm_config: &LLMConfig,
    system_prompt: &str,
    user_prompt: &str,
) -> (String, Option<String>) {
    if system_prompt.len() + user_prompt.len() <= EFFICIENT_PROMPT_LIMIT {
        // 两个模型相同时没有兜底的意义
        let fallover = (llm_config.model_powerful != llm_config.model_efficient)
            .then(|| llm_config.model_powerful.clone());
        return (llm_config.model_efficient.clone(), fallover);
    }
    (llm_config.model_powerful.clone(), None)
}
