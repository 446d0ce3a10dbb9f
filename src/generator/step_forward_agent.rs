use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::generator::agent_executor::{AgentExecuteParams, prompt};
use crate::generator::context::GeneratorContext;
use crate::generator::memory::{MemoryScope, ScopedKeys};
use crate::generator::types::AgentType;
use crate::types::paper::truncate_chars;

/// 数据源配置 - 基于Memory Key的直接数据访问机制
#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    /// 用户输入的研究主题
    Query,
    /// 从Memory中获取文本数据，可按字符数截断
    MemoryData {
        scope: &'static str,
        key: &'static str,
        label: &'static str,
        max_chars: Option<usize>,
    },
}

impl DataSource {
    pub const RESEARCH_SUMMARY: DataSource = DataSource::MemoryData {
        scope: MemoryScope::RESEARCH,
        key: ScopedKeys::RESEARCH_SUMMARY,
        label: "Research",
        max_chars: None,
    };

    pub const GENERATED_CODE: DataSource = DataSource::MemoryData {
        scope: MemoryScope::RESEARCH,
        key: ScopedKeys::CODER,
        label: "Code",
        max_chars: None,
    };

    /// 限制注入prompt的字符数
    pub fn truncated(self, limit: usize) -> Self {
        match self {
            DataSource::MemoryData {
                scope, key, label, ..
            } => DataSource::MemoryData {
                scope,
                key,
                label,
                max_chars: Some(limit),
            },
            other => other,
        }
    }
}

/// Agent数据配置 - 声明所需的数据源
#[derive(Debug, Clone, Default)]
pub struct AgentDataConfig {
    /// 必需的数据源 - 缺少时执行失败
    pub required_sources: Vec<DataSource>,
    /// 可选的数据源 - 缺少时不影响执行
    pub optional_sources: Vec<DataSource>,
}

/// Prompt模板配置
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub system_prompt: String,
    /// 开头的说明性指令
    pub opening_instruction: String,
    /// 结尾的强调性指令
    pub closing_instruction: String,
}

/// 按模板与数据源拼装用户提示词
pub struct GeneratorPromptBuilder {
    template: PromptTemplate,
}

impl GeneratorPromptBuilder {
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }

    pub async fn build_prompts(
        &self,
        context: &GeneratorContext,
        data_sources: &[DataSource],
        custom_content: Option<String>,
    ) -> Result<(String, String)> {
        let mut prompt = String::new();

        if !self.template.opening_instruction.is_empty() {
            prompt.push_str(&self.template.opening_instruction);
            prompt.push_str("\n\n");
        }

        if let Some(custom) = custom_content {
            prompt.push_str(&custom);
            prompt.push_str("\n\n");
        }

        for source in data_sources {
            match source {
                DataSource::Query => {
                    if let Some(query) = context
                        .get_from_memory::<String>(MemoryScope::RESEARCH, ScopedKeys::QUERY)
                        .await
                    {
                        prompt.push_str(&format!("Topic: {}\n\n", query));
                    }
                }
                DataSource::MemoryData {
                    scope,
                    key,
                    label,
                    max_chars,
                } => {
                    if let Some(content) = context.get_from_memory::<String>(scope, key).await {
                        let content = match max_chars {
                            Some(limit) => truncate_chars(&content, *limit),
                            None => content,
                        };
                        prompt.push_str(&format!("{}: {}\n\n", label, content));
                    }
                }
            }
        }

        prompt.push_str(&self.template.closing_instruction);

        Ok((self.template.system_prompt.clone(), prompt))
    }
}

/// 单步推进的智能体：读取记忆中的上游结果，调用模型，写回自身输出
#[async_trait]
pub trait StepForwardAgent: Send + Sync {
    fn agent_type(&self) -> AgentType;

    fn memory_scope_key(&self) -> &'static str {
        MemoryScope::RESEARCH
    }

    fn data_config(&self) -> AgentDataConfig;

    fn prompt_template(&self, context: &GeneratorContext) -> PromptTemplate;

    /// 插入到用户提示词中的自定义内容
    async fn provide_custom_prompt_content(
        &self,
        _context: &GeneratorContext,
    ) -> Result<Option<String>> {
        Ok(None)
    }

    /// 模型输出写入记忆后的钩子
    async fn post_process(&self, _result: &str, _context: &GeneratorContext) -> Result<()> {
        Ok(())
    }

    async fn execute(&self, context: &GeneratorContext) -> Result<String> {
        let config = self.data_config();

        for source in &config.required_sources {
            if let DataSource::MemoryData { scope, key, .. } = source
                && !context.has_memory_data(scope, key).await
            {
                return Err(anyhow!("必需的数据源 {}:{} 不可用", scope, key));
            }
        }

        let all_sources = [config.required_sources, config.optional_sources].concat();

        let mut template = self.prompt_template(context);
        let language_instruction = context.config.target_language.prompt_instruction();
        template.system_prompt = format!("{}\n\n{}", template.system_prompt, language_instruction);

        let custom_content = self.provide_custom_prompt_content(context).await?;
        let (system_prompt, user_prompt) = GeneratorPromptBuilder::new(template)
            .build_prompts(context, &all_sources, custom_content)
            .await?;

        let agent_type = self.agent_type();
        let params = AgentExecuteParams {
            prompt_sys: system_prompt,
            prompt_user: user_prompt,
            cache_scope: format!("{}/{}", self.memory_scope_key(), agent_type),
            log_tag: agent_type.display_name().to_string(),
        };
        let result = prompt(context, params).await?;
        let result = result.trim().to_string();

        context
            .store_to_memory(self.memory_scope_key(), &agent_type.to_string(), &result)
            .await?;
        self.post_process(&result, context).await?;

        println!("✅ Sub-Agent [{}]执行完成", agent_type.display_name());
        Ok(result)
    }
}
