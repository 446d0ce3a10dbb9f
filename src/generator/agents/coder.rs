use crate::generator::context::GeneratorContext;
use crate::generator::step_forward_agent::{
    AgentDataConfig, DataSource, PromptTemplate, StepForwardAgent,
};
use crate::generator::types::AgentType;

/// 注入的研究摘要字符数
const RESEARCH_CONTEXT_CHARS: usize = 300;

/// 程序员 - 根据研究摘要生成代码骨架
#[derive(Default)]
pub struct Coder;

impl StepForwardAgent for Coder {
    fn agent_type(&self) -> AgentType {
        AgentType::Coder
    }

    fn data_config(&self) -> AgentDataConfig {
        AgentDataConfig {
            required_sources: vec![DataSource::RESEARCH_SUMMARY.truncated(RESEARCH_CONTEXT_CHARS)],
            optional_sources: vec![],
        }
    }

    fn prompt_template(&self, context: &GeneratorContext) -> PromptTemplate {
        let language = &context.config.code_language;
        PromptTemplate {
            system_prompt: format!("You are an expert {} developer.", language),
            opening_instruction: format!(
                "Based on this research summary, generate a {} code skeleton for implementing the approach it describes:",
                language
            ),
            closing_instruction: format!(
                "Generate clean, well-commented {} code with proper structure. Keep it under 30 lines.\n\nCode:",
                language
            ),
        }
    }
}
