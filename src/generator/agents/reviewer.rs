use crate::generator::context::GeneratorContext;
use crate::generator::step_forward_agent::{
    AgentDataConfig, DataSource, PromptTemplate, StepForwardAgent,
};
use crate::generator::types::AgentType;

const RESEARCH_CONTEXT_CHARS: usize = 200;
const CODE_CONTEXT_CHARS: usize = 400;

/// 评审员 - 对研究摘要与生成的代码给出简短评审
#[derive(Default)]
pub struct Reviewer;

impl StepForwardAgent for Reviewer {
    fn agent_type(&self) -> AgentType {
        AgentType::Reviewer
    }

    fn data_config(&self) -> AgentDataConfig {
        AgentDataConfig {
            required_sources: vec![DataSource::RESEARCH_SUMMARY.truncated(RESEARCH_CONTEXT_CHARS)],
            // 跳过代码生成时只评审研究摘要
            optional_sources: vec![DataSource::GENERATED_CODE.truncated(CODE_CONTEXT_CHARS)],
        }
    }

    fn prompt_template(&self, _context: &GeneratorContext) -> PromptTemplate {
        PromptTemplate {
            system_prompt: "You are a senior code reviewer.".to_string(),
            opening_instruction: "Review the following:".to_string(),
            closing_instruction: "Provide a brief 2-3 sentence review focusing on quality, accuracy, and completeness.\n\nReview:".to_string(),
        }
    }
}
