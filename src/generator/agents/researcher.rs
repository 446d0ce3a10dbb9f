use anyhow::{Result, anyhow};
use async_trait::async_trait;

use crate::generator::context::GeneratorContext;
use crate::generator::memory::{MemoryScope, ScopedKeys};
use crate::generator::step_forward_agent::{AgentDataConfig, PromptTemplate, StepForwardAgent};
use crate::generator::types::AgentType;
use crate::metrics::{QualityReport, QualityScorer};
use crate::search::{QueryEnhancer, format_paper_summary};

/// 研究员 - 检索论文、评估检索质量，并让模型总结研究现状
#[derive(Default)]
pub struct Researcher;

/// 拼装带质量标题的完整研究摘要
pub fn compose_full_summary(quality: &QualityReport, paper_summary: &str, analysis: &str) -> String {
    format!(
        "**Research Quality: {} ({}/10)**\n\n{}\n\n**Analysis:**\n{}",
        quality.grade(),
        quality.overall_score(),
        paper_summary,
        analysis
    )
}

#[async_trait]
impl StepForwardAgent for Researcher {
    fn agent_type(&self) -> AgentType {
        AgentType::Researcher
    }

    fn data_config(&self) -> AgentDataConfig {
        AgentDataConfig::default()
    }

    fn prompt_template(&self, _context: &GeneratorContext) -> PromptTemplate {
        PromptTemplate {
            system_prompt: "You are a research assistant who writes concise, accurate summaries of academic literature.".to_string(),
            opening_instruction: String::new(),
            closing_instruction: "Summary:".to_string(),
        }
    }

    async fn provide_custom_prompt_content(
        &self,
        context: &GeneratorContext,
    ) -> Result<Option<String>> {
        let query: String = context
            .get_from_memory(MemoryScope::RESEARCH, ScopedKeys::QUERY)
            .await
            .ok_or_else(|| anyhow!("研究主题未写入记忆"))?;

        let search_query = if context.config.search.enhance_query {
            QueryEnhancer::new().enhance_query(&query)
        } else {
            query.clone()
        };
        tracing::debug!(search_query = %search_query, "开始检索论文");

        let papers = context.search.search_papers(&search_query).await;
        let paper_summary = format_paper_summary(&papers);
        println!("   📚 检索到 {} 篇论文", papers.len());

        let quality = QualityScorer::new().score(&papers);
        println!(
            "   ✅ Quality Score: {} ({}/10)",
            quality.grade(),
            quality.overall_score()
        );
        if let Err(e) = context.metrics_log.append(&query, &quality) {
            tracing::warn!("质量指标写入失败，继续执行: {}", e);
        }

        context
            .store_to_memory(MemoryScope::RESEARCH, ScopedKeys::PAPERS, &papers)
            .await?;
        context
            .store_to_memory(MemoryScope::RESEARCH, ScopedKeys::PAPER_SUMMARY, &paper_summary)
            .await?;
        context
            .store_to_memory(MemoryScope::RESEARCH, ScopedKeys::QUALITY, &quality)
            .await?;

        Ok(Some(format!(
            "Based on these {} academic papers (Quality Grade: {}), provide a comprehensive summary about \"{}\":\n\n{}",
            papers.len(),
            quality.grade(),
            query,
            paper_summary
        )))
    }

    async fn post_process(&self, result: &str, context: &GeneratorContext) -> Result<()> {
        let quality: QualityReport = context
            .get_from_memory(MemoryScope::RESEARCH, ScopedKeys::QUALITY)
            .await
            .ok_or_else(|| anyhow!("质量评分未写入记忆"))?;
        let paper_summary: String = context
            .get_from_memory(MemoryScope::RESEARCH, ScopedKeys::PAPER_SUMMARY)
            .await
            .unwrap_or_default();

        let full_summary = compose_full_summary(&quality, &paper_summary, result);
        context
            .store_to_memory(MemoryScope::RESEARCH, ScopedKeys::RESEARCH_SUMMARY, full_summary)
            .await
    }
}
