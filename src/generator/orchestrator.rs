use anyhow::{Context, Result};

use crate::generator::agents::{Coder, Presenter, ResearchReport, Researcher, Reviewer, RouterStep};
use crate::generator::context::GeneratorContext;
use crate::generator::memory::{MemoryScope, ScopedKeys};
use crate::generator::step_forward_agent::StepForwardAgent;
use crate::generator::types::AgentType;
use crate::generator::workflow::{TimingKeys, TimingScope};

/// 多智能体研究编排器
#[derive(Default)]
pub struct ResearchOrchestrator;

impl ResearchOrchestrator {
    /// 依次执行路由、研究、编码、评审与汇总
    pub async fn execute_research_pipeline(
        &self,
        context: &GeneratorContext,
        query: &str,
        timing: &mut TimingScope,
    ) -> Result<ResearchReport> {
        println!("🚀 开始执行多智能体研究流程...");
        context
            .store_to_memory(MemoryScope::RESEARCH, ScopedKeys::QUERY, query)
            .await?;

        timing.start_phase(TimingKeys::ROUTING);
        println!("🧠 执行 {} 分析查询复杂度...", AgentType::Router.display_name());
        RouterStep.execute(context).await?;
        timing.end_phase(TimingKeys::ROUTING);

        timing.start_phase(TimingKeys::RESEARCH);
        if let Err(e) = self.execute_agent(&Researcher, context).await {
            eprintln!("⚠️ 研究智能体执行失败，使用兜底摘要: {}", e);
            context
                .store_to_memory(
                    MemoryScope::RESEARCH,
                    ScopedKeys::RESEARCH_SUMMARY,
                    format!("Research summary for: {}", query),
                )
                .await?;
        }
        timing.end_phase(TimingKeys::RESEARCH);

        if context.config.skip_coding {
            println!("⏭️ 跳过代码生成");
        } else {
            timing.start_phase(TimingKeys::CODING);
            self.execute_agent(&Coder, context)
                .await
                .context("代码生成失败")?;
            timing.end_phase(TimingKeys::CODING);
        }

        if context.config.skip_review {
            println!("⏭️ 跳过代码评审");
        } else {
            timing.start_phase(TimingKeys::REVIEW);
            self.execute_agent(&Reviewer, context)
                .await
                .context("代码评审失败")?;
            timing.end_phase(TimingKeys::REVIEW);
        }

        timing.start_phase(TimingKeys::PRESENTATION);
        println!("📝 执行 {} 汇总研究报告...", AgentType::Presenter.display_name());
        let report = Presenter.execute(context).await?;
        timing.end_phase(TimingKeys::PRESENTATION);

        println!("✓ 多智能体研究流程执行完毕");
        Ok(report)
    }

    async fn execute_agent<T>(&self, agent: &T, context: &GeneratorContext) -> Result<String>
    where
        T: StepForwardAgent,
    {
        println!("🤖 执行 {} 智能体...", agent.agent_type().display_name());
        agent.execute(context).await
    }
}
