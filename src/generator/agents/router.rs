use anyhow::{Result, anyhow};

use crate::generator::context::GeneratorContext;
use crate::generator::memory::{MemoryScope, ScopedKeys};
use crate::router::{QueryAnalysis, QueryRouter};

/// 查询路由步骤 - 在调用方超时内完成查询分析
#[derive(Default)]
pub struct RouterStep;

impl RouterStep {
    pub async fn execute(&self, context: &GeneratorContext) -> Result<QueryAnalysis> {
        let query: String = context
            .get_from_memory(MemoryScope::RESEARCH, ScopedKeys::QUERY)
            .await
            .ok_or_else(|| anyhow!("研究主题未写入记忆"))?;

        let router = QueryRouter::new(context.llm.clone());
        let analysis = match tokio::time::timeout(context.llm_timeout(), router.analyze(&query))
            .await
        {
            Ok(analysis) => analysis,
            Err(_) => {
                tracing::warn!(
                    timeout_secs = context.llm_timeout().as_secs(),
                    "查询分析超时，使用默认分析结果"
                );
                QueryAnalysis::fallback()
            }
        };

        println!(
            "   → Route: {} (Confidence: {})",
            analysis.path, analysis.confidence
        );
        if !analysis.is_fully_parsed() {
            tracing::debug!(provenance = ?analysis.provenance, "部分维度使用默认分数");
        }

        context
            .store_to_memory(MemoryScope::RESEARCH, ScopedKeys::ROUTING, &analysis)
            .await?;
        Ok(analysis)
    }
}
