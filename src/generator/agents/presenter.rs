use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generator::context::GeneratorContext;
use crate::generator::memory::{MemoryScope, ScopedKeys};
use crate::metrics::QualityReport;
use crate::router::QueryAnalysis;

const RULE_WIDTH: usize = 70;
const NOT_AVAILABLE: &str = "N/A";

/// 一次研究运行的最终报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchReport {
    pub id: uuid::Uuid,
    pub query: String,
    pub routing: Option<QueryAnalysis>,
    pub research: String,
    pub code: Option<String>,
    pub review: Option<String>,
    pub metrics: Option<QualityReport>,
    pub generated_at: DateTime<Utc>,
}

impl ResearchReport {
    /// 控制台展示的纯文本报告
    pub fn render_text(&self) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut report = String::new();

        report.push_str(&format!("\n{}\n", rule));
        report.push_str(&format!("{:^width$}\n", "IMARA RESEARCH REPORT", width = RULE_WIDTH));
        report.push_str(&format!("{}\n\n", rule));

        report.push_str(&format!("TOPIC: {}\n", self.query));
        if let Some(routing) = &self.routing {
            report.push_str(&format!(
                "ROUTE: {} (Confidence: {})\n",
                routing.path, routing.confidence
            ));
        }
        report.push_str(&format!("QUALITY: {}\n\n", self.quality_label()));
        report.push_str(&format!("{}\n\n", rule));

        let sections = [
            ("RESEARCH FINDINGS", Some(self.research.as_str())),
            ("CODE GENERATED", self.code.as_deref()),
            ("REVIEW FEEDBACK", self.review.as_deref()),
        ];
        for (title, body) in sections {
            report.push_str(&format!(
                "{}:\n{}\n\n{}\n\n",
                title,
                body.unwrap_or(NOT_AVAILABLE),
                rule
            ));
        }

        report
    }

    /// 写入文件的Markdown报告
    pub fn render_markdown(&self) -> String {
        let mut report = String::from("## IMARA Research Report\n\n");
        report.push_str(&format!("**Topic:** {}\n\n", self.query));
        report.push_str(&format!("**Research Quality:** {}\n\n", self.quality_label()));
        if let Some(routing) = &self.routing {
            report.push_str(&format!(
                "**Route:** {} (Confidence: {})\n\n",
                routing.path, routing.confidence
            ));
        }
        report.push_str("---\n\n");
        report.push_str(&format!("### Research Findings\n{}\n\n---\n\n", self.research));
        report.push_str(&format!(
            "### Code Generated\n{}\n\n---\n\n",
            self.code.as_deref().unwrap_or(NOT_AVAILABLE)
        ));
        report.push_str(&format!(
            "### Review Feedback\n{}\n\n---\n\n",
            self.review.as_deref().unwrap_or(NOT_AVAILABLE)
        ));
        report.push_str(&format!(
            "**Generated by IMARA Multi-Agent System** ({})\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        report
    }

    fn quality_label(&self) -> String {
        match &self.metrics {
            Some(metrics) => format!("{} ({}/10)", metrics.grade(), metrics.overall_score()),
            None => format!("{} ({}/10)", NOT_AVAILABLE, NOT_AVAILABLE),
        }
    }
}

/// 汇总者 - 将记忆中的各阶段结果编排为最终报告
#[derive(Default)]
pub struct Presenter;

impl Presenter {
    pub async fn execute(&self, context: &GeneratorContext) -> Result<ResearchReport> {
        let scope = MemoryScope::RESEARCH;
        let query: String = context
            .get_from_memory(scope, ScopedKeys::QUERY)
            .await
            .ok_or_else(|| anyhow!("研究主题未写入记忆"))?;
        let research: String = context
            .get_from_memory(scope, ScopedKeys::RESEARCH_SUMMARY)
            .await
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let report = ResearchReport {
            id: uuid::Uuid::new_v4(),
            query,
            routing: context.get_from_memory(scope, ScopedKeys::ROUTING).await,
            research,
            code: context.get_from_memory(scope, ScopedKeys::CODER).await,
            review: context.get_from_memory(scope, ScopedKeys::REVIEWER).await,
            metrics: context.get_from_memory(scope, ScopedKeys::QUALITY).await,
            generated_at: Utc::now(),
        };

        context
            .store_to_memory(scope, ScopedKeys::REPORT, &report)
            .await?;
        println!("✅ Sub-Agent [Presenter]执行完成");
        Ok(report)
    }
}
