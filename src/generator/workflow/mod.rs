use crate::config::Config;
use crate::generator::agents::ResearchReport;
use crate::generator::context::GeneratorContext;
use crate::generator::orchestrator::ResearchOrchestrator;
use crate::llm::client::LLMClient;
use crate::search::PaperSearchTool;

use anyhow::{Result, bail};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: Vec<(String, Instant)>,
    /// 按结束顺序记录
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: Vec::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .push((phase_name.to_string(), Instant::now()));
    }

    /// 结束一个阶段的计时，阶段未开始时返回None
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let index = self
            .phase_start_times
            .iter()
            .position(|(name, _)| name == phase_name)?;
        let (name, start) = self.phase_start_times.remove(index);
        let duration = start.elapsed();
        self.phase_durations.push((name, duration));
        Some(duration)
    }

    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn get_phase_durations(&self) -> &[(String, Duration)] {
        &self.phase_durations
    }

    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("\n各阶段执行时间:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const ROUTING: &'static str = "routing";
    pub const RESEARCH: &'static str = "research";
    pub const CODING: &'static str = "coding";
    pub const REVIEW: &'static str = "review";
    pub const PRESENTATION: &'static str = "presentation";
    pub const OUTPUT: &'static str = "output";
}

/// 连接真实模型与检索服务，执行一次研究
pub async fn launch(config: &Config, query: &str) -> Result<ResearchReport> {
    let llm_client = LLMClient::new(config.llm.clone())?;

    // 启动时检查模型连接
    llm_client.check_connection().await?;

    let search = Arc::new(PaperSearchTool::from_config(&config.search)?);
    let context = GeneratorContext::new(config.clone(), Arc::new(llm_client), search);

    run_research(&context, query).await
}

/// 在给定上下文中执行完整的研究流程并输出报告
pub async fn run_research(context: &GeneratorContext, query: &str) -> Result<ResearchReport> {
    let query = query.trim();
    if query.is_empty() {
        bail!("研究主题不能为空");
    }

    let mut timing = TimingScope::new();
    let report = ResearchOrchestrator
        .execute_research_pipeline(context, query, &mut timing)
        .await?;

    timing.start_phase(TimingKeys::OUTPUT);
    crate::generator::outlet::save(context, &report).await?;
    timing.end_phase(TimingKeys::OUTPUT);

    println!("{}", report.render_text());
    if context.config.verbose {
        println!("{}", timing.generate_timing_report());
    }

    Ok(report)
}
