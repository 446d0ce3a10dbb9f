pub struct MemoryScope;

impl MemoryScope {
    pub const RESEARCH: &'static str = "research";
}

/// 研究作用域下的数据键；智能体的文本输出以其 `AgentType` 为键
pub struct ScopedKeys;

impl ScopedKeys {
    pub const QUERY: &'static str = "query";
    pub const ROUTING: &'static str = "routing";
    pub const PAPERS: &'static str = "papers";
    pub const PAPER_SUMMARY: &'static str = "paper_summary";
    pub const QUALITY: &'static str = "quality_metrics";
    pub const RESEARCH_SUMMARY: &'static str = "research_summary";
    pub const REPORT: &'static str = "report";
    pub const RESEARCHER: &'static str = "researcher";
    pub const CODER: &'static str = "coder";
    pub const REVIEWER: &'static str = "reviewer";
}
