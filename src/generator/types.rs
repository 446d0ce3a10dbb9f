use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 流水线中的智能体
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Router,
    Researcher,
    Coder,
    Reviewer,
    Presenter,
}

impl Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AgentType::Router => "router",
            AgentType::Researcher => "researcher",
            AgentType::Coder => "coder",
            AgentType::Reviewer => "reviewer",
            AgentType::Presenter => "presenter",
        };
        write!(f, "{}", name)
    }
}

impl AgentType {
    /// 控制台进度输出使用的名称
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentType::Router => "Query Router",
            AgentType::Researcher => "Researcher",
            AgentType::Coder => "Coder",
            AgentType::Reviewer => "Reviewer",
            AgentType::Presenter => "Presenter",
        }
    }
}
