pub mod agent_executor;
pub mod agents;
pub mod context;
pub mod memory;
pub mod orchestrator;
pub mod outlet;
pub mod step_forward_agent;
pub mod types;
pub mod workflow;
