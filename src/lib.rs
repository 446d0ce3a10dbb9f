pub mod cache;
pub mod cli;
pub mod config;
pub mod generator;
pub mod i18n;
pub mod llm;
pub mod logging;
pub mod memory;
pub mod metrics;
pub mod router;
pub mod search;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use generator::agents::ResearchReport;
pub use generator::workflow::{launch, run_research};
pub use metrics::{QualityReport, QualityScorer};
pub use router::{QueryAnalysis, QueryRouter};
