//! 论文检索 - 主索引（arXiv）与辅助索引（Semantic Scholar）的合并检索

use anyhow::Result;
use async_trait::async_trait;
use chrono::Datelike;
use std::sync::Arc;
use std::time::Duration;

use crate::config::SearchConfig;
use crate::types::paper::{PaperRecord, PaperSource, truncate_chars};

pub mod arxiv;
pub mod enhancer;
pub mod scholar;

pub use arxiv::ArxivIndex;
pub use enhancer::QueryEnhancer;
pub use scholar::ScholarIndex;

/// 摘要展示时的最大字符数
const SUMMARY_PREVIEW_CHARS: usize = 200;
/// 展示的作者数量
const AUTHORS_PREVIEW: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("检索请求失败: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{index} 返回异常状态码 {status}")]
    Status { index: PaperSource, status: u16 },
    #[error("检索结果解析失败: {0}")]
    Parse(String),
    #[error("检索服务返回错误: {0}")]
    Api(String),
}

/// 论文索引协作方
#[async_trait]
pub trait PaperIndex: Send + Sync {
    fn source(&self) -> PaperSource;

    async fn search(&self, query: &str, max_results: usize)
    -> Result<Vec<PaperRecord>, SearchError>;
}

/// 合并主索引与辅助索引的检索工具
#[derive(Clone)]
pub struct PaperSearchTool {
    primary: Arc<dyn PaperIndex>,
    secondary: Option<Arc<dyn PaperIndex>>,
    config: SearchConfig,
}

impl PaperSearchTool {
    pub fn new(
        primary: Arc<dyn PaperIndex>,
        secondary: Option<Arc<dyn PaperIndex>>,
        config: SearchConfig,
    ) -> Self {
        Self {
            primary,
            secondary,
            config,
        }
    }

    /// 按配置创建访问真实检索服务的工具
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("imara-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let primary: Arc<dyn PaperIndex> = Arc::new(ArxivIndex::new(
            http.clone(),
            &config.arxiv_base_url,
            config.summary_max_chars,
        ));
        let secondary: Option<Arc<dyn PaperIndex>> = config.secondary_enabled.then(|| {
            Arc::new(ScholarIndex::new(
                http,
                &config.scholar_base_url,
                config.summary_max_chars,
            )) as Arc<dyn PaperIndex>
        });

        Ok(Self::new(primary, secondary, config.clone()))
    }

    /// 并发检索两个索引
    ///
    /// 主索引结果在前、辅助索引结果追加在后，再截断到 `max_results`。
    /// 单个索引失败只记录警告并视为空结果。
    pub async fn search_papers(&self, query: &str) -> Vec<PaperRecord> {
        let primary = search_index(self.primary.as_ref(), query, self.config.max_primary);
        let secondary = async {
            match &self.secondary {
                Some(index) => search_index(index.as_ref(), query, self.config.max_secondary).await,
                None => Vec::new(),
            }
        };
        let (mut papers, secondary_papers) = tokio::join!(primary, secondary);
        papers.extend(secondary_papers);

        if self.config.recent_only && !papers.is_empty() {
            let current_year = chrono::Local::now().year();
            papers.retain(|paper| {
                paper
                    .published_year()
                    .is_some_and(|year| year >= current_year - 3)
            });
        }

        papers.truncate(self.config.max_results);
        papers
    }
}

async fn search_index(index: &dyn PaperIndex, query: &str, max_results: usize) -> Vec<PaperRecord> {
    if max_results == 0 {
        return Vec::new();
    }
    match index.search(query, max_results).await {
        Ok(papers) => {
            tracing::debug!(index = %index.source(), count = papers.len(), "检索完成");
            papers
        }
        Err(e) => {
            tracing::warn!(index = %index.source(), "论文检索失败: {}", e);
            Vec::new()
        }
    }
}

/// 将论文列表格式化为Markdown摘要
pub fn format_paper_summary(papers: &[PaperRecord]) -> String {
    if papers.is_empty() || papers[0].error.is_some() {
        return "No papers found or error occurred.".to_string();
    }

    let mut summary = String::from("## Found Research Papers:\n\n");
    for (i, paper) in papers.iter().enumerate() {
        let authors = if paper.authors.is_empty() {
            "Unknown".to_string()
        } else {
            paper
                .authors
                .iter()
                .take(AUTHORS_PREVIEW)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };

        summary.push_str(&format!(
            "**{}. {}** {}\n",
            i + 1,
            paper.title,
            paper.source.badge()
        ));
        summary.push_str(&format!("   - Authors: {}\n", authors));
        summary.push_str(&format!("   - Published: {}\n", paper.published));
        summary.push_str(&format!(
            "   - Summary: {}...\n\n",
            truncate_chars(&paper.summary, SUMMARY_PREVIEW_CHARS)
        ));
    }
    summary
}
