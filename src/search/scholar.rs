//! Semantic Scholar 辅助索引

use async_trait::async_trait;
use serde::Deserialize;

use super::{PaperIndex, SearchError};
use crate::types::paper::{PaperRecord, PaperSource};

const REQUESTED_FIELDS: &str = "title,authors,abstract,year,url,openAccessPdf";
const UNKNOWN_TITLE: &str = "Unknown";
const MISSING_ABSTRACT: &str = "No abstract available";
/// 缺少年份时使用的发表日期
const UNKNOWN_PUBLISHED: &str = "2024-01-01";

#[derive(Debug, Deserialize)]
pub struct ScholarResponse {
    #[serde(default)]
    pub data: Vec<ScholarPaper>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarPaper {
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<ScholarAuthor>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub year: Option<i32>,
    pub url: Option<String>,
    pub open_access_pdf: Option<OpenAccessPdf>,
}

#[derive(Debug, Deserialize)]
pub struct ScholarAuthor {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpenAccessPdf {
    pub url: Option<String>,
}

impl ScholarPaper {
    /// 转换为统一的论文记录，缺失字段取默认值
    pub fn into_record(self, summary_max_chars: usize) -> PaperRecord {
        let mut authors: Vec<String> = self
            .authors
            .into_iter()
            .filter_map(|author| author.name)
            .filter(|name| !name.trim().is_empty())
            .collect();
        if authors.is_empty() {
            authors.push("Unknown".to_string());
        }

        let published = self
            .year
            .map(|year| format!("{}-01-01", year))
            .unwrap_or_else(|| UNKNOWN_PUBLISHED.to_string());
        let pdf_url = self
            .open_access_pdf
            .and_then(|pdf| pdf.url)
            .filter(|url| !url.is_empty())
            .or(self.url)
            .unwrap_or_default();
        let summary = self
            .abstract_text
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| MISSING_ABSTRACT.to_string());

        PaperRecord::new(
            self.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            authors,
            &summary,
            published,
            pdf_url,
            PaperSource::Scholar,
            summary_max_chars,
        )
    }
}

pub struct ScholarIndex {
    http: reqwest::Client,
    base_url: String,
    summary_max_chars: usize,
}

impl ScholarIndex {
    pub fn new(http: reqwest::Client, base_url: &str, summary_max_chars: usize) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            summary_max_chars,
        }
    }
}

#[async_trait]
impl PaperIndex for ScholarIndex {
    fn source(&self) -> PaperSource {
        PaperSource::Scholar
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<PaperRecord>, SearchError> {
        let limit = max_results.to_string();
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("query", query),
                ("limit", limit.as_str()),
                ("fields", REQUESTED_FIELDS),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                index: PaperSource::Scholar,
                status: status.as_u16(),
            });
        }

        let body: ScholarResponse = response.json().await?;
        Ok(body
            .data
            .into_iter()
            .take(max_results)
            .map(|paper| paper.into_record(self.summary_max_chars))
            .collect())
    }
}
