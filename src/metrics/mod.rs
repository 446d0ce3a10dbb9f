//! 研究质量指标 - 从时效性、相关性、引用潜力与多样性四个维度为检索结果打分

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use crate::types::paper::PaperRecord;

pub mod log;

pub use log::{MetricsLog, MetricsLogError, MetricsRecord};

/// 发表年份无法解析时使用的年份
pub const UNKNOWN_PUBLISHED_YEAR: i32 = 2020;
/// 摘要长度达到该值时相关性满分
const RELEVANCE_FULL_SUMMARY_CHARS: f64 = 500.0;
/// 标题词汇量达到该值时多样性满分
const DIVERSITY_FULL_VOCABULARY: f64 = 50.0;
const NO_PAPERS_ISSUE: &str = "No papers found";

/// 质量等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C")]
    C,
    #[serde(rename = "D")]
    D,
    /// 没有检索到论文
    #[serde(rename = "F")]
    F,
}

impl Grade {
    /// 按总分的阶梯函数评级，各档下界包含在内
    pub fn from_score(score: f64) -> Self {
        if score >= 9.0 {
            Grade::APlus
        } else if score >= 8.0 {
            Grade::A
        } else if score >= 7.0 {
            Grade::BPlus
        } else if score >= 6.0 {
            Grade::B
        } else if score >= 5.0 {
            Grade::C
        } else {
            Grade::D
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{}", label)
    }
}

/// 各维度得分，取值范围 [0, 10]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    pub recency: f64,
    pub relevance: f64,
    pub citation_potential: f64,
    pub diversity: f64,
}

impl QualityBreakdown {
    /// 四个维度的等权平均
    pub fn mean(&self) -> f64 {
        (self.recency + self.relevance + self.citation_potential + self.diversity) / 4.0
    }
}

/// 正常评分结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub overall_score: f64,
    pub grade: Grade,
    pub breakdown: QualityBreakdown,
    pub paper_count: usize,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// 没有论文时的提前返回结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoPapersReport {
    pub score: u8,
    pub grade: Grade,
    pub issues: Vec<String>,
}

impl Default for NoPapersReport {
    fn default() -> Self {
        Self {
            score: 0,
            grade: Grade::F,
            issues: vec![NO_PAPERS_ISSUE.to_string()],
        }
    }
}

/// 质量评分结果，两种形态序列化后的字段不同
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QualityReport {
    Scored(QualityMetrics),
    NoPapers(NoPapersReport),
}

impl QualityReport {
    pub fn grade(&self) -> Grade {
        match self {
            QualityReport::Scored(metrics) => metrics.grade,
            QualityReport::NoPapers(report) => report.grade,
        }
    }

    pub fn overall_score(&self) -> f64 {
        match self {
            QualityReport::Scored(metrics) => metrics.overall_score,
            QualityReport::NoPapers(report) => report.score as f64,
        }
    }

    pub fn paper_count(&self) -> usize {
        match self {
            QualityReport::Scored(metrics) => metrics.paper_count,
            QualityReport::NoPapers(_) => 0,
        }
    }
}

/// 研究质量评分器
#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    /// 计算时效性的参照年份，None时使用当前年份
    reference_year: Option<i32>,
}

impl QualityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 固定参照年份
    pub fn with_reference_year(year: i32) -> Self {
        Self {
            reference_year: Some(year),
        }
    }

    fn current_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// 计算论文集合的质量评分
    pub fn score(&self, papers: &[PaperRecord]) -> QualityReport {
        let has_error_marker = papers.first().is_some_and(|paper| paper.error.is_some());
        if papers.is_empty() || has_error_marker {
            return QualityReport::NoPapers(NoPapersReport::default());
        }

        let breakdown = QualityBreakdown {
            recency: self.score_recency(papers),
            relevance: score_relevance(papers),
            citation_potential: score_citation_potential(papers),
            diversity: score_diversity(papers),
        };
        let overall = breakdown.mean();

        QualityReport::Scored(QualityMetrics {
            overall_score: round_to(overall, 2),
            grade: Grade::from_score(overall),
            breakdown,
            paper_count: papers.len(),
            timestamp: Utc::now(),
        })
    }

    /// 时效性：越新越好，四年以上按年龄线性衰减
    pub fn score_recency(&self, papers: &[PaperRecord]) -> f64 {
        if papers.is_empty() {
            return 5.0;
        }
        let current_year = self.current_year();
        let total: f64 = papers
            .iter()
            .map(|paper| {
                let year = paper.published_year().unwrap_or(UNKNOWN_PUBLISHED_YEAR);
                recency_for_age(current_year - year)
            })
            .sum();
        round_to(total / papers.len() as f64, 1).min(10.0)
    }
}

/// 单篇论文按年龄的时效性得分
pub fn recency_for_age(age: i32) -> f64 {
    match age {
        0 => 10.0,
        1 => 9.0,
        2 => 7.0,
        3 => 5.0,
        _ => (10.0 - age as f64 * 1.5).max(1.0),
    }
}

/// 相关性：以平均摘要长度作为代理指标
pub fn score_relevance(papers: &[PaperRecord]) -> f64 {
    if papers.is_empty() {
        return 0.0;
    }
    let total_chars: usize = papers
        .iter()
        .map(|paper| paper.summary.chars().count())
        .sum();
    let average = total_chars as f64 / papers.len() as f64;
    let relevance = (average / RELEVANCE_FULL_SUMMARY_CHARS).min(1.0);
    round_to(relevance * 10.0, 1)
}

/// 单篇论文按作者数量的引用潜力得分
///
/// 区间有重叠，按顺序先匹配者胜出。
pub fn citation_potential_for_authors(author_count: usize) -> f64 {
    if (3..=6).contains(&author_count) {
        10.0
    } else if (2..=8).contains(&author_count) {
        8.0
    } else if author_count >= 9 {
        7.0
    } else {
        6.0
    }
}

/// 引用潜力：作者数量得分的平均
pub fn score_citation_potential(papers: &[PaperRecord]) -> f64 {
    if papers.is_empty() {
        return 5.0;
    }
    let total: f64 = papers
        .iter()
        .map(|paper| citation_potential_for_authors(paper.authors.len()))
        .sum();
    round_to(total / papers.len() as f64, 1).min(10.0)
}

/// 多样性：所有标题中不重复的小写词数量
pub fn score_diversity(papers: &[PaperRecord]) -> f64 {
    let combined = papers
        .iter()
        .map(|paper| paper.title.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let unique_words: HashSet<&str> = combined.split_whitespace().collect();
    let diversity = (unique_words.len() as f64 / DIVERSITY_FULL_VOCABULARY).min(1.0);
    round_to(diversity * 10.0, 1)
}

/// 解析时间戳，同时接受RFC 3339与不带时区的ISO 8601格式
///
/// 不带时区的时间按UTC处理。
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_timestamp(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("无法识别的时间戳: {}", value)))
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// Include tests
#[cfg(test)]
mod tests;
