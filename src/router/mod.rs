//! 自适应路由 - 根据查询的复杂度与领域特征选择处理路径
//!
//! 模型对查询在四个维度上打分（0-10），路由器从自由文本中尽力解析分数，
//! 解析不到的维度回落到默认值，整个过程永不失败。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::llm::LanguageModel;

/// 解析失败时各维度的默认分数
pub const DEFAULT_SCORE: u8 = 5;
/// 维度分数上限
pub const MAX_SCORE: u8 = 10;

const ROUTER_SYSTEM_PROMPT: &str =
    "You are a research query analyst. Rate queries honestly using integers from 0 to 10.";

/// 评分维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Complexity,
    Code,
    Literature,
    Novelty,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Complexity,
        Dimension::Code,
        Dimension::Literature,
        Dimension::Novelty,
    ];

    /// 在模型回答中查找的关键字
    pub fn keyword(&self) -> &'static str {
        match self {
            Dimension::Complexity => "complexity",
            Dimension::Code => "code",
            Dimension::Literature => "literature",
            Dimension::Novelty => "novelty",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// 分数来源：从模型回答中解析得到，或回落到默认值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreProvenance {
    Parsed,
    Defaulted,
}

/// 单个维度的分数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionScore {
    pub value: u8,
    pub provenance: ScoreProvenance,
}

impl DimensionScore {
    fn parsed(value: u8) -> Self {
        Self {
            value: value.min(MAX_SCORE),
            provenance: ScoreProvenance::Parsed,
        }
    }

    fn defaulted() -> Self {
        Self {
            value: DEFAULT_SCORE,
            provenance: ScoreProvenance::Defaulted,
        }
    }
}

/// 处理路径
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingPath {
    DeepResearch,
    CodeFocused,
    Exploratory,
    Standard,
}

impl std::fmt::Display for RoutingPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingPath::DeepResearch => write!(f, "deep_research"),
            RoutingPath::CodeFocused => write!(f, "code_focused"),
            RoutingPath::Exploratory => write!(f, "exploratory"),
            RoutingPath::Standard => write!(f, "standard"),
        }
    }
}

/// 查询分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryAnalysis {
    pub scores: BTreeMap<Dimension, u8>,
    pub provenance: BTreeMap<Dimension, ScoreProvenance>,
    pub path: RoutingPath,
    pub confidence: f64,
}

impl QueryAnalysis {
    /// 由各维度分数构建分析结果
    pub fn from_scores(scores: &BTreeMap<Dimension, DimensionScore>) -> Self {
        let values: BTreeMap<Dimension, u8> = Dimension::ALL
            .iter()
            .map(|dimension| {
                let value = scores
                    .get(dimension)
                    .map(|score| score.value)
                    .unwrap_or(DEFAULT_SCORE);
                (*dimension, value)
            })
            .collect();
        let provenance = Dimension::ALL
            .iter()
            .map(|dimension| {
                let provenance = scores
                    .get(dimension)
                    .map(|score| score.provenance)
                    .unwrap_or(ScoreProvenance::Defaulted);
                (*dimension, provenance)
            })
            .collect();

        Self {
            path: determine_path(&values),
            confidence: calculate_confidence(&values),
            scores: values,
            provenance,
        }
    }

    /// 全部维度取默认值的分析结果，置信度为0.5
    pub fn fallback() -> Self {
        Self::from_scores(&BTreeMap::new())
    }

    pub fn score(&self, dimension: Dimension) -> u8 {
        self.scores
            .get(&dimension)
            .copied()
            .unwrap_or(DEFAULT_SCORE)
    }

    /// 是否所有维度都来自模型回答
    pub fn is_fully_parsed(&self) -> bool {
        self.provenance
            .values()
            .all(|provenance| *provenance == ScoreProvenance::Parsed)
    }
}

/// 查询路由器
#[derive(Clone)]
pub struct QueryRouter {
    llm: Arc<dyn LanguageModel>,
}

impl QueryRouter {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// 分析查询并选择处理路径
    ///
    /// 模型调用不设超时，调用方负责限定等待时间。模型调用失败时返回全默认结果。
    pub async fn analyze(&self, query: &str) -> QueryAnalysis {
        let prompt = build_router_prompt(query);

        match self.llm.invoke(ROUTER_SYSTEM_PROMPT, &prompt).await {
            Ok(response) => {
                let scores = parse_scores(&response);
                let analysis = QueryAnalysis::from_scores(&scores);
                if !analysis.is_fully_parsed() {
                    tracing::debug!(
                        response = %response,
                        "部分路由维度未能解析，已使用默认分数"
                    );
                }
                analysis
            }
            Err(e) => {
                tracing::warn!("路由分析调用模型失败，使用默认分数: {}", e);
                QueryAnalysis::fallback()
            }
        }
    }
}

/// 构建打分提示词
pub fn build_router_prompt(query: &str) -> String {
    format!(
        r#"Analyze this research query and provide scores (0-10):

Query: "{query}"

Provide scores for:
1. Technical Complexity (how specialized is the topic?)
2. Code Requirement (does it need code generation?)
3. Literature Depth (how much research needed?)
4. Novelty (how cutting-edge is this topic?)

Format: complexity: X, code: X, literature: X, novelty: X

Analysis:"#
    )
}

/// 从模型的自由文本回答中解析各维度分数
///
/// 对每个维度：在小写化后的回答中找到关键字第一次出现的位置，取其后直到该关键字
/// 下一次出现之前的文本，按空白切分，取第一个以数字开头的片段（忽略片段开头的标点）
/// 的连续数字作为分数，并截断到10。找不到关键字或数字时使用默认值。
pub fn parse_scores(response: &str) -> BTreeMap<Dimension, DimensionScore> {
    let lowered = response.to_lowercase();

    Dimension::ALL
        .iter()
        .map(|dimension| {
            let score = text_after_keyword(&lowered, dimension.keyword())
                .and_then(first_digit_run)
                .map(DimensionScore::parsed)
                .unwrap_or_else(DimensionScore::defaulted);
            (*dimension, score)
        })
        .collect()
}

fn text_after_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let start = text.find(keyword)? + keyword.len();
    let rest = &text[start..];
    let end = rest.find(keyword).unwrap_or(rest.len());
    Some(&rest[..end])
}

fn first_digit_run(segment: &str) -> Option<u8> {
    segment.split_whitespace().find_map(|token| {
        let token = token.trim_start_matches(|c: char| !c.is_alphanumeric());
        let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        // 超出u64范围的数字串也远大于上限
        let value = digits.parse::<u64>().unwrap_or(u64::MAX);
        Some(value.min(MAX_SCORE as u64) as u8)
    })
}

/// 固定优先级的路径选择，先匹配者胜出
pub fn determine_path(scores: &BTreeMap<Dimension, u8>) -> RoutingPath {
    let score = |dimension: Dimension| scores.get(&dimension).copied().unwrap_or(DEFAULT_SCORE);

    if score(Dimension::Complexity) > 7 && score(Dimension::Literature) > 7 {
        RoutingPath::DeepResearch
    } else if score(Dimension::Code) > 7 {
        RoutingPath::CodeFocused
    } else if score(Dimension::Novelty) > 8 {
        RoutingPath::Exploratory
    } else {
        RoutingPath::Standard
    }
}

/// 置信度 = 四个分数之和 / 4 / 10，保留两位小数
///
/// 反映模型回答的分数高低，而非查询难度。
///
/// 按精确的百分位四舍五入：总分33得0.83，而对浮点商 `0.825` 直接保留两位小数会得到0.82。
pub fn calculate_confidence(scores: &BTreeMap<Dimension, u8>) -> f64 {
    let total: u32 = Dimension::ALL
        .iter()
        .map(|dimension| scores.get(dimension).copied().unwrap_or(DEFAULT_SCORE) as u32)
        .sum();
    // 先放大到百分位再整除，避免中间结果的浮点误差影响四舍五入
    let hundredths = total as f64 * 100.0 / (Dimension::ALL.len() as f64 * MAX_SCORE as f64);
    hundredths.round() / 100.0
}

// Include tests
#[cfg(test)]
mod tests;
