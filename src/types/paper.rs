use serde::{Deserialize, Deserializer, Serialize};

/// 入库时摘要的默认最大字符数
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 500;

/// 论文来源索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaperSource {
    /// 主索引
    #[default]
    Arxiv,
    /// 辅助索引
    Scholar,
}

impl PaperSource {
    pub fn badge(&self) -> &'static str {
        match self {
            PaperSource::Arxiv => "📄 ArXiv",
            PaperSource::Scholar => "🎓 Scholar",
        }
    }
}

impl std::fmt::Display for PaperSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaperSource::Arxiv => write!(f, "arxiv"),
            PaperSource::Scholar => write!(f, "scholar"),
        }
    }
}

/// 检索得到的论文记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PaperRecord {
    #[serde(default)]
    pub title: String,
    /// 作者列表，单个字符串会被规范化为单元素列表
    #[serde(default, deserialize_with = "deserialize_authors")]
    pub authors: Vec<String>,
    #[serde(default)]
    pub summary: String,
    /// 发表日期，形如 `2024-05-01`
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub pdf_url: String,
    #[serde(default)]
    pub source: PaperSource,
    /// 索引返回的错误标记
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PaperRecord {
    /// 创建记录，摘要按字符数截断
    pub fn new(
        title: impl Into<String>,
        authors: Vec<String>,
        summary: &str,
        published: impl Into<String>,
        pdf_url: impl Into<String>,
        source: PaperSource,
        summary_max_chars: usize,
    ) -> Self {
        Self {
            title: title.into(),
            authors,
            summary: truncate_chars(summary, summary_max_chars),
            published: published.into(),
            pdf_url: pdf_url.into(),
            source,
            error: None,
        }
    }

    /// 发表年份，无法解析时返回None
    pub fn published_year(&self) -> Option<i32> {
        self.published.get(..4).and_then(|year| year.parse().ok())
    }
}

/// 按字符（而非字节）截断
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AuthorsField {
    One(String),
    Many(Vec<String>),
    Other(serde_json::Value),
}

fn deserialize_authors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match AuthorsField::deserialize(deserializer)? {
        AuthorsField::One(author) => vec![author],
        AuthorsField::Many(authors) => authors,
        AuthorsField::Other(serde_json::Value::Null) => Vec::new(),
        AuthorsField::Other(_) => vec!["Unknown".to_string()],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_is_capped_at_ingestion() {
        let long_summary = "a".repeat(900);
        let paper = PaperRecord::new(
            "Title",
            vec![],
            &long_summary,
            "2024-01-01",
            "",
            PaperSource::Arxiv,
            DEFAULT_SUMMARY_MAX_CHARS,
        );

        assert_eq!(paper.summary.chars().count(), 500);
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("多智能体系统", 3), "多智能");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_authors_scalar_is_normalized() {
        let paper: PaperRecord =
            serde_json::from_str(r#"{"title": "T", "authors": "Ada Lovelace"}"#).unwrap();
        assert_eq!(paper.authors, vec!["Ada Lovelace".to_string()]);

        let paper: PaperRecord =
            serde_json::from_str(r#"{"title": "T", "authors": ["A", "B"]}"#).unwrap();
        assert_eq!(paper.authors.len(), 2);

        let paper: PaperRecord = serde_json::from_str(r#"{"title": "T", "authors": 42}"#).unwrap();
        assert_eq!(paper.authors, vec!["Unknown".to_string()]);

        let paper: PaperRecord = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert!(paper.authors.is_empty());
    }

    #[test]
    fn test_published_year() {
        let mut paper = PaperRecord {
            published: "2023-07-14".to_string(),
            ..Default::default()
        };
        assert_eq!(paper.published_year(), Some(2023));

        paper.published = "n/a".to_string();
        assert_eq!(paper.published_year(), None);
    }

    #[test]
    fn test_source_serialization() {
        assert_eq!(
            serde_json::to_value(PaperSource::Scholar).unwrap(),
            serde_json::json!("scholar")
        );
        assert_eq!(PaperSource::Arxiv.to_string(), "arxiv");
    }
}
