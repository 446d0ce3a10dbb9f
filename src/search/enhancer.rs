/// 查询增强器 - 为检索语句补充时效与质量关键词
#[derive(Debug, Clone)]
pub struct QueryEnhancer {
    year_keywords: Vec<String>,
}

impl Default for QueryEnhancer {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryEnhancer {
    pub fn new() -> Self {
        Self {
            year_keywords: ["2024", "2025", "recent", "latest"]
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
        }
    }

    pub fn enhance_query(&self, query: &str) -> String {
        let lowered = query.to_lowercase();
        let mut enhanced = query.to_string();

        if !self
            .year_keywords
            .iter()
            .any(|keyword| lowered.contains(keyword.as_str()))
        {
            enhanced.push_str(" 2024 2025");
        }

        enhanced.push_str(" AND (abs:state-of-the-art OR abs:novel OR abs:recent)");
        enhanced
    }
}
