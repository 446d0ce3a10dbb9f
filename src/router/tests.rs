#[cfg(test)]
mod tests {
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use crate::llm::LanguageModel;
    use crate::router::{
        Dimension, QueryAnalysis, QueryRouter, RoutingPath, ScoreProvenance,
        build_router_prompt, calculate_confidence, determine_path, parse_scores,
    };

    struct CannedModel(Option<String>);

    #[async_trait]
    impl LanguageModel for CannedModel {
        async fn invoke(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
            self.0.clone().ok_or_else(|| anyhow!("connection refused"))
        }
    }

    fn scores(complexity: u8, code: u8, literature: u8, novelty: u8) -> BTreeMap<Dimension, u8> {
        BTreeMap::from([
            (Dimension::Complexity, complexity),
            (Dimension::Code, code),
            (Dimension::Literature, literature),
            (Dimension::Novelty, novelty),
        ])
    }

    #[test]
    fn test_parse_scores_space_separated() {
        let parsed = parse_scores("Complexity 8\nCode 3\nLiterature 9\nNovelty 6");

        assert_eq!(parsed[&Dimension::Complexity].value, 8);
        assert_eq!(parsed[&Dimension::Code].value, 3);
        assert_eq!(parsed[&Dimension::Literature].value, 9);
        assert_eq!(parsed[&Dimension::Novelty].value, 6);
        assert!(
            parsed
                .values()
                .all(|score| score.provenance == ScoreProvenance::Parsed)
        );
    }

    #[test]
    fn test_parse_scores_requested_format() {
        let parsed = parse_scores("complexity: 7, code: 2, literature: 8, novelty: 10");

        assert_eq!(parsed[&Dimension::Complexity].value, 7);
        assert_eq!(parsed[&Dimension::Code].value, 2);
        assert_eq!(parsed[&Dimension::Literature].value, 8);
        assert_eq!(parsed[&Dimension::Novelty].value, 10);
    }

    #[test]
    fn test_parse_scores_takes_leading_digits_of_fraction() {
        let parsed = parse_scores("Technical complexity: 9/10");

        assert_eq!(parsed[&Dimension::Complexity].value, 9);
        assert_eq!(
            parsed[&Dimension::Complexity].provenance,
            ScoreProvenance::Parsed
        );
    }

    #[test]
    fn test_parse_scores_clamps_to_ten() {
        let parsed = parse_scores(
            "complexity 42 code 100 literature 99999999999999999999999 novelty 10",
        );

        assert_eq!(parsed[&Dimension::Complexity].value, 10);
        assert_eq!(parsed[&Dimension::Code].value, 10);
        assert_eq!(parsed[&Dimension::Literature].value, 10);
        assert_eq!(parsed[&Dimension::Novelty].value, 10);
    }

    #[test]
    fn test_parse_scores_missing_dimension_defaults() {
        let parsed = parse_scores("complexity 9 and nothing else to say");

        assert_eq!(parsed[&Dimension::Complexity].value, 9);
        for dimension in [Dimension::Code, Dimension::Literature, Dimension::Novelty] {
            assert_eq!(parsed[&dimension].value, 5);
            assert_eq!(parsed[&dimension].provenance, ScoreProvenance::Defaulted);
        }
    }

    #[test]
    fn test_parse_scores_keyword_without_digits_defaults() {
        let parsed = parse_scores("The code requirement is high but I won't give a number.");

        assert_eq!(parsed[&Dimension::Code].value, 5);
        assert_eq!(parsed[&Dimension::Code].provenance, ScoreProvenance::Defaulted);
    }

    #[test]
    fn test_parse_scores_only_looks_until_next_occurrence() {
        // 数字出现在关键字第二次出现之后，不属于第一段
        let parsed = parse_scores("novelty is unclear. novelty 7");

        assert_eq!(parsed[&Dimension::Novelty].value, 5);
        assert_eq!(
            parsed[&Dimension::Novelty].provenance,
            ScoreProvenance::Defaulted
        );
    }

    #[test]
    fn test_parse_scores_garbage_is_all_default() {
        let parsed = parse_scores("¯\\_(ツ)_/¯ 🤷");

        assert_eq!(parsed.len(), 4);
        assert!(parsed.values().all(|score| score.value == 5));
    }

    #[test]
    fn test_parsed_values_always_in_range() {
        let responses = [
            "complexity 0 code 10 literature 11 novelty 3",
            "complexity:-4 code:+12",
            "",
            "CODE 8 CODE 9 CODE",
        ];
        for response in responses {
            for score in parse_scores(response).values() {
                assert!(score.value <= 10);
            }
        }
    }

    #[test]
    fn test_determine_path_priorities() {
        assert_eq!(determine_path(&scores(8, 0, 8, 0)), RoutingPath::DeepResearch);
        assert_eq!(determine_path(&scores(0, 8, 0, 0)), RoutingPath::CodeFocused);
        assert_eq!(determine_path(&scores(0, 0, 0, 9)), RoutingPath::Exploratory);
        assert_eq!(determine_path(&scores(5, 5, 5, 5)), RoutingPath::Standard);
    }

    #[test]
    fn test_determine_path_first_match_wins() {
        // 同时满足所有条件时，deep_research优先
        assert_eq!(
            determine_path(&scores(10, 10, 10, 10)),
            RoutingPath::DeepResearch
        );
        // 只有复杂度高时不会进入deep_research
        assert_eq!(determine_path(&scores(9, 9, 7, 10)), RoutingPath::CodeFocused);
        // 阈值是严格大于
        assert_eq!(determine_path(&scores(7, 7, 7, 8)), RoutingPath::Standard);
    }

    #[test]
    fn test_confidence_values() {
        assert_eq!(calculate_confidence(&scores(5, 5, 5, 5)), 0.5);
        assert_eq!(calculate_confidence(&scores(10, 10, 10, 10)), 1.0);
        assert_eq!(calculate_confidence(&scores(0, 0, 0, 0)), 0.0);
        assert_eq!(calculate_confidence(&scores(8, 0, 8, 0)), 0.4);
        assert_eq!(calculate_confidence(&scores(7, 8, 9, 9)), 0.83);
    }

    #[test]
    fn test_confidence_rounds_exact_half_hundredth_up() {
        // 总分33与13恰好落在半个百分位上，向上取整
        assert_eq!(calculate_confidence(&scores(9, 8, 8, 8)), 0.83);
        assert_eq!(calculate_confidence(&scores(3, 3, 3, 4)), 0.33);
    }

    #[test]
    fn test_fallback_analysis() {
        let analysis = QueryAnalysis::fallback();

        assert_eq!(analysis.path, RoutingPath::Standard);
        assert_eq!(analysis.confidence, 0.5);
        assert!(analysis.scores.values().all(|value| *value == 5));
        assert!(!analysis.is_fully_parsed());
    }

    #[test]
    fn test_router_prompt_mentions_every_dimension() {
        let prompt = build_router_prompt("graph neural networks");

        assert!(prompt.contains("\"graph neural networks\""));
        for dimension in Dimension::ALL {
            assert!(prompt.contains(dimension.keyword()));
        }
    }

    #[test]
    fn test_analysis_serializes_with_dimension_names() {
        let analysis = QueryAnalysis::fallback();
        let value = serde_json::to_value(&analysis).unwrap();

        assert_eq!(value["scores"]["complexity"], 5);
        assert_eq!(value["provenance"]["novelty"], "defaulted");
        assert_eq!(value["path"], "standard");
        assert_eq!(value["confidence"], 0.5);
    }

    #[tokio::test]
    async fn test_analyze_with_model_response() {
        let model = CannedModel(Some(
            "Analysis: complexity: 9, code: 4, literature: 8, novelty: 6".to_string(),
        ));
        let router = QueryRouter::new(Arc::new(model));

        let analysis = router.analyze("quantum error correction").await;

        assert_eq!(analysis.path, RoutingPath::DeepResearch);
        assert_eq!(analysis.score(Dimension::Code), 4);
        assert_eq!(analysis.confidence, 0.68);
        assert!(analysis.is_fully_parsed());
    }

    #[tokio::test]
    async fn test_analyze_degrades_when_model_fails() {
        let router = QueryRouter::new(Arc::new(CannedModel(None)));

        let analysis = router.analyze("anything").await;

        assert_eq!(analysis, QueryAnalysis::fallback());
    }
}
