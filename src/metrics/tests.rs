#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use crate::metrics::{
        Grade, MetricsLog, NoPapersReport, QualityReport, QualityScorer,
        citation_potential_for_authors, recency_for_age, score_citation_potential,
        parse_timestamp, score_diversity, score_relevance,
    };
    use crate::types::paper::{PaperRecord, PaperSource};

    const REFERENCE_YEAR: i32 = 2026;

    fn paper(title: &str, author_count: usize, summary_chars: usize, published: &str) -> PaperRecord {
        PaperRecord {
            title: title.to_string(),
            authors: (0..author_count).map(|i| format!("Author {}", i)).collect(),
            summary: "s".repeat(summary_chars),
            published: published.to_string(),
            pdf_url: String::new(),
            source: PaperSource::Arxiv,
            error: None,
        }
    }

    fn published_in(year: i32) -> PaperRecord {
        paper("Title", 3, 100, &format!("{}-03-01", year))
    }

    fn approx_eq(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-9
    }

    #[test]
    fn test_empty_papers_returns_no_papers_shape() {
        let report = QualityScorer::with_reference_year(REFERENCE_YEAR).score(&[]);

        assert_eq!(report, QualityReport::NoPapers(NoPapersReport::default()));
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({"score": 0, "grade": "F", "issues": ["No papers found"]})
        );
    }

    #[test]
    fn test_error_marker_returns_no_papers_shape() {
        let mut failed = published_in(2025);
        failed.error = Some("index unavailable".to_string());

        let report = QualityScorer::with_reference_year(REFERENCE_YEAR)
            .score(&[failed, published_in(2026)]);

        assert_eq!(report.grade(), Grade::F);
        assert_eq!(report.paper_count(), 0);
        assert_eq!(report.overall_score(), 0.0);
    }

    #[test]
    fn test_recency_by_age() {
        let scorer = QualityScorer::with_reference_year(REFERENCE_YEAR);

        assert_eq!(scorer.score_recency(&[published_in(2026)]), 10.0);
        assert_eq!(scorer.score_recency(&[published_in(2025)]), 9.0);
        assert_eq!(scorer.score_recency(&[published_in(2024)]), 7.0);
        assert_eq!(scorer.score_recency(&[published_in(2023)]), 5.0);
        assert_eq!(scorer.score_recency(&[published_in(2021)]), 2.5);
        assert_eq!(recency_for_age(20), 1.0);
    }

    #[test]
    fn test_recency_averages_and_clamps() {
        let scorer = QualityScorer::with_reference_year(REFERENCE_YEAR);

        assert_eq!(
            scorer.score_recency(&[published_in(2026), published_in(2025)]),
            9.5
        );
        // 未来年份的单篇得分超过10，平均后截断
        assert_eq!(scorer.score_recency(&[published_in(2027)]), 10.0);
    }

    #[test]
    fn test_recency_unparseable_year_uses_sentinel() {
        let scorer = QualityScorer::with_reference_year(REFERENCE_YEAR);
        let unknown = paper("Title", 3, 100, "unknown");

        // 2020年，距参照年份6年：max(1, 10 - 9) = 1
        assert_eq!(scorer.score_recency(&[unknown]), 1.0);
    }

    #[test]
    fn test_relevance_is_summary_length_proxy() {
        assert_eq!(score_relevance(&[paper("T", 3, 500, "2026")]), 10.0);
        assert_eq!(score_relevance(&[paper("T", 3, 250, "2026")]), 5.0);
        assert_eq!(
            score_relevance(&[paper("T", 3, 100, "2026"), paper("T", 3, 200, "2026")]),
            3.0
        );
        assert_eq!(score_relevance(&[paper("T", 3, 2000, "2026")]), 10.0);
        assert_eq!(score_relevance(&[paper("T", 3, 0, "2026")]), 0.0);
    }

    #[test]
    fn test_citation_potential_bands() {
        let counts = [1, 2, 3, 5, 6, 9];
        let expected = [6.0, 8.0, 10.0, 10.0, 10.0, 7.0];

        for (count, expected) in counts.iter().zip(expected) {
            assert_eq!(citation_potential_for_authors(*count), expected);
        }
        assert_eq!(citation_potential_for_authors(0), 6.0);
        assert_eq!(citation_potential_for_authors(7), 8.0);
        assert_eq!(citation_potential_for_authors(8), 8.0);
        assert_eq!(citation_potential_for_authors(40), 7.0);
    }

    #[test]
    fn test_citation_potential_average() {
        let papers = [paper("T", 4, 10, "2026"), paper("T", 1, 10, "2026")];
        assert_eq!(score_citation_potential(&papers), 8.0);
    }

    #[test]
    fn test_diversity_counts_unique_lowercase_words() {
        let papers = [
            paper("Graph Neural Networks", 3, 10, "2026"),
            paper("graph networks at scale", 3, 10, "2026"),
        ];
        // graph, neural, networks, at, scale
        assert_eq!(score_diversity(&papers), 1.0);

        let wide_title = (0..80)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(score_diversity(&[paper(&wide_title, 3, 10, "2026")]), 10.0);
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(9.0), Grade::APlus);
        assert_eq!(Grade::from_score(8.99), Grade::A);
        assert_eq!(Grade::from_score(8.0), Grade::A);
        assert_eq!(Grade::from_score(7.0), Grade::BPlus);
        assert_eq!(Grade::from_score(6.5), Grade::B);
        assert_eq!(Grade::from_score(5.0), Grade::C);
        assert_eq!(Grade::from_score(4.99), Grade::D);
        assert_eq!(Grade::from_score(0.0), Grade::D);
    }

    #[test]
    fn test_grade_serializes_as_letter() {
        assert_eq!(serde_json::to_value(Grade::APlus).unwrap(), json!("A+"));
        assert_eq!(serde_json::to_value(Grade::BPlus).unwrap(), json!("B+"));
        assert_eq!(Grade::APlus.to_string(), "A+");
    }

    #[test]
    fn test_full_score() {
        let papers = [
            paper("Graph Neural Networks for Molecules", 4, 500, "2026-02-01"),
            paper("Scalable graph learning", 1, 250, "2025-06-01"),
        ];

        let report = QualityScorer::with_reference_year(REFERENCE_YEAR).score(&papers);
        let QualityReport::Scored(metrics) = report else {
            panic!("expected a scored report");
        };

        assert_eq!(metrics.breakdown.recency, 9.5);
        assert_eq!(metrics.breakdown.relevance, 7.5);
        assert_eq!(metrics.breakdown.citation_potential, 8.0);
        assert_eq!(metrics.breakdown.diversity, 1.4);
        assert!(approx_eq(metrics.overall_score, 6.6));
        assert_eq!(metrics.grade, Grade::B);
        assert_eq!(metrics.paper_count, 2);
    }

    #[test]
    fn test_scored_report_shape() {
        let report = QualityScorer::with_reference_year(REFERENCE_YEAR)
            .score(&[paper("One title", 3, 500, "2026-01-01")]);
        let value = serde_json::to_value(&report).unwrap();

        for key in ["overall_score", "grade", "breakdown", "paper_count", "timestamp"] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        for key in ["recency", "relevance", "citation_potential", "diversity"] {
            assert!(value["breakdown"].get(key).is_some(), "missing breakdown {}", key);
        }
        assert!(value.get("issues").is_none());
    }

    #[test]
    fn test_report_deserializes_both_shapes() {
        let no_papers: QualityReport =
            serde_json::from_value(json!({"score": 0, "grade": "F", "issues": ["No papers found"]}))
                .unwrap();
        assert!(matches!(no_papers, QualityReport::NoPapers(_)));

        let scored = QualityScorer::with_reference_year(REFERENCE_YEAR)
            .score(&[published_in(2026)]);
        let roundtrip: QualityReport =
            serde_json::from_value(serde_json::to_value(&scored).unwrap()).unwrap();
        assert_eq!(roundtrip, scored);
    }

    #[test]
    fn test_log_append_then_load_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let log = MetricsLog::new(temp_dir.path().join("data").join("metrics.jsonl"));
        let scorer = QualityScorer::with_reference_year(REFERENCE_YEAR);

        let first = log
            .append("first query", &scorer.score(&[published_in(2025)]))
            .unwrap();
        let second = log.append("second query", &scorer.score(&[])).unwrap();
        let third = log
            .append("third query", &scorer.score(&[published_in(2026), published_in(2024)]))
            .unwrap();

        let loaded = log.load().unwrap();
        assert_eq!(loaded, vec![first, second, third]);

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_log_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let log = MetricsLog::new(temp_dir.path().join("absent.jsonl"));

        assert!(log.load().unwrap().is_empty());
    }

    #[test]
    fn test_log_skips_corrupt_lines() {
        let temp_dir = TempDir::new().unwrap();
        let log = MetricsLog::new(temp_dir.path().join("metrics.jsonl"));
        let scorer = QualityScorer::with_reference_year(REFERENCE_YEAR);

        let first = log.append("kept", &scorer.score(&[])).unwrap();
        {
            use std::io::Write;
            let mut file = std::fs::OpenOptions::new()
                .append(true)
                .open(log.path())
                .unwrap();
            writeln!(file, "{{not json").unwrap();
            writeln!(file).unwrap();
        }
        let second = log.append("also kept", &scorer.score(&[])).unwrap();

        assert_eq!(log.load().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_log_reads_legacy_json_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metrics.json");
        std::fs::write(
            &path,
            r#"[
  {
    "query": "multi-agent systems",
    "metrics": {"score": 0, "grade": "F", "issues": ["No papers found"]},
    "timestamp": "2025-03-01T10:00:00Z"
  }
]"#,
        )
        .unwrap();

        let records = MetricsLog::new(&path).load().unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].query, "multi-agent systems");
        assert_eq!(records[0].metrics.grade(), Grade::F);
    }

    /// 旧版系统写出的记录：时间戳不带时区，整文件 `indent=2` 且没有结尾换行
    const LEGACY_LOG: &str = r#"[
  {
    "query": "retrieval augmented generation",
    "metrics": {
      "overall_score": 7.45,
      "grade": "B+",
      "breakdown": {
        "recency": 9.0,
        "relevance": 6.2,
        "citation_potential": 8.4,
        "diversity": 6.2
      },
      "paper_count": 7,
      "timestamp": "2025-03-01T10:00:00.123456"
    },
    "timestamp": "2025-03-01T10:00:00.123789"
  },
  {
    "query": "broken entry",
    "metrics": {"score": 0, "grade": "F", "issues": ["No papers found"]},
    "timestamp": "yesterday"
  },
  {
    "query": "obscure topic",
    "metrics": {
      "score": 0,
      "grade": "F",
      "issues": ["No papers found"]
    },
    "timestamp": "2025-03-02T08:30:00"
  }
]"#;

    #[test]
    fn test_parse_timestamp_accepts_naive_and_offset_forms() {
        let naive = parse_timestamp("2025-03-01T10:00:00.123456").unwrap();
        assert_eq!(naive.to_rfc3339(), "2025-03-01T10:00:00.123456+00:00");

        let whole_seconds = parse_timestamp("2025-03-02T08:30:00").unwrap();
        assert_eq!(whole_seconds.to_rfc3339(), "2025-03-02T08:30:00+00:00");

        let offset = parse_timestamp("2025-03-01T12:00:00+02:00").unwrap();
        assert_eq!(offset.to_rfc3339(), "2025-03-01T10:00:00+00:00");

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_log_reads_legacy_records_with_naive_timestamps() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metrics.json");
        std::fs::write(&path, LEGACY_LOG).unwrap();

        let records = MetricsLog::new(&path).load().unwrap();

        // 无法解析的元素被跳过，其余记录保持原顺序
        let queries: Vec<&str> = records.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["retrieval augmented generation", "obscure topic"]);
        assert_eq!(records[0].metrics.grade(), Grade::BPlus);
        assert_eq!(records[0].metrics.overall_score(), 7.45);
        assert_eq!(records[0].metrics.paper_count(), 7);
        assert_eq!(
            records[0].timestamp,
            parse_timestamp("2025-03-01T10:00:00.123789").unwrap()
        );
        assert_eq!(records[1].metrics.grade(), Grade::F);
    }

    #[test]
    fn test_log_append_after_legacy_array_keeps_all_records() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metrics.json");
        std::fs::write(&path, LEGACY_LOG).unwrap();
        let log = MetricsLog::new(&path);
        let scorer = QualityScorer::with_reference_year(REFERENCE_YEAR);

        let first = log.append("new query", &scorer.score(&[published_in(2026)])).unwrap();
        let second = log.append("another query", &scorer.score(&[])).unwrap();

        let records = log.load().unwrap();

        let queries: Vec<&str> = records.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(
            queries,
            vec![
                "retrieval augmented generation",
                "obscure topic",
                "new query",
                "another query"
            ]
        );
        assert_eq!(records[2], first);
        assert_eq!(records[3], second);
    }

    #[test]
    fn test_log_concurrent_appends_keep_every_record() {
        const WRITERS: usize = 16;
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("metrics.jsonl");

        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let log = MetricsLog::new(&path);
                std::thread::spawn(move || {
                    let report = QualityScorer::with_reference_year(REFERENCE_YEAR)
                        .score(&[published_in(2025), published_in(2026)]);
                    log.append(&format!("query {}", i), &report).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let records = MetricsLog::new(&path).load().unwrap();
        assert_eq!(records.len(), WRITERS);

        let mut queries: Vec<String> = records.into_iter().map(|r| r.query).collect();
        queries.sort();
        let mut expected: Vec<String> = (0..WRITERS).map(|i| format!("query {}", i)).collect();
        expected.sort();
        assert_eq!(queries, expected);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), WRITERS);
    }
}
