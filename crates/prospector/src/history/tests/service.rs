use super::common::*;
use std::sync::Arc;

use crate::analysis::{
    FreshnessInfo, MetricComparison, Priority, RecommendationCategory, RecommendationEngine,
    RecommendationPolicy, SiteInfoReport,
};
use crate::history::{
    AnalysisId, AnalysisRepository, AnalysisService, AnalysisServiceError, HistorySort,
    RepositoryError,
};
use crate::signals::{CollectorError, SignalCollectors};

#[tokio::test]
async fn analyze_scores_and_stores_the_result() {
    let (service, repository) = build_service(healthy_collectors());

    let result = service
        .analyze("https://acme-plumbing.test")
        .await
        .expect("analysis succeeds");

    assert_eq!(result.url, "https://acme-plumbing.test/");
    assert_eq!(result.overall_score.overall, 84);
    assert_eq!(result.recommendations.len(), 1);
    assert_eq!(
        result.recommendations[0].category,
        RecommendationCategory::Performance
    );
    assert_eq!(result.recommendations[0].priority, Priority::High);
    assert!(result.competitor_info.is_none());

    let stored = repository
        .fetch(&result.id)
        .expect("repository available")
        .expect("record stored");
    assert_eq!(stored.overall_score, 84);
    assert_eq!(stored.analysis, result);
}

#[tokio::test]
async fn analyze_rejects_non_http_urls_before_collecting() {
    let (service, repository) = build_service(healthy_collectors());

    for raw in ["", "   ", "not a url", "ftp://example.com/file", "mailto:team@example.com"] {
        let err = service.analyze(raw).await.expect_err("url rejected");
        assert!(
            matches!(err, AnalysisServiceError::InvalidUrl(_)),
            "{raw:?} produced {err:?}"
        );
    }
    assert!(repository.all().expect("available").is_empty());
}

#[tokio::test]
async fn audit_failure_aborts_the_analysis() {
    let collectors = SignalCollectors {
        audit: Arc::new(FailingAudit),
        ..healthy_collectors()
    };
    let (service, repository) = build_service(collectors);

    let err = service
        .analyze("https://example.com")
        .await
        .expect_err("audit is required");

    assert!(matches!(
        err,
        AnalysisServiceError::Audit(CollectorError::Process(_))
    ));
    assert!(repository.all().expect("available").is_empty());
}

#[tokio::test]
async fn secondary_collector_failures_degrade_to_defaults() {
    let collectors = SignalCollectors {
        site_info: Arc::new(FailingSiteInfo),
        freshness: Arc::new(FailingFreshness),
        competitors: Arc::new(FailingCompetitors),
        ..healthy_collectors()
    };
    let (service, _) = build_service(collectors);

    let result = service
        .analyze("https://example.com/pricing")
        .await
        .expect("analysis still completes");

    match &result.site_info {
        SiteInfoReport::Failed { error, details } => {
            assert_eq!(error, "Failed to get site info");
            assert!(details.contains("503"));
        }
        other => panic!("expected failed site info, got {other:?}"),
    }
    assert!(matches!(
        &result.last_updated,
        FreshnessInfo::NotFound { reason: Some(reason) } if reason.contains("30s")
    ));
    assert!(result.competitor_info.is_none());
    // unknown freshness scores 50 and an empty page earns no content points
    assert_eq!(result.overall_score.breakdown.freshness.score, 50.0);
    assert_eq!(result.overall_score.breakdown.content.score, 0.0);
}

#[tokio::test]
async fn sample_competitors_are_passed_through_unscored() {
    let (with_samples, _) = build_service(collectors_with_samples());
    let (without, _) = build_service(healthy_collectors());

    let sampled = with_samples
        .analyze("https://example.com")
        .await
        .expect("analysis succeeds");
    let plain = without
        .analyze("https://example.com")
        .await
        .expect("analysis succeeds");

    let info = sampled.competitor_info.expect("sample data attached");
    assert!(info.sample);
    assert_eq!(sampled.overall_score, plain.overall_score);
}

#[tokio::test]
async fn repository_failures_surface_from_analyze() {
    let service = AnalysisService::new(Arc::new(UnavailableRepository), healthy_collectors());

    let err = service
        .analyze("https://example.com")
        .await
        .expect_err("storage is down");
    assert!(matches!(
        err,
        AnalysisServiceError::Repository(RepositoryError::Unavailable(_))
    ));
}

#[test]
fn get_and_delete_report_missing_records() {
    let (service, repository) = build_service(healthy_collectors());
    seed(&repository);

    let id = AnalysisId("a2".to_string());
    assert_eq!(service.get(&id).expect("record exists").overall_score, 41);

    service.delete(&id).expect("delete succeeds");
    assert!(matches!(
        service.get(&id),
        Err(AnalysisServiceError::Repository(RepositoryError::NotFound))
    ));
    assert!(matches!(
        service.delete(&id),
        Err(AnalysisServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn history_uses_configured_limit_and_clear_empties_it() {
    let (service, repository) = build_service(healthy_collectors());
    let service = service.with_history_limit(2);
    seed(&repository);

    let entries = service
        .history(&service.default_query())
        .expect("history available");
    let ids: Vec<&str> = entries.iter().map(|entry| entry.id.0.as_str()).collect();
    assert_eq!(ids, vec!["a4", "a3"]);

    service.clear().expect("clear succeeds");
    let query = service.default_query().with_sort(HistorySort::ScoreAsc);
    assert!(service.history(&query).expect("available").is_empty());
}

#[test]
fn history_records_follow_the_query_and_keep_full_analyses() {
    let (service, repository) = build_service(healthy_collectors());
    seed(&repository);

    let query = service
        .default_query()
        .with_search("example.com")
        .with_sort(HistorySort::ScoreDesc);
    let records = service.history_records(&query).expect("history available");
    let ids: Vec<&str> = records.iter().map(|record| record.id.0.as_str()).collect();
    assert_eq!(ids, vec!["a3", "a2"]);
    assert_eq!(records[0].analysis.id, records[0].id);

    let entries = service.history(&query).expect("history available");
    let summaries: Vec<_> = records.iter().map(|record| record.entry()).collect();
    assert_eq!(entries, summaries);
}

#[test]
fn score_uses_the_configured_policy() {
    let (service, _) = build_service(healthy_collectors());
    let service = service.with_engine(RecommendationEngine::new(RecommendationPolicy {
        metric_comparison: MetricComparison::Lexicographic,
    }));
    assert_eq!(
        service.engine().policy().metric_comparison,
        MetricComparison::Lexicographic
    );

    let signals = crate::analysis::CollectedSignals {
        lighthouse_results: audit(45.0),
        site_info: site_info().into(),
        last_updated: fresh(3),
    };
    let assessment = service.score(&signals);
    assert_eq!(assessment.overall_score.overall, 86);
    assert_eq!(assessment.recommendations.len(), 1);
}
