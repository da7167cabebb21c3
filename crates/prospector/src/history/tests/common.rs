use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;
use url::Url;

use crate::analysis::{
    AuditMetrics, AuditScores, CompetitorInfo, FreshnessInfo, FreshnessSource as DateSource,
    PerformanceAudit, RecommendationEngine, SeoDetails, SiteAssessment, SiteInfo, SocialLinks,
};
use crate::history::{
    AnalysisId, AnalysisRecord, AnalysisRepository, AnalysisResult, AnalysisService,
    InMemoryAnalysisRepository, RepositoryError,
};
use crate::signals::{
    AuditRunner, CollectorError, CompetitorSource, DisabledCompetitorSource, FreshnessSource,
    SampleCompetitorSource, SignalCollectors, SiteInfoSource,
};

pub(super) fn audit(performance: f64) -> PerformanceAudit {
    PerformanceAudit {
        scores: AuditScores {
            performance,
            accessibility: 90.0,
            best_practices: 95.0,
            seo: 95.0,
            mobile_friendly: true,
        },
        metrics: AuditMetrics {
            first_contentful_paint: Some("1.8 s".to_string()),
            largest_contentful_paint: Some("3.9 s".to_string()),
            total_blocking_time: Some("410 ms".to_string()),
            cumulative_layout_shift: Some("0.05".to_string()),
            speed_index: Some("4.2 s".to_string()),
        },
        seo_details: SeoDetails {
            has_viewport: true,
            has_meta: true,
            has_title: true,
            has_hreflang: false,
            has_canonical: true,
            robots_txt: true,
        },
    }
}

pub(super) fn site_info() -> SiteInfo {
    SiteInfo {
        title: "Acme Plumbing".to_string(),
        description: "Licensed plumbers serving central Iowa.".to_string(),
        keywords: String::new(),
        images: 10,
        images_with_alt: 9,
        all_links: 20,
        internal_links: 15,
        external_links: 5,
        word_count: 800,
        has_structured_data: true,
        social_links: SocialLinks {
            facebook: true,
            twitter: true,
            linkedin: true,
            instagram: true,
        },
    }
}

pub(super) fn fresh(age_in_days: u32) -> FreshnessInfo {
    FreshnessInfo::Found {
        last_updated: Utc::now() - Duration::days(i64::from(age_in_days)),
        age_in_days,
        source: DateSource::HttpHeader,
    }
}

pub(super) struct FixedAudit(pub PerformanceAudit);

#[async_trait]
impl AuditRunner for FixedAudit {
    async fn audit(&self, _url: &Url) -> Result<PerformanceAudit, CollectorError> {
        Ok(self.0.clone())
    }
}

pub(super) struct FailingAudit;

#[async_trait]
impl AuditRunner for FailingAudit {
    async fn audit(&self, _url: &Url) -> Result<PerformanceAudit, CollectorError> {
        Err(CollectorError::Process(
            "lighthouse exited with 1: Chrome could not be launched".to_string(),
        ))
    }
}

pub(super) struct FixedSiteInfo(pub SiteInfo);

#[async_trait]
impl SiteInfoSource for FixedSiteInfo {
    async fn site_info(&self, _url: &Url) -> Result<SiteInfo, CollectorError> {
        Ok(self.0.clone())
    }
}

pub(super) struct FailingSiteInfo;

#[async_trait]
impl SiteInfoSource for FailingSiteInfo {
    async fn site_info(&self, url: &Url) -> Result<SiteInfo, CollectorError> {
        Err(CollectorError::Status {
            url: url.to_string(),
            status: 503,
        })
    }
}

pub(super) struct FixedFreshness(pub FreshnessInfo);

#[async_trait]
impl FreshnessSource for FixedFreshness {
    async fn last_updated(&self, _url: &Url) -> Result<FreshnessInfo, CollectorError> {
        Ok(self.0.clone())
    }
}

pub(super) struct FailingFreshness;

#[async_trait]
impl FreshnessSource for FailingFreshness {
    async fn last_updated(&self, _url: &Url) -> Result<FreshnessInfo, CollectorError> {
        Err(CollectorError::Timeout(std::time::Duration::from_secs(30)))
    }
}

pub(super) struct FailingCompetitors;

#[async_trait]
impl CompetitorSource for FailingCompetitors {
    async fn competitors(&self, _url: &Url) -> Result<Option<CompetitorInfo>, CollectorError> {
        Err(CollectorError::Parse {
            what: "competitor response",
            detail: "unexpected payload".to_string(),
        })
    }
}

/// Collectors that all succeed with the rich fixture site.
pub(super) fn healthy_collectors() -> SignalCollectors {
    SignalCollectors {
        audit: Arc::new(FixedAudit(audit(45.0))),
        site_info: Arc::new(FixedSiteInfo(site_info())),
        freshness: Arc::new(FixedFreshness(fresh(10))),
        competitors: Arc::new(DisabledCompetitorSource),
    }
}

pub(super) fn collectors_with_samples() -> SignalCollectors {
    SignalCollectors {
        competitors: Arc::new(SampleCompetitorSource),
        ..healthy_collectors()
    }
}

pub(super) fn build_service(
    collectors: SignalCollectors,
) -> (
    AnalysisService<InMemoryAnalysisRepository>,
    Arc<InMemoryAnalysisRepository>,
) {
    let repository = Arc::new(InMemoryAnalysisRepository::default());
    let service = AnalysisService::new(repository.clone(), collectors);
    (service, repository)
}

/// Stored record with a fixed timestamp, for listing tests.
pub(super) fn record(id: &str, url: &str, overall: u8, minutes_after: i64) -> AnalysisRecord {
    let base = Utc
        .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let freshness = FreshnessInfo::Found {
        last_updated: base - Duration::days(10),
        age_in_days: 10,
        source: DateSource::HttpHeader,
    };
    let assessment = SiteAssessment::evaluate(
        &RecommendationEngine::default(),
        &audit(45.0),
        &site_info(),
        &freshness,
    );
    let mut overall_score = assessment.overall_score;
    overall_score.overall = overall;

    AnalysisRecord::from_result(AnalysisResult {
        id: AnalysisId(id.to_string()),
        url: url.to_string(),
        overall_score,
        lighthouse_results: audit(45.0),
        site_info: site_info().into(),
        last_updated: freshness,
        competitor_info: None,
        recommendations: assessment.recommendations,
        timestamp: base + Duration::minutes(minutes_after),
    })
}

pub(super) fn seed(repository: &InMemoryAnalysisRepository) {
    for record in [
        record("a1", "https://acme-plumbing.test/", 72, 0),
        record("a2", "https://Blog.Example.com/post", 41, 10),
        record("a3", "https://shop.example.com/", 90, 20),
        record("a4", "https://example.org/about", 72, 30),
    ] {
        repository.insert(record).expect("seed record");
    }
}

/// Repository whose storage is always down.
pub(super) struct UnavailableRepository;

impl AnalysisRepository for UnavailableRepository {
    fn insert(&self, _record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }

    fn fetch(&self, _id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }

    fn all(&self) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }

    fn delete(&self, _id: &AnalysisId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
