//! Scoring and recommendation engine.
//!
//! Pure functions over the collected signals: nothing here performs I/O or
//! fails. Missing data is absorbed into policy defaults so every analysis
//! produces a complete, displayable result.

pub mod domain;
pub mod recommendations;
pub mod scoring;

#[cfg(test)]
mod tests;

pub use domain::{
    AuditMetrics, AuditScores, Competitor, CompetitorInfo, FreshnessInfo, FreshnessSource,
    KeywordRanking, PerformanceAudit, SeoDetails, SiteInfo, SiteInfoReport, SocialLinks,
};
pub use recommendations::{
    generate_recommendations, MetricComparison, Priority, Recommendation,
    RecommendationCategory, RecommendationEngine, RecommendationPolicy,
};
pub use scoring::{
    compute_overall_score, CategoryBreakdown, CategoryScore, ScoreBreakdown, ScoreCategory,
};

use serde::{Deserialize, Serialize};

/// Score and recommendations for one set of signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAssessment {
    pub overall_score: ScoreBreakdown,
    pub recommendations: Vec<Recommendation>,
}

impl SiteAssessment {
    pub fn evaluate(
        engine: &RecommendationEngine,
        audit: &PerformanceAudit,
        site_info: &SiteInfo,
        freshness: &FreshnessInfo,
    ) -> Self {
        Self {
            overall_score: compute_overall_score(audit, site_info, freshness),
            recommendations: engine.generate(audit, site_info, freshness),
        }
    }
}

/// Previously collected signals submitted for re-scoring, in the same shape
/// they are stored with an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedSignals {
    pub lighthouse_results: PerformanceAudit,
    #[serde(default = "missing_site_info")]
    pub site_info: SiteInfoReport,
    #[serde(default = "missing_freshness")]
    pub last_updated: FreshnessInfo,
}

fn missing_site_info() -> SiteInfoReport {
    SiteInfoReport::failed("site info was not provided")
}

fn missing_freshness() -> FreshnessInfo {
    FreshnessInfo::NotFound { reason: None }
}

impl CollectedSignals {
    pub fn assess(&self, engine: &RecommendationEngine) -> SiteAssessment {
        SiteAssessment::evaluate(
            engine,
            &self.lighthouse_results,
            &self.site_info.signals(),
            &self.last_updated,
        )
    }
}
