//! Prioritized, human-readable recommendations derived from the same signals
//! the score uses. Every rule is independent and emits at most one
//! recommendation.

mod metrics;
mod rules;

pub use metrics::MetricComparison;

use super::domain::{FreshnessInfo, PerformanceAudit, SiteInfo};
use rules::RuleContext;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Performance,
    Seo,
    Content,
    Accessibility,
    Freshness,
    Mobile,
}

impl RecommendationCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RecommendationCategory::Performance => "Performance",
            RecommendationCategory::Seo => "SEO",
            RecommendationCategory::Content => "Content",
            RecommendationCategory::Accessibility => "Accessibility",
            RecommendationCategory::Freshness => "Freshness",
            RecommendationCategory::Mobile => "Mobile",
        }
    }
}

/// Display urgency of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub category: RecommendationCategory,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub details: Vec<String>,
}

/// Knobs that change how rules evaluate their inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecommendationPolicy {
    pub metric_comparison: MetricComparison,
}

/// Stateless generator that applies the rule set under a policy.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    policy: RecommendationPolicy,
}

impl RecommendationEngine {
    pub fn new(policy: RecommendationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RecommendationPolicy {
        &self.policy
    }

    pub fn generate(
        &self,
        audit: &PerformanceAudit,
        site_info: &SiteInfo,
        freshness: &FreshnessInfo,
    ) -> Vec<Recommendation> {
        let ctx = RuleContext {
            audit,
            site_info,
            freshness,
            metric_comparison: self.policy.metric_comparison,
        };

        let recommendations = rules::RULES
            .iter()
            .filter_map(|rule| rule(&ctx))
            .collect();

        sort_by_priority(recommendations)
    }
}

/// Generate recommendations with the default policy.
pub fn generate_recommendations(
    audit: &PerformanceAudit,
    site_info: &SiteInfo,
    freshness: &FreshnessInfo,
) -> Vec<Recommendation> {
    RecommendationEngine::default().generate(audit, site_info, freshness)
}

/// Highest priority first; equal priorities keep their incoming order.
pub fn sort_by_priority(mut recommendations: Vec<Recommendation>) -> Vec<Recommendation> {
    recommendations.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
    recommendations
}
