//! Weighted site score.
//!
//! Each category is derived independently from the collected signals, then the
//! overall score is the weighted sum of the raw category scores, rounded once.
//! Category scores are kept unrounded in the breakdown so consumers can format
//! them however they display them.

mod rules;
mod weights;

pub use weights::ScoreCategory;

use super::domain::{FreshnessInfo, PerformanceAudit, SiteInfo};
use serde::{Deserialize, Serialize};

/// Raw score and weight of one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: f64,
    pub weight: f64,
}

impl CategoryScore {
    fn for_category(category: ScoreCategory, score: f64) -> Self {
        Self {
            score,
            weight: category.weight(),
        }
    }

    fn weighted(&self, category: ScoreCategory) -> f64 {
        self.score * f64::from(category.weight_percent()) / 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub performance: CategoryScore,
    pub seo: CategoryScore,
    pub content: CategoryScore,
    pub freshness: CategoryScore,
    pub mobile_friendly: CategoryScore,
}

impl CategoryBreakdown {
    pub fn get(&self, category: ScoreCategory) -> &CategoryScore {
        match category {
            ScoreCategory::Performance => &self.performance,
            ScoreCategory::Seo => &self.seo,
            ScoreCategory::Content => &self.content,
            ScoreCategory::Freshness => &self.freshness,
            ScoreCategory::MobileFriendly => &self.mobile_friendly,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ScoreCategory, &CategoryScore)> + '_ {
        ScoreCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }

    pub fn total_weight(&self) -> f64 {
        self.iter().map(|(_, entry)| entry.weight).sum()
    }
}

/// Overall score plus the per-category inputs it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub overall: u8,
    pub breakdown: CategoryBreakdown,
}

/// Combine the collected signals into the weighted site score.
pub fn compute_overall_score(
    audit: &PerformanceAudit,
    site_info: &SiteInfo,
    freshness: &FreshnessInfo,
) -> ScoreBreakdown {
    let breakdown = CategoryBreakdown {
        performance: CategoryScore::for_category(
            ScoreCategory::Performance,
            rules::performance_score(audit),
        ),
        seo: CategoryScore::for_category(ScoreCategory::Seo, rules::seo_score(audit, site_info)),
        content: CategoryScore::for_category(
            ScoreCategory::Content,
            rules::content_score(site_info),
        ),
        freshness: CategoryScore::for_category(
            ScoreCategory::Freshness,
            rules::freshness_score(freshness),
        ),
        mobile_friendly: CategoryScore::for_category(
            ScoreCategory::MobileFriendly,
            rules::mobile_friendly_score(audit),
        ),
    };

    let weighted_sum: f64 = breakdown
        .iter()
        .map(|(category, entry)| entry.weighted(category))
        .sum();

    ScoreBreakdown {
        overall: round_overall(weighted_sum),
        breakdown,
    }
}

/// Round half up and clamp into the 0-100 range; NaN scores as 0.
fn round_overall(weighted_sum: f64) -> u8 {
    if weighted_sum.is_nan() {
        return 0;
    }
    (weighted_sum + 0.5).floor().clamp(0.0, 100.0) as u8
}
