use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category scores and detail flags reported by the page audit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceAudit {
    pub scores: AuditScores,
    pub metrics: AuditMetrics,
    pub seo_details: SeoDetails,
}

/// Audit category scores in the 0-100 range.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditScores {
    pub performance: f64,
    pub accessibility: f64,
    pub best_practices: f64,
    pub seo: f64,
    pub mobile_friendly: bool,
}

/// Display values for the core web vitals, exactly as the audit formats them
/// (for example `"2.7 s"`, `"310 ms"` or `"0.012"`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMetrics {
    #[serde(default)]
    pub first_contentful_paint: Option<String>,
    #[serde(default)]
    pub largest_contentful_paint: Option<String>,
    #[serde(default)]
    pub total_blocking_time: Option<String>,
    #[serde(default)]
    pub cumulative_layout_shift: Option<String>,
    #[serde(default)]
    pub speed_index: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoDetails {
    pub has_viewport: bool,
    pub has_meta: bool,
    pub has_title: bool,
    pub has_hreflang: bool,
    pub has_canonical: bool,
    pub robots_txt: bool,
}

/// On-page signals extracted from the fetched HTML.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub images: u32,
    pub images_with_alt: u32,
    pub all_links: u32,
    pub internal_links: u32,
    pub external_links: u32,
    pub word_count: u32,
    pub has_structured_data: bool,
    pub social_links: SocialLinks,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SocialLinks {
    pub facebook: bool,
    pub twitter: bool,
    pub linkedin: bool,
    pub instagram: bool,
}

impl SocialLinks {
    pub fn present_count(&self) -> u32 {
        [self.facebook, self.twitter, self.linkedin, self.instagram]
            .into_iter()
            .filter(|present| *present)
            .count() as u32
    }

    pub const PLATFORMS: u32 = 4;
}

/// Site info as stored with an analysis: either the collected signals or the
/// collector's failure message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SiteInfoReport {
    Collected(SiteInfo),
    Failed { error: String, details: String },
}

impl SiteInfoReport {
    pub fn failed(details: impl Into<String>) -> Self {
        Self::Failed {
            error: "Failed to get site info".to_string(),
            details: details.into(),
        }
    }

    /// Signals to feed the scoring engine; a failed collection scores as an
    /// empty page.
    pub fn signals(&self) -> SiteInfo {
        match self {
            SiteInfoReport::Collected(info) => info.clone(),
            SiteInfoReport::Failed { .. } => SiteInfo::default(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SiteInfoReport::Failed { .. })
    }
}

impl From<SiteInfo> for SiteInfoReport {
    fn from(value: SiteInfo) -> Self {
        Self::Collected(value)
    }
}

/// Where the last-updated timestamp was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FreshnessSource {
    #[serde(rename = "HTTP headers")]
    HttpHeader,
    Sitemap,
    Content,
}

impl FreshnessSource {
    pub fn label(&self) -> &'static str {
        match self {
            FreshnessSource::HttpHeader => "HTTP headers",
            FreshnessSource::Sitemap => "Sitemap",
            FreshnessSource::Content => "Content",
        }
    }
}

/// Result of last-updated detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "FreshnessWire", from = "FreshnessWire")]
pub enum FreshnessInfo {
    Found {
        last_updated: DateTime<Utc>,
        age_in_days: u32,
        source: FreshnessSource,
    },
    NotFound {
        reason: Option<String>,
    },
}

impl FreshnessInfo {
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: Some(reason.into()),
        }
    }

    pub fn age_in_days(&self) -> Option<u32> {
        match self {
            FreshnessInfo::Found { age_in_days, .. } => Some(*age_in_days),
            FreshnessInfo::NotFound { .. } => None,
        }
    }
}

/// Stored representation: `{"found": true, "lastUpdated", "ageInDays", "source"}`
/// or `{"found": false, "reason"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FreshnessWire {
    found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    age_in_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<FreshnessSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(default, skip_serializing)]
    error: Option<String>,
}

impl From<FreshnessInfo> for FreshnessWire {
    fn from(value: FreshnessInfo) -> Self {
        match value {
            FreshnessInfo::Found {
                last_updated,
                age_in_days,
                source,
            } => FreshnessWire {
                found: true,
                last_updated: Some(last_updated),
                age_in_days: Some(age_in_days),
                source: Some(source),
                reason: None,
                error: None,
            },
            FreshnessInfo::NotFound { reason } => FreshnessWire {
                found: false,
                last_updated: None,
                age_in_days: None,
                source: None,
                reason,
                error: None,
            },
        }
    }
}

impl From<FreshnessWire> for FreshnessInfo {
    fn from(value: FreshnessWire) -> Self {
        match (value.found, value.last_updated, value.age_in_days) {
            (true, Some(last_updated), Some(age_in_days)) => FreshnessInfo::Found {
                last_updated,
                age_in_days,
                source: value.source.unwrap_or(FreshnessSource::Content),
            },
            _ => FreshnessInfo::NotFound {
                reason: value.reason.or(value.error),
            },
        }
    }
}

/// Competitor keyword data passed through to consumers without scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorInfo {
    pub keywords: Vec<KeywordRanking>,
    pub competitors: Vec<Competitor>,
    /// Set when the data is placeholder output rather than a real lookup.
    #[serde(default)]
    pub sample: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRanking {
    pub keyword: String,
    pub position: u32,
    pub volume: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub domain: String,
    pub common_keywords: u32,
    pub score: u8,
}
