use chrono::{TimeZone, Utc};

use crate::analysis::domain::{
    AuditMetrics, AuditScores, FreshnessInfo, FreshnessSource, PerformanceAudit, SeoDetails,
    SiteInfo, SocialLinks,
};

pub(super) fn audit(performance: f64, seo: f64, mobile_friendly: bool) -> PerformanceAudit {
    PerformanceAudit {
        scores: AuditScores {
            performance,
            accessibility: 88.0,
            best_practices: 92.0,
            seo,
            mobile_friendly,
        },
        metrics: AuditMetrics {
            first_contentful_paint: Some("1.2\u{a0}s".to_string()),
            largest_contentful_paint: Some("2.1\u{a0}s".to_string()),
            total_blocking_time: Some("120\u{a0}ms".to_string()),
            cumulative_layout_shift: Some("0.02".to_string()),
            speed_index: Some("2.4\u{a0}s".to_string()),
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

pub(super) fn all_social() -> SocialLinks {
    SocialLinks {
        facebook: true,
        twitter: true,
        linkedin: true,
        instagram: true,
    }
}

pub(super) fn rich_site() -> SiteInfo {
    SiteInfo {
        title: "Acme Plumbing | Des Moines".to_string(),
        description: "Licensed plumbers serving central Iowa.".to_string(),
        keywords: "plumbing, water heaters".to_string(),
        images: 10,
        images_with_alt: 9,
        all_links: 24,
        internal_links: 15,
        external_links: 9,
        word_count: 800,
        has_structured_data: true,
        social_links: all_social(),
    }
}

pub(super) fn thin_site() -> SiteInfo {
    SiteInfo {
        title: "Home".to_string(),
        images: 8,
        images_with_alt: 2,
        all_links: 3,
        internal_links: 2,
        external_links: 1,
        word_count: 120,
        ..SiteInfo::default()
    }
}

pub(super) fn found(age_in_days: u32) -> FreshnessInfo {
    FreshnessInfo::Found {
        last_updated: Utc
            .with_ymd_and_hms(2025, 9, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp"),
        age_in_days,
        source: FreshnessSource::HttpHeader,
    }
}

pub(super) fn not_found() -> FreshnessInfo {
    FreshnessInfo::NotFound { reason: None }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
