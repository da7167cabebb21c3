use super::super::domain::{FreshnessInfo, PerformanceAudit, SiteInfo, SocialLinks};
use super::weights::{
    ALT_TEXT_POINTS, FRESHNESS_BANDS, FRESHNESS_STALE_SCORE, FRESHNESS_UNKNOWN_SCORE,
    INTERNAL_LINK_POINTS, INTERNAL_LINK_TARGET, MAX_SCORE, MOBILE_FRIENDLY_SCORE,
    MOBILE_UNFRIENDLY_SCORE, SEO_INDICATOR_COUNT, SEO_INDICATOR_POINTS, SOCIAL_POINTS,
    WORD_COUNT_POINTS, WORD_COUNT_TARGET,
};

pub(crate) fn performance_score(audit: &PerformanceAudit) -> f64 {
    audit.scores.performance
}

pub(crate) fn seo_score(audit: &PerformanceAudit, site_info: &SiteInfo) -> f64 {
    let indicators = [
        site_info.has_structured_data,
        audit.seo_details.has_meta,
        audit.seo_details.has_title,
    ];
    let present = indicators.iter().filter(|flag| **flag).count() as f64;
    let bonus = SEO_INDICATOR_POINTS * present / SEO_INDICATOR_COUNT;

    (audit.scores.seo + bonus).min(MAX_SCORE)
}

pub(crate) fn content_score(site_info: &SiteInfo) -> f64 {
    let total = word_count_points(site_info.word_count)
        + alt_text_points(site_info.images_with_alt, site_info.images)
        + internal_link_points(site_info.internal_links)
        + social_points(&site_info.social_links);

    total.min(MAX_SCORE)
}

pub(crate) fn word_count_points(word_count: u32) -> f64 {
    (f64::from(word_count) / WORD_COUNT_TARGET * WORD_COUNT_POINTS).min(WORD_COUNT_POINTS)
}

/// A page without images earns nothing here.
pub(crate) fn alt_text_points(images_with_alt: u32, images: u32) -> f64 {
    let described = images_with_alt.min(images);
    f64::from(described) / f64::from(images.max(1)) * ALT_TEXT_POINTS
}

pub(crate) fn internal_link_points(internal_links: u32) -> f64 {
    (f64::from(internal_links) / INTERNAL_LINK_TARGET * INTERNAL_LINK_POINTS)
        .min(INTERNAL_LINK_POINTS)
}

pub(crate) fn social_points(social: &SocialLinks) -> f64 {
    f64::from(social.present_count()) / f64::from(SocialLinks::PLATFORMS) * SOCIAL_POINTS
}

pub(crate) fn freshness_score(freshness: &FreshnessInfo) -> f64 {
    match freshness.age_in_days() {
        Some(age) => FRESHNESS_BANDS
            .iter()
            .find(|(upper, _)| age < *upper)
            .map(|(_, score)| *score)
            .unwrap_or(FRESHNESS_STALE_SCORE),
        None => FRESHNESS_UNKNOWN_SCORE,
    }
}

pub(crate) fn mobile_friendly_score(audit: &PerformanceAudit) -> f64 {
    if audit.scores.mobile_friendly {
        MOBILE_FRIENDLY_SCORE
    } else {
        MOBILE_UNFRIENDLY_SCORE
    }
}
