use super::super::domain::{FreshnessInfo, PerformanceAudit, SiteInfo};
use super::metrics::{
    MetricComparison, CUMULATIVE_LAYOUT_SHIFT, LARGEST_CONTENTFUL_PAINT, TOTAL_BLOCKING_TIME,
};
use super::{Priority, Recommendation, RecommendationCategory};

pub(crate) const PERFORMANCE_TRIGGER: f64 = 70.0;
pub(crate) const PERFORMANCE_HIGH_PRIORITY: f64 = 50.0;
pub(crate) const SEO_TRIGGER: f64 = 90.0;
pub(crate) const CONTENT_WORD_TARGET: u32 = 500;
pub(crate) const ALT_TEXT_MIN_COVERAGE: f64 = 0.8;
pub(crate) const FRESHNESS_STALE_DAYS: u32 = 180;
pub(crate) const FRESHNESS_HIGH_PRIORITY_DAYS: u32 = 365;

/// Inputs shared by every rule.
pub(crate) struct RuleContext<'a> {
    pub audit: &'a PerformanceAudit,
    pub site_info: &'a SiteInfo,
    pub freshness: &'a FreshnessInfo,
    pub metric_comparison: MetricComparison,
}

pub(crate) type Rule = fn(&RuleContext<'_>) -> Option<Recommendation>;

/// Evaluation order; ties in priority keep this order.
pub(crate) const RULES: [Rule; 6] = [
    performance_rule,
    seo_rule,
    content_rule,
    alt_text_rule,
    freshness_rule,
    mobile_rule,
];

fn details(lines: impl IntoIterator<Item = Option<String>>) -> Vec<String> {
    lines.into_iter().flatten().collect()
}

fn performance_rule(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let score = ctx.audit.scores.performance;
    if score >= PERFORMANCE_TRIGGER {
        return None;
    }

    let metrics = &ctx.audit.metrics;
    let comparison = ctx.metric_comparison;
    let details = details([
        comparison
            .exceeds(
                metrics.largest_contentful_paint.as_deref(),
                &LARGEST_CONTENTFUL_PAINT,
            )
            .then(|| "Largest Contentful Paint is too slow (should be under 2.5s)".to_string()),
        comparison
            .exceeds(metrics.total_blocking_time.as_deref(), &TOTAL_BLOCKING_TIME)
            .then(|| "Total Blocking Time is too high (should be under 300ms)".to_string()),
        comparison
            .exceeds(
                metrics.cumulative_layout_shift.as_deref(),
                &CUMULATIVE_LAYOUT_SHIFT,
            )
            .then(|| "Cumulative Layout Shift is too high (should be under 0.1)".to_string()),
    ]);

    Some(Recommendation {
        category: RecommendationCategory::Performance,
        priority: if score < PERFORMANCE_HIGH_PRIORITY {
            Priority::High
        } else {
            Priority::Medium
        },
        title: "Improve website performance".to_string(),
        description: format!(
            "The site's performance score is {}/100, which may lead to poor user experience and lower search rankings.",
            format_score(score)
        ),
        details,
    })
}

fn seo_rule(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if ctx.audit.scores.seo >= SEO_TRIGGER {
        return None;
    }

    let seo = &ctx.audit.seo_details;
    let details = details([
        (!seo.has_meta).then(|| "Missing meta description".to_string()),
        (!seo.has_title).then(|| "Missing or inadequate page title".to_string()),
        (!seo.has_viewport).then(|| "Missing viewport meta tag".to_string()),
        (!ctx.site_info.has_structured_data)
            .then(|| "No structured data/schema markup found".to_string()),
    ]);

    Some(Recommendation {
        category: RecommendationCategory::Seo,
        priority: Priority::High,
        title: "Improve SEO fundamentals".to_string(),
        description:
            "The site is missing important SEO elements that can improve search visibility."
                .to_string(),
        details,
    })
}

fn content_rule(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let word_count = ctx.site_info.word_count;
    if word_count >= CONTENT_WORD_TARGET {
        return None;
    }

    Some(Recommendation {
        category: RecommendationCategory::Content,
        priority: Priority::Medium,
        title: "Enhance content depth".to_string(),
        description: "The site has limited content which may affect its authority and ranking potential.".to_string(),
        details: vec![
            format!("Current word count is approximately {word_count} words"),
            "Search engines typically favor comprehensive content (1000+ words for key pages)"
                .to_string(),
        ],
    })
}

fn alt_text_rule(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let images = ctx.site_info.images;
    let with_alt = ctx.site_info.images_with_alt;
    if images == 0 || f64::from(with_alt) / f64::from(images) >= ALT_TEXT_MIN_COVERAGE {
        return None;
    }

    Some(Recommendation {
        category: RecommendationCategory::Accessibility,
        priority: Priority::Medium,
        title: "Add alt text to images".to_string(),
        description: "Many images on the site lack alternative text, which affects accessibility and SEO.".to_string(),
        details: vec![
            format!("{with_alt} out of {images} images have alt text"),
            "Alt text helps search engines understand image content and improves accessibility for screen reader users".to_string(),
        ],
    })
}

fn freshness_rule(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    let age = ctx.freshness.age_in_days()?;
    if age <= FRESHNESS_STALE_DAYS {
        return None;
    }

    Some(Recommendation {
        category: RecommendationCategory::Freshness,
        priority: if age > FRESHNESS_HIGH_PRIORITY_DAYS {
            Priority::High
        } else {
            Priority::Medium
        },
        title: "Update website content".to_string(),
        description: "The site content appears to be outdated, which may negatively impact user trust and search rankings.".to_string(),
        details: vec![
            format!("Last content update was approximately {age} days ago"),
            "Fresh content signals to search engines that the site is actively maintained"
                .to_string(),
            "Consider regular content updates or adding a blog section".to_string(),
        ],
    })
}

fn mobile_rule(ctx: &RuleContext<'_>) -> Option<Recommendation> {
    if ctx.audit.scores.mobile_friendly {
        return None;
    }

    Some(Recommendation {
        category: RecommendationCategory::Mobile,
        priority: Priority::High,
        title: "Improve mobile experience".to_string(),
        description: "The site is not fully mobile-friendly, which can significantly impact rankings and user experience.".to_string(),
        details: vec![
            "Google primarily uses mobile-first indexing".to_string(),
            "Ensure content is properly sized for mobile screens".to_string(),
            "Implement responsive design principles".to_string(),
        ],
    })
}

/// Scores are whole numbers in practice; keep stray fractions visible.
fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}
