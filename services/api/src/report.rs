use chrono::SecondsFormat;
use prospector::analysis::{
    FreshnessInfo, Recommendation, ScoreBreakdown, SiteAssessment, SiteInfoReport,
};
use prospector::history::{AnalysisResult, HistoryEntry};
use std::fmt::Write;

/// Plain-text summary of a completed analysis for terminal output.
pub(crate) fn render_analysis(result: &AnalysisResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Analysis {} for {}", result.id, result.url);
    let _ = writeln!(
        out,
        "Completed {}",
        result.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    );

    render_scores(&mut out, &result.overall_score);

    let _ = writeln!(out, "\nSignals");
    let audit = &result.lighthouse_results.scores;
    let _ = writeln!(
        out,
        "- Lighthouse: performance {:.0} | accessibility {:.0} | best practices {:.0} | SEO {:.0} | mobile friendly {}",
        audit.performance,
        audit.accessibility,
        audit.best_practices,
        audit.seo,
        yes_no(audit.mobile_friendly)
    );
    match &result.site_info {
        SiteInfoReport::Collected(info) => {
            let _ = writeln!(
                out,
                "- Page: {} words | {}/{} images with alt text | {} internal / {} external links | {} social profiles",
                info.word_count,
                info.images_with_alt,
                info.images,
                info.internal_links,
                info.external_links,
                info.social_links.present_count()
            );
        }
        SiteInfoReport::Failed { error, details } => {
            let _ = writeln!(out, "- Page: {error} ({details})");
        }
    }
    let _ = writeln!(out, "- Last updated: {}", describe_freshness(&result.last_updated));
    if let Some(competitors) = &result.competitor_info {
        let label = if competitors.sample { " (sample data)" } else { "" };
        let _ = writeln!(
            out,
            "- Competitors{label}: {} keywords tracked, {} competing domains",
            competitors.keywords.len(),
            competitors.competitors.len()
        );
    }

    render_recommendations(&mut out, &result.recommendations);
    out
}

/// Score and recommendations for re-scored signals.
pub(crate) fn render_assessment(assessment: &SiteAssessment) -> String {
    let mut out = String::new();
    render_scores(&mut out, &assessment.overall_score);
    render_recommendations(&mut out, &assessment.recommendations);
    out
}

pub(crate) fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No analyses recorded.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{:<38} {:>5}  {:<20}  URL", "ID", "SCORE", "TIMESTAMP");
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<38} {:>5}  {:<20}  {}",
            entry.id,
            entry.overall_score,
            entry.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            entry.url
        );
    }
    out
}

fn render_scores(out: &mut String, score: &ScoreBreakdown) {
    let _ = writeln!(out, "\nOverall score: {}/100", score.overall);
    for (category, entry) in score.breakdown.iter() {
        let _ = writeln!(
            out,
            "  - {:<16} {:>5.1}  (weight {:.0}%)",
            category.label(),
            entry.score,
            entry.weight * 100.0
        );
    }
}

fn render_recommendations(out: &mut String, recommendations: &[Recommendation]) {
    if recommendations.is_empty() {
        let _ = writeln!(out, "\nNo recommendations: the site meets every check.");
        return;
    }

    let _ = writeln!(out, "\nRecommendations");
    for recommendation in recommendations {
        let _ = writeln!(
            out,
            "[{}] {}: {}",
            recommendation.priority.label(),
            recommendation.category.label(),
            recommendation.title
        );
        let _ = writeln!(out, "    {}", recommendation.description);
        for detail in &recommendation.details {
            let _ = writeln!(out, "    * {detail}");
        }
    }
}

fn describe_freshness(freshness: &FreshnessInfo) -> String {
    match freshness {
        FreshnessInfo::Found {
            last_updated,
            age_in_days,
            source,
        } => format!(
            "{} ({age_in_days} days ago, from {})",
            last_updated.format("%Y-%m-%d"),
            source.label()
        ),
        FreshnessInfo::NotFound { reason: Some(reason) } => format!("unknown ({reason})"),
        FreshnessInfo::NotFound { reason: None } => "unknown".to_string(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
