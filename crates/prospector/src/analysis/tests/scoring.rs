use super::common::*;
use crate::analysis::domain::{SiteInfo, SocialLinks};
use crate::analysis::scoring::policy::{
    alt_text_points, content_score, freshness_score, internal_link_points, seo_score,
    social_points, word_count_points,
};
use crate::analysis::scoring::{compute_overall_score, ScoreCategory};

#[test]
fn weights_total_exactly_one_hundred_percent() {
    let percent: u32 = ScoreCategory::ALL
        .iter()
        .map(|category| category.weight_percent())
        .sum();
    assert_eq!(percent, 100);

    let score = compute_overall_score(&audit(80.0, 80.0, true), &rich_site(), &found(3));
    assert_close(score.breakdown.total_weight(), 1.0);
    assert_close(score.breakdown.performance.weight, 0.25);
    assert_close(score.breakdown.seo.weight, 0.25);
    assert_close(score.breakdown.content.weight, 0.15);
    assert_close(score.breakdown.freshness.weight, 0.20);
    assert_close(score.breakdown.mobile_friendly.weight, 0.15);
}

#[test]
fn strong_site_with_slow_performance_scores_eighty_six() {
    let score = compute_overall_score(&audit(45.0, 95.0, true), &rich_site(), &found(3));

    assert_close(score.breakdown.performance.score, 45.0);
    assert_close(score.breakdown.seo.score, 100.0);
    // 30 words + 27 alt text + 20 links + 20 social
    assert_close(score.breakdown.content.score, 97.0);
    assert_close(score.breakdown.freshness.score, 100.0);
    assert_close(score.breakdown.mobile_friendly.score, 100.0);
    assert_eq!(score.overall, 86);
}

#[test]
fn ten_day_old_page_lands_in_the_second_freshness_band() {
    let score = compute_overall_score(&audit(45.0, 95.0, true), &rich_site(), &found(10));

    assert_close(score.breakdown.freshness.score, 90.0);
    // 11.25 + 25 + 14.55 + 18 + 15 = 83.8
    assert_eq!(score.overall, 84);
}

#[test]
fn overall_rounds_half_up_once_on_the_weighted_sum() {
    // 0 + 0 + 0 + 50 * 0.20 + 30 * 0.15 = 14.5
    let empty = SiteInfo::default();
    let score = compute_overall_score(&audit(0.0, 0.0, false), &empty, &not_found());
    assert_eq!(score.overall, 15);
}

#[test]
fn overall_stays_within_bounds_for_extreme_inputs() {
    let best = compute_overall_score(&audit(100.0, 100.0, true), &rich_site(), &found(0));
    assert!(best.overall <= 100);

    let mut maxed = rich_site();
    maxed.images_with_alt = maxed.images;
    let perfect = compute_overall_score(&audit(100.0, 100.0, true), &maxed, &found(0));
    assert_eq!(perfect.overall, 100);

    let worst = compute_overall_score(
        &audit(0.0, 0.0, false),
        &SiteInfo::default(),
        &found(5_000),
    );
    assert_eq!(worst.overall, 9);
}

#[test]
fn category_scores_are_not_rounded() {
    let mut site = rich_site();
    site.has_structured_data = false;
    let score = compute_overall_score(&audit(61.5, 90.0, true), &site, &found(10));

    assert_close(score.breakdown.performance.score, 61.5);
    assert_close(score.breakdown.seo.score, 90.0 + 10.0 / 3.0);
}

#[test]
fn seo_bonus_averages_three_indicators_and_caps_at_one_hundred() {
    let mut site = rich_site();
    let mut base = audit(80.0, 70.0, true);
    assert_close(seo_score(&base, &site), 75.0);

    site.has_structured_data = false;
    base.seo_details.has_meta = false;
    assert_close(seo_score(&base, &site), 70.0 + 5.0 / 3.0);

    base.seo_details.has_title = false;
    assert_close(seo_score(&base, &site), 70.0);

    let near_perfect = audit(80.0, 99.0, true);
    assert_close(seo_score(&near_perfect, &rich_site()), 100.0);
}

#[test]
fn word_count_ramps_linearly_to_thirty_points() {
    assert_close(word_count_points(0), 0.0);
    assert_close(word_count_points(250), 15.0);
    assert_close(word_count_points(499), 499.0 / 500.0 * 30.0);
    assert_close(word_count_points(500), 30.0);
    assert_close(word_count_points(501), 30.0);
    assert_close(word_count_points(20_000), 30.0);
}

#[test]
fn alt_text_scores_zero_without_images() {
    assert_close(alt_text_points(0, 0), 0.0);
    assert_close(alt_text_points(9, 10), 27.0);
    assert_close(alt_text_points(4, 4), 30.0);
    // more described images than images never exceeds full marks
    assert_close(alt_text_points(12, 4), 30.0);
}

#[test]
fn internal_links_and_social_presence_are_capped() {
    assert_close(internal_link_points(5), 10.0);
    assert_close(internal_link_points(10), 20.0);
    assert_close(internal_link_points(250), 20.0);

    let mut social = SocialLinks::default();
    assert_close(social_points(&social), 0.0);
    social.linkedin = true;
    assert_close(social_points(&social), 5.0);
    assert_close(social_points(&all_social()), 20.0);
}

#[test]
fn content_score_is_monotonic_in_each_input() {
    let base = thin_site();

    let mut last = f64::MIN;
    for words in (0..=1_000).step_by(50) {
        let site = SiteInfo {
            word_count: words,
            ..base.clone()
        };
        let current = content_score(&site);
        assert!(current >= last, "words {words}");
        last = current;
    }

    let mut last = f64::MIN;
    for with_alt in 0..=base.images {
        let site = SiteInfo {
            images_with_alt: with_alt,
            ..base.clone()
        };
        let current = content_score(&site);
        assert!(current >= last, "alt {with_alt}");
        last = current;
    }

    let mut last = f64::MIN;
    for links in 0..30 {
        let site = SiteInfo {
            internal_links: links,
            ..base.clone()
        };
        let current = content_score(&site);
        assert!(current >= last, "links {links}");
        last = current;
    }

    let flags = [
        SocialLinks::default(),
        SocialLinks {
            facebook: true,
            ..SocialLinks::default()
        },
        SocialLinks {
            facebook: true,
            twitter: true,
            ..SocialLinks::default()
        },
        SocialLinks {
            facebook: true,
            twitter: true,
            linkedin: true,
            ..SocialLinks::default()
        },
        all_social(),
    ];
    let mut last = f64::MIN;
    for social_links in flags {
        let site = SiteInfo {
            social_links,
            ..base.clone()
        };
        let current = content_score(&site);
        assert!(current >= last);
        last = current;
    }
}

#[test]
fn content_score_caps_at_one_hundred() {
    let mut site = rich_site();
    site.images_with_alt = site.images;
    assert_close(content_score(&site), 100.0);
}

#[test]
fn freshness_is_a_step_function_of_age() {
    let cases = [
        (0, 100.0),
        (6, 100.0),
        (7, 90.0),
        (29, 90.0),
        (30, 75.0),
        (89, 75.0),
        (90, 60.0),
        (179, 60.0),
        (180, 40.0),
        (364, 40.0),
        (365, 20.0),
        (3_650, 20.0),
    ];

    let mut previous = f64::MAX;
    for (age, expected) in cases {
        let score = freshness_score(&found(age));
        assert_close(score, expected);
        assert!(score <= previous, "age {age} increased the score");
        previous = score;
    }
}

#[test]
fn unknown_freshness_scores_fifty() {
    assert_close(freshness_score(&not_found()), 50.0);
    let with_reason = crate::analysis::domain::FreshnessInfo::not_found("sitemap missing");
    assert_close(freshness_score(&with_reason), 50.0);
}

#[test]
fn mobile_friendliness_is_binary() {
    let friendly = compute_overall_score(&audit(70.0, 70.0, true), &rich_site(), &found(1));
    let unfriendly = compute_overall_score(&audit(70.0, 70.0, false), &rich_site(), &found(1));

    assert_close(friendly.breakdown.mobile_friendly.score, 100.0);
    assert_close(unfriendly.breakdown.mobile_friendly.score, 30.0);
}

#[test]
fn breakdown_serializes_with_stored_field_names() {
    let score = compute_overall_score(&audit(45.0, 95.0, true), &rich_site(), &found(3));
    let value = serde_json::to_value(score).expect("serialize score");

    assert_eq!(value["overall"], 86);
    assert_eq!(value["breakdown"]["mobileFriendly"]["score"], 100.0);
    assert_eq!(value["breakdown"]["performance"]["weight"], 0.25);
    assert!(value["breakdown"]["content"].is_object());
}
