use serde::{Deserialize, Serialize};

/// Scoring dimension contributing to the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreCategory {
    Performance,
    Seo,
    Content,
    Freshness,
    MobileFriendly,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 5] = [
        ScoreCategory::Performance,
        ScoreCategory::Seo,
        ScoreCategory::Content,
        ScoreCategory::Freshness,
        ScoreCategory::MobileFriendly,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ScoreCategory::Performance => "Performance",
            ScoreCategory::Seo => "SEO",
            ScoreCategory::Content => "Content",
            ScoreCategory::Freshness => "Freshness",
            ScoreCategory::MobileFriendly => "Mobile friendly",
        }
    }

    /// Share of the overall score in whole percent. The five shares total 100.
    pub const fn weight_percent(&self) -> u32 {
        match self {
            ScoreCategory::Performance => 25,
            ScoreCategory::Seo => 25,
            ScoreCategory::Content => 15,
            ScoreCategory::Freshness => 20,
            ScoreCategory::MobileFriendly => 15,
        }
    }

    pub fn weight(&self) -> f64 {
        f64::from(self.weight_percent()) / 100.0
    }
}

/// Freshness score steps: the first band whose exclusive upper bound exceeds
/// the page age wins.
pub(crate) const FRESHNESS_BANDS: [(u32, f64); 5] = [
    (7, 100.0),
    (30, 90.0),
    (90, 75.0),
    (180, 60.0),
    (365, 40.0),
];
pub(crate) const FRESHNESS_STALE_SCORE: f64 = 20.0;
pub(crate) const FRESHNESS_UNKNOWN_SCORE: f64 = 50.0;

pub(crate) const MOBILE_FRIENDLY_SCORE: f64 = 100.0;
pub(crate) const MOBILE_UNFRIENDLY_SCORE: f64 = 30.0;

/// Points per true SEO indicator, averaged over the three indicators.
pub(crate) const SEO_INDICATOR_POINTS: f64 = 5.0;
pub(crate) const SEO_INDICATOR_COUNT: f64 = 3.0;

/// Content sub-score caps and the input level at which each saturates.
pub(crate) const WORD_COUNT_POINTS: f64 = 30.0;
pub(crate) const WORD_COUNT_TARGET: f64 = 500.0;
pub(crate) const ALT_TEXT_POINTS: f64 = 30.0;
pub(crate) const INTERNAL_LINK_POINTS: f64 = 20.0;
pub(crate) const INTERNAL_LINK_TARGET: f64 = 10.0;
pub(crate) const SOCIAL_POINTS: f64 = 20.0;

pub(crate) const MAX_SCORE: f64 = 100.0;
