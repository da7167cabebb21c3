use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::{
    CompetitorInfo, FreshnessInfo, PerformanceAudit, Recommendation, ScoreBreakdown,
    SiteInfoReport,
};

/// Opaque identifier assigned to each stored analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(pub String);

impl AnalysisId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything produced by one analysis run, as returned by `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: AnalysisId,
    pub url: String,
    pub overall_score: ScoreBreakdown,
    pub lighthouse_results: PerformanceAudit,
    pub site_info: SiteInfoReport,
    pub last_updated: FreshnessInfo,
    pub competitor_info: Option<CompetitorInfo>,
    pub recommendations: Vec<Recommendation>,
    pub timestamp: DateTime<Utc>,
}

/// Stored history row: a summary for listings plus the full result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub url: String,
    pub overall_score: u8,
    pub timestamp: DateTime<Utc>,
    pub analysis: AnalysisResult,
}

impl AnalysisRecord {
    pub fn from_result(analysis: AnalysisResult) -> Self {
        Self {
            id: analysis.id.clone(),
            url: analysis.url.clone(),
            overall_score: analysis.overall_score.overall,
            timestamp: analysis.timestamp,
            analysis,
        }
    }

    pub fn entry(&self) -> HistoryEntry {
        HistoryEntry {
            id: self.id.clone(),
            url: self.url.clone(),
            overall_score: self.overall_score,
            timestamp: self.timestamp,
        }
    }
}

/// Listing view of a stored analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: AnalysisId,
    pub url: String,
    pub overall_score: u8,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistorySort {
    #[default]
    DateDesc,
    DateAsc,
    ScoreDesc,
    ScoreAsc,
}

impl HistorySort {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistorySort::DateDesc => "date-desc",
            HistorySort::DateAsc => "date-asc",
            HistorySort::ScoreDesc => "score-desc",
            HistorySort::ScoreAsc => "score-asc",
        }
    }
}

impl FromStr for HistorySort {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "date-desc" => Ok(HistorySort::DateDesc),
            "date-asc" => Ok(HistorySort::DateAsc),
            "score-desc" => Ok(HistorySort::ScoreDesc),
            "score-asc" => Ok(HistorySort::ScoreAsc),
            other => Err(format!(
                "unknown sort '{other}', expected date-desc, date-asc, score-desc or score-asc"
            )),
        }
    }
}

/// Filter, order and truncate a history listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub search: Option<String>,
    pub sort: HistorySort,
    pub limit: usize,
}

impl HistoryQuery {
    pub fn new(limit: usize) -> Self {
        Self {
            search: None,
            sort: HistorySort::default(),
            limit,
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search)
        };
        self
    }

    pub fn with_sort(mut self, sort: HistorySort) -> Self {
        self.sort = sort;
        self
    }

    fn matches(&self, record: &AnalysisRecord) -> bool {
        match &self.search {
            Some(term) => record
                .url
                .to_lowercase()
                .contains(&term.trim().to_lowercase()),
            None => true,
        }
    }

    /// Matching records, ordered and truncated, in storage order on ties.
    pub fn select<'a, I>(&self, records: I) -> Vec<&'a AnalysisRecord>
    where
        I: IntoIterator<Item = &'a AnalysisRecord>,
    {
        let mut selected: Vec<&AnalysisRecord> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect();

        match self.sort {
            HistorySort::DateDesc => selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            HistorySort::DateAsc => selected.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
            HistorySort::ScoreDesc => {
                selected.sort_by(|a, b| b.overall_score.cmp(&a.overall_score))
            }
            HistorySort::ScoreAsc => {
                selected.sort_by(|a, b| a.overall_score.cmp(&b.overall_score))
            }
        }

        selected.truncate(self.limit);
        selected
    }

    /// Listing view of [`HistoryQuery::select`].
    pub fn apply<'a, I>(&self, records: I) -> Vec<HistoryEntry>
    where
        I: IntoIterator<Item = &'a AnalysisRecord>,
    {
        self.select(records)
            .into_iter()
            .map(AnalysisRecord::entry)
            .collect()
    }
}
