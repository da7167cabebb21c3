use async_trait::async_trait;
use url::Url;

use super::{CollectorError, CompetitorSource};
use crate::analysis::{Competitor, CompetitorInfo, KeywordRanking};

/// No competitor lookup is configured; analyses carry no competitor data.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCompetitorSource;

#[async_trait]
impl CompetitorSource for DisabledCompetitorSource {
    async fn competitors(&self, _url: &Url) -> Result<Option<CompetitorInfo>, CollectorError> {
        Ok(None)
    }
}

/// Returns fixed placeholder rankings, flagged with `sample: true`.
///
/// Useful for demos and UI work where a real keyword provider is not wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleCompetitorSource;

impl SampleCompetitorSource {
    pub fn sample_data() -> CompetitorInfo {
        let keyword = |keyword: &str, position, volume| KeywordRanking {
            keyword: keyword.to_string(),
            position,
            volume,
        };
        let competitor = |domain: &str, common_keywords, score| Competitor {
            domain: domain.to_string(),
            common_keywords,
            score,
        };

        CompetitorInfo {
            keywords: vec![
                keyword("sample keyword 1", 4, 1200),
                keyword("sample keyword 2", 8, 800),
                keyword("sample keyword 3", 12, 500),
            ],
            competitors: vec![
                competitor("competitor1.com", 45, 85),
                competitor("competitor2.com", 32, 72),
                competitor("competitor3.com", 28, 68),
            ],
            sample: true,
        }
    }
}

#[async_trait]
impl CompetitorSource for SampleCompetitorSource {
    async fn competitors(&self, _url: &Url) -> Result<Option<CompetitorInfo>, CollectorError> {
        Ok(Some(Self::sample_data()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url() -> Url {
        Url::parse("https://example.com").expect("valid url")
    }

    #[tokio::test]
    async fn disabled_source_returns_nothing() {
        let info = DisabledCompetitorSource
            .competitors(&url())
            .await
            .expect("never fails");
        assert!(info.is_none());
    }

    #[tokio::test]
    async fn sample_source_flags_placeholder_data() {
        let info = SampleCompetitorSource
            .competitors(&url())
            .await
            .expect("never fails")
            .expect("sample data present");

        assert!(info.sample);
        assert_eq!(info.keywords.len(), 3);
        assert_eq!(info.keywords[0].keyword, "sample keyword 1");
        assert_eq!(info.competitors[2].domain, "competitor3.com");
        assert_eq!(info.competitors[0].score, 85);
    }

    #[test]
    fn sample_data_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(SampleCompetitorSource::sample_data())
            .expect("serializes");
        assert_eq!(json["competitors"][1]["commonKeywords"], 32);
        assert_eq!(json["sample"], true);
    }
}
