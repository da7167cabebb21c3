use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use url::Url;

use super::domain::{AnalysisId, AnalysisRecord, AnalysisResult, HistoryEntry, HistoryQuery};
use super::repository::{AnalysisRepository, RepositoryError};
use crate::analysis::{
    CollectedSignals, FreshnessInfo, RecommendationEngine, SiteAssessment, SiteInfoReport,
};
use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::signals::{CollectorError, SignalCollectors};

/// Service composing the signal collectors, the scoring engine and history.
pub struct AnalysisService<R> {
    repository: Arc<R>,
    collectors: SignalCollectors,
    engine: Arc<RecommendationEngine>,
    history_limit: usize,
}

impl<R> AnalysisService<R>
where
    R: AnalysisRepository + 'static,
{
    pub fn new(repository: Arc<R>, collectors: SignalCollectors) -> Self {
        Self {
            repository,
            collectors,
            engine: Arc::new(RecommendationEngine::default()),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    pub fn with_engine(mut self, engine: RecommendationEngine) -> Self {
        self.engine = Arc::new(engine);
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit.max(1);
        self
    }

    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    /// Collect every signal for `raw_url`, score it and store the result.
    ///
    /// Only the page audit is required; the other collectors degrade into
    /// their "unknown" shapes so the analysis still completes.
    pub async fn analyze(&self, raw_url: &str) -> Result<AnalysisResult, AnalysisServiceError> {
        let url = parse_target(raw_url)?;
        info!(%url, "starting analysis");

        let collectors = &self.collectors;
        let (audit, site_info, freshness, competitors) = tokio::join!(
            collectors.audit.audit(&url),
            collectors.site_info.site_info(&url),
            collectors.freshness.last_updated(&url),
            collectors.competitors.competitors(&url),
        );

        let audit = audit.map_err(AnalysisServiceError::Audit)?;
        let site_info = match site_info {
            Ok(info) => SiteInfoReport::Collected(info),
            Err(err) => {
                warn!(%url, error = %err, "site info unavailable");
                SiteInfoReport::failed(err.to_string())
            }
        };
        let freshness = freshness.unwrap_or_else(|err| {
            warn!(%url, error = %err, "freshness unavailable");
            FreshnessInfo::not_found(err.to_string())
        });
        let competitor_info = competitors.unwrap_or_else(|err| {
            warn!(%url, error = %err, "competitor data unavailable");
            None
        });

        let assessment =
            SiteAssessment::evaluate(&self.engine, &audit, &site_info.signals(), &freshness);

        let result = AnalysisResult {
            id: AnalysisId::generate(),
            url: url.to_string(),
            overall_score: assessment.overall_score,
            lighthouse_results: audit,
            site_info,
            last_updated: freshness,
            competitor_info,
            recommendations: assessment.recommendations,
            timestamp: Utc::now(),
        };

        let stored = self
            .repository
            .insert(AnalysisRecord::from_result(result))?;
        info!(
            analysis_id = %stored.id,
            url = %stored.url,
            overall = stored.overall_score,
            recommendations = stored.analysis.recommendations.len(),
            "analysis stored"
        );
        Ok(stored.analysis)
    }

    /// Score previously collected signals without collecting or storing.
    pub fn score(&self, signals: &CollectedSignals) -> SiteAssessment {
        signals.assess(&self.engine)
    }

    /// Listing query using the configured default limit.
    pub fn default_query(&self) -> HistoryQuery {
        HistoryQuery::new(self.history_limit)
    }

    pub fn history(&self, query: &HistoryQuery) -> Result<Vec<HistoryEntry>, AnalysisServiceError> {
        let records = self.repository.all()?;
        Ok(query.apply(&records))
    }

    /// Full stored records matching `query`, for exports.
    pub fn history_records(
        &self,
        query: &HistoryQuery,
    ) -> Result<Vec<AnalysisRecord>, AnalysisServiceError> {
        let records = self.repository.all()?;
        Ok(query.select(&records).into_iter().cloned().collect())
    }

    pub fn get(&self, id: &AnalysisId) -> Result<AnalysisRecord, AnalysisServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn delete(&self, id: &AnalysisId) -> Result<(), AnalysisServiceError> {
        self.repository.delete(id)?;
        info!(analysis_id = %id, "analysis deleted");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), AnalysisServiceError> {
        self.repository.clear()?;
        info!("analysis history cleared");
        Ok(())
    }
}

/// Accept absolute http(s) URLs with a host.
pub fn parse_target(raw: &str) -> Result<Url, AnalysisServiceError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AnalysisServiceError::InvalidUrl("URL is required".to_string()));
    }

    let url = Url::parse(raw)
        .map_err(|err| AnalysisServiceError::InvalidUrl(format!("{raw}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AnalysisServiceError::InvalidUrl(format!(
            "{raw}: only http and https URLs can be analyzed"
        )));
    }
    Ok(url)
}

/// Error raised by the analysis service.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("page audit failed: {0}")]
    Audit(#[source] CollectorError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
