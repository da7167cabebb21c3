use metrics_exporter_prometheus::PrometheusHandle;
use prospector::config::AppConfig;
use prospector::error::AppError;
use prospector::history::{
    AnalysisId, AnalysisRecord, AnalysisRepository, AnalysisService, ExportFormat, HistorySort,
    InMemoryAnalysisRepository, JsonFileAnalysisRepository, RepositoryError,
};
use prospector::signals::SignalCollectors;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// History storage selected by `APP_STORAGE_PATH`.
pub(crate) enum HistoryBackend {
    Memory(InMemoryAnalysisRepository),
    File(JsonFileAnalysisRepository),
}

impl HistoryBackend {
    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, RepositoryError> {
        match &config.storage.history_path {
            Some(path) => {
                let repository = JsonFileAnalysisRepository::open(path)?;
                info!(path = %path.display(), "using file-backed analysis history");
                Ok(Self::File(repository))
            }
            None => Ok(Self::Memory(InMemoryAnalysisRepository::default())),
        }
    }

    fn repository(&self) -> &dyn AnalysisRepository {
        match self {
            HistoryBackend::Memory(repository) => repository,
            HistoryBackend::File(repository) => repository,
        }
    }
}

impl AnalysisRepository for HistoryBackend {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError> {
        self.repository().insert(record)
    }

    fn fetch(&self, id: &AnalysisId) -> Result<Option<AnalysisRecord>, RepositoryError> {
        self.repository().fetch(id)
    }

    fn all(&self) -> Result<Vec<AnalysisRecord>, RepositoryError> {
        self.repository().all()
    }

    fn delete(&self, id: &AnalysisId) -> Result<(), RepositoryError> {
        self.repository().delete(id)
    }

    fn clear(&self) -> Result<(), RepositoryError> {
        self.repository().clear()
    }
}

/// Wire the production collectors and configured history into a service.
pub(crate) fn build_service(
    config: &AppConfig,
) -> Result<AnalysisService<HistoryBackend>, AppError> {
    let collectors = SignalCollectors::from_config(&config.collectors)?;
    let backend = HistoryBackend::from_config(config)?;

    Ok(AnalysisService::new(Arc::new(backend), collectors)
        .with_history_limit(config.storage.history_limit))
}

pub(crate) fn parse_sort(raw: &str) -> Result<HistorySort, String> {
    raw.parse()
}

pub(crate) fn parse_format(raw: &str) -> Result<ExportFormat, String> {
    raw.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_parsers_accept_documented_spellings() {
        assert_eq!(parse_sort("Score-Desc"), Ok(HistorySort::ScoreDesc));
        assert_eq!(parse_format("CSV"), Ok(ExportFormat::Csv));
        assert!(parse_sort("newest").is_err());
        assert!(parse_format("xml").is_err());
    }

    #[test]
    fn memory_backend_round_trips_through_the_trait() {
        let backend = HistoryBackend::Memory(InMemoryAnalysisRepository::default());
        assert!(backend.all().expect("available").is_empty());
        assert!(matches!(
            backend.delete(&AnalysisId("missing".to_string())),
            Err(RepositoryError::NotFound)
        ));
        backend.clear().expect("clear succeeds");
    }
}
