//! Analysis runs and their stored history.
//!
//! [`AnalysisService`] drives the collectors, hands the signals to the
//! scoring engine and persists each result through an [`AnalysisRepository`].
//! [`analysis_router`] exposes the same operations over HTTP.

pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AnalysisId, AnalysisRecord, AnalysisResult, HistoryEntry, HistoryQuery, HistorySort,
};
pub use export::{export_history, ExportError, ExportFormat};
pub use repository::{
    AnalysisRepository, InMemoryAnalysisRepository, JsonFileAnalysisRepository, RepositoryError,
};
pub use router::analysis_router;
pub use service::{parse_target, AnalysisService, AnalysisServiceError};
