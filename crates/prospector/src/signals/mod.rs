//! Collectors for the raw signals the analysis engine consumes.
//!
//! Each upstream record has its own async trait so the service can run them
//! concurrently and tests can substitute fixed data.

pub mod competitors;
pub mod freshness;
mod http;
pub mod lighthouse;
pub mod site_info;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::analysis::{CompetitorInfo, FreshnessInfo, PerformanceAudit, SiteInfo};
use crate::config::CollectorConfig;

pub use competitors::{DisabledCompetitorSource, SampleCompetitorSource};
pub use freshness::HttpFreshnessSource;
pub use lighthouse::{LighthouseReport, LighthouseRunner};
pub use site_info::{extract_site_info, HttpSiteInfoSource};

/// Runs the browser page audit.
#[async_trait]
pub trait AuditRunner: Send + Sync {
    async fn audit(&self, url: &Url) -> Result<PerformanceAudit, CollectorError>;
}

/// Fetches and parses the page for on-page signals.
#[async_trait]
pub trait SiteInfoSource: Send + Sync {
    async fn site_info(&self, url: &Url) -> Result<SiteInfo, CollectorError>;
}

/// Detects when the page was last updated.
#[async_trait]
pub trait FreshnessSource: Send + Sync {
    async fn last_updated(&self, url: &Url) -> Result<FreshnessInfo, CollectorError>;
}

/// Looks up competitor keyword data; `None` when the capability is disabled.
#[async_trait]
pub trait CompetitorSource: Send + Sync {
    async fn competitors(&self, url: &Url) -> Result<Option<CompetitorInfo>, CollectorError>;
}

/// Errors raised while collecting signals.
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("audit process failed: {0}")]
    Process(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("unable to parse {what}: {detail}")]
    Parse { what: &'static str, detail: String },
}

/// The four collectors used for one analysis run.
#[derive(Clone)]
pub struct SignalCollectors {
    pub audit: Arc<dyn AuditRunner>,
    pub site_info: Arc<dyn SiteInfoSource>,
    pub freshness: Arc<dyn FreshnessSource>,
    pub competitors: Arc<dyn CompetitorSource>,
}

impl SignalCollectors {
    /// Production collectors sharing one HTTP client.
    pub fn from_config(config: &CollectorConfig) -> Result<Self, CollectorError> {
        let client = http::build_client(config)?;

        let competitors: Arc<dyn CompetitorSource> = if config.competitor_samples {
            Arc::new(SampleCompetitorSource)
        } else {
            Arc::new(DisabledCompetitorSource)
        };

        Ok(Self {
            audit: Arc::new(LighthouseRunner::new(config.lighthouse_bin.clone())),
            site_info: Arc::new(HttpSiteInfoSource::new(client.clone())),
            freshness: Arc::new(HttpFreshnessSource::new(client)),
            competitors,
        })
    }
}
