//! Page audit through the Lighthouse CLI.

use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;
use url::Url;

use super::{AuditRunner, CollectorError};
use crate::analysis::{AuditMetrics, AuditScores, PerformanceAudit, SeoDetails};

const DEFAULT_AUDIT_TIMEOUT: Duration = Duration::from_secs(120);
const AUDITED_CATEGORIES: &str = "performance,accessibility,best-practices,seo";
const CHROME_FLAGS: &str = "--headless --disable-gpu --no-sandbox";

/// The subset of a Lighthouse result (`lhr`) the analysis reads.
#[derive(Debug, Clone, Deserialize)]
pub struct LighthouseReport {
    #[serde(default)]
    categories: HashMap<String, ReportCategory>,
    #[serde(default)]
    audits: HashMap<String, ReportAudit>,
}

#[derive(Debug, Clone, Deserialize)]
struct ReportCategory {
    score: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportAudit {
    score: Option<f64>,
    #[serde(default)]
    display_value: Option<String>,
}

impl LighthouseReport {
    pub fn from_json(raw: &str) -> Result<Self, CollectorError> {
        serde_json::from_str(raw).map_err(|err| CollectorError::Parse {
            what: "lighthouse report",
            detail: err.to_string(),
        })
    }

    /// Category score on the 0-100 scale. Lighthouse reports scores in
    /// hundredths, so the product is rounded back to a whole number.
    fn category_score(&self, id: &str) -> f64 {
        self.categories
            .get(id)
            .and_then(|category| category.score)
            .map(|score| (score * 100.0).round().clamp(0.0, 100.0))
            .unwrap_or(0.0)
    }

    fn passed(&self, id: &str) -> bool {
        self.audits
            .get(id)
            .and_then(|audit| audit.score)
            .map(|score| score >= 1.0)
            .unwrap_or(false)
    }

    fn display_value(&self, id: &str) -> Option<String> {
        self.audits
            .get(id)
            .and_then(|audit| audit.display_value.clone())
    }

    pub fn to_audit(&self) -> PerformanceAudit {
        PerformanceAudit {
            scores: AuditScores {
                performance: self.category_score("performance"),
                accessibility: self.category_score("accessibility"),
                best_practices: self.category_score("best-practices"),
                seo: self.category_score("seo"),
                mobile_friendly: self.passed("content-width"),
            },
            metrics: AuditMetrics {
                first_contentful_paint: self.display_value("first-contentful-paint"),
                largest_contentful_paint: self.display_value("largest-contentful-paint"),
                total_blocking_time: self.display_value("total-blocking-time"),
                cumulative_layout_shift: self.display_value("cumulative-layout-shift"),
                speed_index: self.display_value("speed-index"),
            },
            seo_details: SeoDetails {
                has_viewport: self.passed("viewport"),
                has_meta: self.passed("meta-description"),
                has_title: self.passed("document-title"),
                has_hreflang: self.passed("hreflang"),
                has_canonical: self.passed("canonical"),
                robots_txt: self.passed("robots-txt"),
            },
        }
    }
}

/// Spawns the `lighthouse` binary against headless Chrome.
#[derive(Debug, Clone)]
pub struct LighthouseRunner {
    binary: String,
    timeout: Duration,
}

impl LighthouseRunner {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: DEFAULT_AUDIT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn command(&self, url: &Url) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg(url.as_str())
            .arg("--output=json")
            .arg("--output-path=stdout")
            .arg("--quiet")
            .arg(format!("--only-categories={AUDITED_CATEGORIES}"))
            .arg(format!("--chrome-flags={CHROME_FLAGS}"))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl AuditRunner for LighthouseRunner {
    async fn audit(&self, url: &Url) -> Result<PerformanceAudit, CollectorError> {
        debug!(%url, binary = %self.binary, "starting lighthouse audit");

        let output = tokio::time::timeout(self.timeout, self.command(url).output())
            .await
            .map_err(|_| CollectorError::Timeout(self.timeout))?
            .map_err(|err| CollectorError::Process(format!("{}: {err}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CollectorError::Process(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        Ok(LighthouseReport::from_json(&raw)?.to_audit())
    }
}
