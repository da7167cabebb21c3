//! Last-updated detection from response headers, the sitemap and the page itself.

use std::sync::OnceLock;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::http::fetch;
use super::{CollectorError, FreshnessSource};
use crate::analysis::{FreshnessInfo, FreshnessSource as DateSource};

const NO_DATE_FOUND: &str = "no last-updated date found";

/// Raw date strings gathered for one page, before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreshnessCandidates {
    pub header: Option<String>,
    pub sitemap: Option<String>,
    pub content: Vec<String>,
}

impl FreshnessCandidates {
    fn dated(&self) -> impl Iterator<Item = (DateTime<Utc>, DateSource)> + '_ {
        let header = self
            .header
            .iter()
            .map(|raw| (raw.as_str(), DateSource::HttpHeader));
        let sitemap = self
            .sitemap
            .iter()
            .map(|raw| (raw.as_str(), DateSource::Sitemap));
        let content = self
            .content
            .iter()
            .map(|raw| (raw.as_str(), DateSource::Content));

        header
            .chain(sitemap)
            .chain(content)
            .filter_map(|(raw, source)| parse_timestamp(raw).map(|date| (date, source)))
    }
}

/// Pick the most recent valid date and report its age relative to `now`.
///
/// The reported source is where that most recent date came from. Records
/// written by the earlier dashboard labelled the source "HTTP headers"
/// whenever a Last-Modified header existed, even when a newer sitemap or
/// content date was used, so sources differ from those records.
///
/// Ties keep the earlier candidate, so a header beats a sitemap entry with
/// the same timestamp and a sitemap entry beats page content.
pub fn resolve_freshness(candidates: &FreshnessCandidates, now: DateTime<Utc>) -> FreshnessInfo {
    let most_recent = candidates
        .dated()
        .fold(None, |best: Option<(DateTime<Utc>, DateSource)>, candidate| match best {
            Some(current) if current.0 >= candidate.0 => Some(current),
            _ => Some(candidate),
        });

    match most_recent {
        Some((last_updated, source)) => FreshnessInfo::Found {
            last_updated,
            age_in_days: age_in_days(last_updated, now),
            source,
        },
        None => FreshnessInfo::not_found(NO_DATE_FOUND),
    }
}

fn age_in_days(last_updated: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = (now - last_updated).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Parse the date formats seen in headers, sitemaps and markup.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return Some(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(date.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}

/// `<lastmod>` of the `<url>` entry whose `<loc>` is `page_url`.
pub fn sitemap_lastmod(xml: &str, page_url: &Url) -> Result<Option<String>, CollectorError> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Field {
        Loc,
        LastMod,
        Other,
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut in_url = false;
    let mut field = Field::Other;
    let mut loc: Option<String> = None;
    let mut lastmod: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"url" => {
                    in_url = true;
                    loc = None;
                    lastmod = None;
                }
                b"loc" if in_url => field = Field::Loc,
                b"lastmod" if in_url => field = Field::LastMod,
                _ => field = Field::Other,
            },
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().trim().to_string();
                match field {
                    Field::Loc => loc = Some(text),
                    Field::LastMod => lastmod = Some(text),
                    Field::Other => {}
                }
            }
            Ok(Event::End(ref e)) => {
                if e.local_name().as_ref() == b"url" {
                    in_url = false;
                    let matches_page = loc
                        .as_deref()
                        .and_then(|loc| Url::parse(loc).ok())
                        .is_some_and(|loc| &loc == page_url);
                    if matches_page {
                        return Ok(lastmod.take());
                    }
                }
                field = Field::Other;
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(CollectorError::Parse {
                    what: "sitemap",
                    detail: format!(
                        "error at position {}: {err}",
                        reader.buffer_position()
                    ),
                })
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(None)
}

fn content_selectors() -> &'static [Selector; 3] {
    static SELECTORS: OnceLock<[Selector; 3]> = OnceLock::new();
    SELECTORS.get_or_init(|| {
        [
            r#"time[datetime]"#,
            r#"meta[property="article:published_time"]"#,
            r#"meta[property="article:modified_time"]"#,
        ]
        .map(|raw| Selector::parse(raw).expect("selector literal is valid CSS"))
    })
}

/// Dates declared in the markup: `<time datetime>` and article meta tags.
pub fn content_dates(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let [time, published, modified] = content_selectors();

    let times = document
        .select(time)
        .filter_map(|element| element.value().attr("datetime"));
    let meta = [published, modified].into_iter().filter_map(|selector| {
        document
            .select(selector)
            .next()
            .and_then(|element| element.value().attr("content"))
    });

    times.chain(meta).map(str::to_string).collect()
}

/// Root sitemap location for the page's origin.
fn sitemap_url(page_url: &Url) -> Option<Url> {
    page_url.join("/sitemap.xml").ok()
}

/// Collects freshness candidates over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFreshnessSource {
    client: Client,
}

impl HttpFreshnessSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn sitemap_candidate(&self, page_url: &Url) -> Option<String> {
        let sitemap_url = sitemap_url(page_url)?;
        let result = match fetch(&self.client, &sitemap_url).await {
            Ok(document) => sitemap_lastmod(&document.body, page_url),
            Err(err) => Err(err),
        };

        match result {
            Ok(lastmod) => lastmod,
            Err(err) => {
                debug!(%sitemap_url, error = %err, "sitemap unavailable");
                None
            }
        }
    }
}

#[async_trait]
impl FreshnessSource for HttpFreshnessSource {
    async fn last_updated(&self, url: &Url) -> Result<FreshnessInfo, CollectorError> {
        let (page, sitemap) = tokio::join!(fetch(&self.client, url), self.sitemap_candidate(url));
        let page = page?;

        let content = if page.is_html() {
            content_dates(&page.body)
        } else {
            Vec::new()
        };

        let candidates = FreshnessCandidates {
            header: page.last_modified,
            sitemap,
            content,
        };
        let freshness = resolve_freshness(&candidates, Utc::now());
        debug!(%url, ?freshness, "resolved freshness");
        Ok(freshness)
    }
}
