//! On-page signals extracted from the raw HTML.

use std::sync::OnceLock;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::http::fetch;
use super::{CollectorError, SiteInfoSource};
use crate::analysis::{SiteInfo, SocialLinks};

struct PageSelectors {
    title: Selector,
    description: Selector,
    keywords: Selector,
    images: Selector,
    images_with_alt: Selector,
    anchors: Selector,
    body: Selector,
    structured_data: Selector,
}

fn selectors() -> &'static PageSelectors {
    static SELECTORS: OnceLock<PageSelectors> = OnceLock::new();
    SELECTORS.get_or_init(|| PageSelectors {
        title: parse_selector("title"),
        description: parse_selector(r#"meta[name="description"]"#),
        keywords: parse_selector(r#"meta[name="keywords"]"#),
        images: parse_selector("img"),
        images_with_alt: parse_selector("img[alt]"),
        anchors: parse_selector("a"),
        body: parse_selector("body"),
        structured_data: parse_selector(r#"script[type="application/ld+json"]"#),
    })
}

fn parse_selector(raw: &'static str) -> Selector {
    Selector::parse(raw).expect("selector literal is valid CSS")
}

const FACEBOOK_HOSTS: &[&str] = &["facebook.com", "fb.com"];
const TWITTER_HOSTS: &[&str] = &["twitter.com", "x.com"];
const LINKEDIN_HOSTS: &[&str] = &["linkedin.com"];
const INSTAGRAM_HOSTS: &[&str] = &["instagram.com"];

/// Where an anchor points relative to the analyzed page.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LinkTarget {
    Internal,
    External(Url),
    /// `mailto:`, `tel:`, `javascript:` and other non-navigational hrefs.
    Other,
}

fn classify_link(href: &str, page_url: &Url) -> LinkTarget {
    let href = href.trim();
    match page_url.join(href) {
        Ok(target) if matches!(target.scheme(), "http" | "https") => {
            let same_site = match (target.host_str(), page_url.host_str()) {
                (Some(target_host), Some(page_host)) => same_site(target_host, page_host),
                _ => false,
            };
            if same_site {
                LinkTarget::Internal
            } else {
                LinkTarget::External(target)
            }
        }
        Ok(_) => LinkTarget::Other,
        // Unparseable hrefs are still links within the page.
        Err(_) => LinkTarget::Internal,
    }
}

fn same_site(a: &str, b: &str) -> bool {
    let strip = |host: &str| host.trim_start_matches("www.").to_ascii_lowercase();
    strip(a) == strip(b)
}

fn host_matches(host: &str, domains: &[&str]) -> bool {
    let host = host.to_ascii_lowercase();
    domains
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{domain}")))
}

fn meta_content(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .and_then(|element| element.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default()
}

fn word_count(body: Option<ElementRef<'_>>) -> u32 {
    body.map(|body| {
        body.text()
            .flat_map(str::split_whitespace)
            .count() as u32
    })
    .unwrap_or(0)
}

/// Extract the on-page signals for `page_url` from its HTML.
pub fn extract_site_info(html: &str, page_url: &Url) -> SiteInfo {
    let document = Html::parse_document(html);
    let selectors = selectors();

    let title = document
        .select(&selectors.title)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let mut internal_links = 0;
    let mut external_links = 0;
    let mut social_links = SocialLinks::default();
    let mut all_links = 0;

    for anchor in document.select(&selectors.anchors) {
        all_links += 1;
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        match classify_link(href, page_url) {
            LinkTarget::Internal => internal_links += 1,
            LinkTarget::External(target) => {
                external_links += 1;
                if let Some(host) = target.host_str() {
                    social_links.facebook |= host_matches(host, FACEBOOK_HOSTS);
                    social_links.twitter |= host_matches(host, TWITTER_HOSTS);
                    social_links.linkedin |= host_matches(host, LINKEDIN_HOSTS);
                    social_links.instagram |= host_matches(host, INSTAGRAM_HOSTS);
                }
            }
            LinkTarget::Other => {}
        }
    }

    SiteInfo {
        title,
        description: meta_content(&document, &selectors.description),
        keywords: meta_content(&document, &selectors.keywords),
        images: document.select(&selectors.images).count() as u32,
        images_with_alt: document.select(&selectors.images_with_alt).count() as u32,
        all_links,
        internal_links,
        external_links,
        word_count: word_count(document.select(&selectors.body).next()),
        has_structured_data: document.select(&selectors.structured_data).next().is_some(),
        social_links,
    }
}

/// Fetches the page over HTTP and extracts its signals.
#[derive(Debug, Clone)]
pub struct HttpSiteInfoSource {
    client: Client,
}

impl HttpSiteInfoSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SiteInfoSource for HttpSiteInfoSource {
    async fn site_info(&self, url: &Url) -> Result<SiteInfo, CollectorError> {
        let document = fetch(&self.client, url).await?;
        if !document.is_html() {
            return Err(CollectorError::Parse {
                what: "page",
                detail: format!(
                    "expected an HTML document, got {}",
                    document
                        .content_type
                        .as_ref()
                        .map(|mime| mime.essence_str().to_string())
                        .unwrap_or_default()
                ),
            });
        }

        let info = extract_site_info(&document.body, url);
        debug!(%url, words = info.word_count, images = info.images, "extracted site info");
        Ok(info)
    }
}
