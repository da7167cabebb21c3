use reqwest::header::{CONTENT_TYPE, LAST_MODIFIED};
use reqwest::Client;
use url::Url;

use super::CollectorError;
use crate::config::CollectorConfig;

pub(crate) fn build_client(config: &CollectorConfig) -> Result<Client, CollectorError> {
    let client = Client::builder()
        .timeout(config.http_timeout)
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(client)
}

/// Body and the headers the collectors care about.
pub(crate) struct FetchedDocument {
    pub body: String,
    pub content_type: Option<mime::Mime>,
    pub last_modified: Option<String>,
}

impl FetchedDocument {
    pub fn is_html(&self) -> bool {
        match &self.content_type {
            Some(content_type) => {
                content_type.essence_str() == mime::TEXT_HTML.essence_str()
                    || content_type.essence_str() == "application/xhtml+xml"
            }
            None => true,
        }
    }
}

pub(crate) async fn fetch(client: &Client, url: &Url) -> Result<FetchedDocument, CollectorError> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CollectorError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let headers = response.headers();
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<mime::Mime>().ok());
    let last_modified = headers
        .get(LAST_MODIFIED)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let body = response.text().await?;

    Ok(FetchedDocument {
        body,
        content_type,
        last_modified,
    })
}
