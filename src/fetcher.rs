use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::Client;
use thiserror::Error;

use crate::data_models::SiteContent;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("error fetching page {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("error reading body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. } | FetchError::Body { url, .. } => url,
        }
    }
}

/// Retrieves page bodies for a list of urls.
///
/// Output order matches input order. The first url that fails aborts the whole
/// call and nothing fetched so far is returned.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, urls: &[String]) -> Result<Vec<SiteContent>, FetchError>;
}

pub struct HttpContentFetcher {
    client: Client,
    concurrency: usize,
}

impl HttpContentFetcher {
    pub fn new(client: Client, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<SiteContent, FetchError> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
        tracing::debug!(url, status = %res.status(), "fetched page");

        let body = res.bytes().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        // raw pass-through, no html cleaning
        Ok(SiteContent::new(url, String::from_utf8_lossy(&body)))
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch(&self, urls: &[String]) -> Result<Vec<SiteContent>, FetchError> {
        // `buffered` keeps input order; `try_collect` stops at the first error in that order
        // and drops any fetches still in flight.
        stream::iter(urls.iter().cloned())
            .map(|url| async move { self.fetch_page(&url).await })
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}
