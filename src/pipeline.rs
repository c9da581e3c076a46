use std::fmt;
use std::sync::Arc;

use reqwest::Client;
use thiserror::Error;

use crate::config::Config;
use crate::data_models::PipelineResponse;
use crate::fetcher::{ContentFetcher, FetchError, HttpContentFetcher};
use crate::search_client::{BingSearchClient, SearchError, SearchProvider};
use crate::summarizer::{GeminiSummarizer, SummarizeError, Summarizer};

/// Phase a single run is in. Runs only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Searching,
    Fetching,
    Summarizing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Searching => "searching",
            Stage::Fetching => "fetching",
            Stage::Summarizing => "summarizing",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Query parameter 'query' is missing")]
    BadRequest,
    #[error("Failed to search: {0}")]
    Search(#[source] SearchError),
    #[error("Failed to fetch site contents: {0}")]
    Fetch(#[source] FetchError),
    #[error("Failed to summarize content: {0}")]
    Summarize(#[source] SummarizeError),
}

impl PipelineError {
    /// The stage the run was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::BadRequest => Stage::Idle,
            PipelineError::Search(_) => Stage::Searching,
            PipelineError::Fetch(_) => Stage::Fetching,
            PipelineError::Summarize(_) => Stage::Summarizing,
        }
    }
}

/// search -> fetch -> summarize.
///
/// Holds no per-request state; every call to [`Pipeline::run`] builds its own
/// results and drops them once the response is assembled.
pub struct Pipeline {
    search: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn ContentFetcher>,
    summarizer: Arc<dyn Summarizer>,
    max_summarized: usize,
}

impl Pipeline {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn ContentFetcher>,
        summarizer: Arc<dyn Summarizer>,
        max_summarized: usize,
    ) -> Self {
        Self {
            search,
            fetcher,
            summarizer,
            max_summarized,
        }
    }

    /// Wires the Bing, HTTP fetch and Gemini collaborators from `config`,
    /// sharing one HTTP client between them.
    pub fn from_config(config: &Config) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self::new(
            Arc::new(BingSearchClient::new(
                client.clone(),
                config.search_endpoint.clone(),
                config.search_api_key.clone(),
            )),
            Arc::new(HttpContentFetcher::new(
                client.clone(),
                config.fetch_concurrency,
            )),
            Arc::new(GeminiSummarizer::new(
                client,
                config.generate_endpoint.clone(),
                config.generate_api_key.clone(),
            )),
            config.max_summarized,
        ))
    }

    pub async fn run(&self, query: &str) -> Result<PipelineResponse, PipelineError> {
        if query.trim().is_empty() {
            return Err(PipelineError::BadRequest);
        }

        tracing::info!(stage = %Stage::Searching, query, "running pipeline");
        let links = self.search.search(query).await.map_err(|e| {
            tracing::error!(stage = %Stage::Searching, "search failed: {:#}", e);
            PipelineError::Search(e)
        })?;

        tracing::info!(stage = %Stage::Fetching, links = links.len(), "fetching site contents");
        let contents = self.fetcher.fetch(&links).await.map_err(|e| {
            tracing::error!(stage = %Stage::Fetching, url = e.url(), "fetch failed: {:#}", e);
            PipelineError::Fetch(e)
        })?;

        let take = contents.len().min(self.max_summarized);
        tracing::info!(
            stage = %Stage::Summarizing,
            fetched = contents.len(),
            summarized = take,
            "summarizing contents"
        );
        let summary = self
            .summarizer
            .summarize(&contents[..take])
            .await
            .map_err(|e| {
                tracing::error!(stage = %Stage::Summarizing, "summarize failed: {:#}", e);
                PipelineError::Summarize(e)
            })?;

        tracing::info!(stage = %Stage::Done, links = links.len(), "pipeline finished");
        Ok(PipelineResponse { links, summary })
    }
}
