use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::data_models::{
    GenerateContentRequest, GenerateContentResponse, Part, PromptMessage, SiteContent,
};

pub const SUMMARY_INSTRUCTION: &str =
    "Summarize the following web pages as one. Be as much factual as possible.";

#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to parse generation response (status {status}): {source}")]
    Decode {
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
    #[error("no summary returned from the API")]
    EmptyResult,
}

/// Turns a set of page bodies into one summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, contents: &[SiteContent]) -> Result<String, SummarizeError>;
}

/// Builds the single user turn: the instruction followed by one part per page body.
pub fn build_prompt(contents: &[SiteContent]) -> PromptMessage {
    let mut parts = Vec::with_capacity(contents.len() + 1);
    parts.push(Part {
        text: SUMMARY_INSTRUCTION.to_string(),
    });
    parts.extend(contents.iter().map(|c| Part {
        text: c.content.clone(),
    }));

    PromptMessage {
        role: "user".to_string(),
        parts,
    }
}

/// Gemini `generateContent` client.
pub struct GeminiSummarizer {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiSummarizer {
    pub fn new(client: Client, endpoint: String, api_key: String) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, contents: &[SiteContent]) -> Result<String, SummarizeError> {
        let payload = GenerateContentRequest {
            contents: vec![build_prompt(contents)],
        };
        match serde_json::to_string(&payload) {
            Ok(json) => tracing::debug!(payload = %json, "payload to generation API"),
            Err(e) => tracing::warn!("could not render payload for logging: {}", e),
        }

        let res = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(%status, response = %body, "response from generation API");

        let response: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|source| SummarizeError::Decode { status, source })?;

        let first = response
            .candidates
            .first()
            .ok_or(SummarizeError::EmptyResult)?;
        first.text().ok_or(SummarizeError::EmptyResult)
    }
}
