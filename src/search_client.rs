use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::data_models::{BingSearchResponse, SearchResult};

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to parse search results: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Maps a text query to a ranked list of result urls.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResult, SearchError>;
}

/// Bing Web Search v7 client.
pub struct BingSearchClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl BingSearchClient {
    pub fn new(client: Client, endpoint: String, api_key: String) -> Self {
        Self {
            client,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl SearchProvider for BingSearchClient {
    async fn search(&self, query: &str) -> Result<SearchResult, SearchError> {
        let res = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query)])
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!(%status, "search provider returned non-success status");
        }

        let body = res.bytes().await?;
        let envelope: BingSearchResponse = serde_json::from_slice(&body)?;
        let links = envelope
            .web_pages
            .value
            .into_iter()
            .map(|page| page.url)
            .collect::<Vec<String>>();

        tracing::debug!(count = links.len(), "search returned links");
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> BingSearchClient {
        BingSearchClient::new(
            Client::new(),
            format!("{}/v7.0/search", server.uri()),
            "bing-key".to_string(),
        )
    }

    #[tokio::test]
    async fn test_search_extracts_urls_in_rank_order() {
        let mock_server = MockServer::start().await;

        let response_json = r#"{
            "_type": "SearchResponse",
            "webPages": {
                "value": [
                    {"name": "First", "url": "https://a.example"},
                    {"name": "Second", "url": "https://b.example"},
                    {"name": "Again", "url": "https://a.example"}
                ]
            }
        }"#;

        Mock::given(method("GET"))
            .and(path("/v7.0/search"))
            .and(query_param("q", "rust ownership"))
            .and(header(SUBSCRIPTION_KEY_HEADER, "bing-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(response_json))
            .expect(1)
            .mount(&mock_server)
            .await;

        let links = client_for(&mock_server).search("rust ownership").await.unwrap();

        assert_eq!(
            links,
            vec!["https://a.example", "https://b.example", "https://a.example"]
        );
    }

    #[tokio::test]
    async fn test_search_without_web_pages_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"error": {"code": "401", "message": "denied"}}"#),
            )
            .mount(&mock_server)
            .await;

        let links = client_for(&mock_server).search("anything").await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_search_non_json_body_is_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).search("anything").await.unwrap_err();
        assert!(matches!(err, SearchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_search_unreachable_host_is_transport_error() {
        let client = BingSearchClient::new(
            Client::new(),
            "http://127.0.0.1:1/v7.0/search".to_string(),
            "bing-key".to_string(),
        );

        let err = client.search("anything").await.unwrap_err();
        assert!(matches!(err, SearchError::Transport(_)));
    }
}
