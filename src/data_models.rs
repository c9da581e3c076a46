use serde::{Deserialize, Serialize};

/// Ranked result urls, in provider relevance order.
pub type SearchResult = Vec<String>;

/// Raw body of a single fetched page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SiteContent {
    pub url: String,
    pub content: String,
}

impl SiteContent {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> SiteContent {
        SiteContent {
            url: url.into(),
            content: content.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

/// One conversational turn sent to the generation provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug, Clone)]
pub struct GenerateContentRequest {
    pub contents: Vec<PromptMessage>,
}

#[derive(Deserialize, Debug)]
pub struct GenerateContentResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl Candidate {
    /// Concatenated text of every part, or `None` when the candidate carries no text.
    pub fn text(&self) -> Option<String> {
        let parts = &self.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            return None;
        }
        Some(texts.concat())
    }
}

// Bing v7 envelope; only the fields we read.
#[derive(Deserialize, Debug, Default)]
pub struct BingSearchResponse {
    #[serde(rename = "webPages", default)]
    pub web_pages: WebPages,
}

#[derive(Deserialize, Debug, Default)]
pub struct WebPages {
    #[serde(default)]
    pub value: Vec<WebPage>,
}

#[derive(Deserialize, Debug)]
pub struct WebPage {
    pub url: String,
}

/// What `GET /search` returns on success.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PipelineResponse {
    pub links: Vec<String>,
    pub summary: String,
}
