use serde::Deserialize;

pub use crate::data_models::PipelineResponse as SearchResponse;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}
