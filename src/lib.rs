pub mod api;
pub mod config;
pub mod data_models;
pub mod fetcher;
pub mod pipeline;
pub mod search_client;
pub mod summarizer;
