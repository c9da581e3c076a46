use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/search";
pub const DEFAULT_GENERATE_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

/// Used when RUST_LOG is unset. The summarizer's payload/response records are debug level.
pub const DEFAULT_LOG_FILTER: &str = "info,gleaner::summarizer=debug";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("Failed to load env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Command line overrides for the server binary.
#[derive(Parser, Debug, Default)]
#[command(name = "gleaner", about = "Search the web and summarize what comes back")]
pub struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Dotenv file to load before reading the environment
    #[arg(long)]
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub search_api_key: String,
    pub generate_api_key: String,
    pub search_endpoint: String,
    pub generate_endpoint: String,
    pub port: u16,
    /// How many fetched pages are forwarded to the summarizer.
    pub max_summarized: usize,
    /// Upper bound on in-flight page fetches; 1 fetches one url at a time.
    pub fetch_concurrency: usize,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Ok(Config {
            search_api_key: get_env("BING_API_KEY")?,
            generate_api_key: get_env("GEMINI_API_KEY")?,
            search_endpoint: get_env_or_default("BING_ENDPOINT", DEFAULT_SEARCH_ENDPOINT),
            generate_endpoint: get_env_or_default("GEMINI_ENDPOINT", DEFAULT_GENERATE_ENDPOINT),
            port: parse_env_or_default("PORT", 3000)?,
            max_summarized: parse_env_or_default("MAX_SUMMARIZED", 2)?,
            fetch_concurrency: parse_env_or_default::<usize>("FETCH_CONCURRENCY", 1)?.max(1),
            request_timeout: Duration::from_secs(parse_env_or_default("REQUEST_TIMEOUT_SECS", 30)?),
        })
    }

    /// Loads the dotenv file (if any) and the environment, then applies CLI overrides.
    pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
        match &cli.env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
                    path: path.clone(),
                    source,
                })?;
            }
            None => {
                dotenvy::dotenv().ok(); // Load .env file if present
            }
        }
        let mut config = Config::from_env()?;
        if let Some(port) = cli.port {
            config.port = port;
        }
        Ok(config)
    }
}

/// RUST_LOG if set, otherwise [`DEFAULT_LOG_FILTER`].
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn get_env(key: &'static str) -> Result<String, ConfigError> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_or_default<T: std::str::FromStr>(
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        Err(_) => Ok(default),
    }
}
