use chrono::NaiveDate;
use core_types::ReferenceRate;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for an analysis run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Tradable symbols to analyze. Index symbols may carry a `^` prefix,
    /// which is stripped in the output tables.
    pub instruments: Vec<String>,
    /// Event dates (ISO 8601 calendar dates) to build windows around.
    pub event_dates: Vec<NaiveDate>,
    /// Window length in calendar months on each side of the event.
    #[serde(default = "default_window_length")]
    pub window_length_months: u32,
    /// The reference series used to form excess returns.
    pub reference: ReferenceRate,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Parameters governing how series are fetched from the data providers.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Upper bound on concurrently running triple computations. Each triple
    /// performs blocking network I/O, so this caps in-flight requests.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Attempts per fetch before a transport fault is downgraded to no-data.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Base URL of the market data provider. Overridable for tests.
    #[serde(default = "default_market_base_url")]
    pub market_base_url: String,
    /// Base URL of the macro data provider. Overridable for tests.
    #[serde(default = "default_macro_base_url")]
    pub macro_base_url: String,
    /// API key for the macro data provider. Falls back to the
    /// `FRED_API_KEY` environment variable when absent.
    #[serde(default)]
    pub macro_api_key: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
            max_attempts: default_max_attempts(),
            timeout_secs: default_timeout_secs(),
            market_base_url: default_market_base_url(),
            macro_base_url: default_macro_base_url(),
            macro_api_key: None,
        }
    }
}

/// Where the exported tables are written.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_window_length() -> u32 {
    3
}

fn default_max_concurrent() -> usize {
    8
}

fn default_max_attempts() -> u32 {
    3
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_market_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_macro_base_url() -> String {
    "https://api.stlouisfed.org".to_string()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("performance_tables")
}
