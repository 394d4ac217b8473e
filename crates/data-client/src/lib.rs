use crate::error::DataClientError;
use crate::responses::ChartResponse;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use configuration::FetchConfig;
use core_types::TimeSeries;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::debug;

pub mod error;
pub mod fred;
pub mod responses;
pub mod retry;

// --- Public API ---
pub use fred::FredClient;
pub use retry::with_retry;

/// The generic, abstract interface for a daily market-data provider.
/// This trait is the contract the pipeline uses, allowing the underlying
/// implementation (live or mock) to be swapped out.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the daily closing price series for `symbol` over the
    /// inclusive date range `[start, end]`, gaps and missing values removed.
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, DataClientError>;
}

/// The abstract interface for a macroeconomic observation provider, whose
/// series come back at their native (typically monthly) frequency.
#[async_trait]
pub trait MacroDataProvider: Send + Sync {
    /// Fetches the observation series for `series_id` over `[start, end]`,
    /// in the provider's quoting convention (e.g. a percentage rate).
    async fn fetch_observations(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, DataClientError>;
}

/// A concrete `MarketDataProvider` backed by the Yahoo Finance chart API.
#[derive(Clone)]
pub struct YahooClient {
    client: reqwest::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(fetch: &FetchConfig) -> Result<Self, DataClientError> {
        let mut headers = HeaderMap::new();
        // The chart endpoint rejects requests without a browser-like agent.
        headers.insert(
            "User-Agent",
            HeaderValue::from_static("Mozilla/5.0 (X11; Linux x86_64)"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: fetch.market_base_url.clone(),
        })
    }

    /// Epoch second of midnight UTC on `date`.
    fn epoch(date: NaiveDate) -> i64 {
        date.and_time(NaiveTime::MIN).and_utc().timestamp()
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn fetch_daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, DataClientError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        // period2 is exclusive upstream; push it one day out so `end` is
        // included in the response.
        let period2 = end
            .succ_opt()
            .map(Self::epoch)
            .unwrap_or_else(|| Self::epoch(end));

        debug!("requesting daily closes for {symbol} in [{start}, {end}]");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("period1", Self::epoch(start).to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // The chart API wraps definitive "no such data" answers in its own
        // error object (often alongside a non-2xx status); a body that is
        // not chart-shaped at all is a transport-level fault.
        let parsed: ChartResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(DataClientError::Api(format!(
                    "market provider returned HTTP {status} for {symbol}"
                )));
            }
            Err(e) => return Err(DataClientError::Deserialization(e.to_string())),
        };

        if let Some(error) = parsed.chart.error {
            debug!(
                "market provider has no data for {symbol}: {}: {}",
                error.code, error.description
            );
            return Err(DataClientError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let result = parsed
            .chart
            .result
            .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
            .ok_or_else(|| DataClientError::NoData {
                symbol: symbol.to_string(),
            })?;

        // Prefer adjusted closes when the provider supplies them.
        let closes: Vec<Option<f64>> = match result.indicators.adjclose {
            Some(mut blocks) if !blocks.is_empty() => std::mem::take(&mut blocks[0].adjclose),
            _ => result
                .indicators
                .quote
                .into_iter()
                .next()
                .map(|q| q.close)
                .unwrap_or_default(),
        };

        let mut observations = Vec::with_capacity(result.timestamp.len());
        for (ts, close) in result.timestamp.iter().zip(closes) {
            let Some(price) = close else { continue };
            let date = chrono::DateTime::from_timestamp(*ts, 0)
                .ok_or_else(|| {
                    DataClientError::Deserialization(format!("invalid timestamp: {ts}"))
                })?
                .date_naive();
            observations.push((date, price));
        }

        let series = TimeSeries::new(observations);
        if series.is_empty() {
            return Err(DataClientError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(series)
    }
}
