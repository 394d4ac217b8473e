use crate::error::DataClientError;
use crate::responses::{FredErrorResponse, ObservationsResponse};
use crate::MacroDataProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use configuration::FetchConfig;
use core_types::TimeSeries;
use std::time::Duration;
use tracing::debug;

/// A concrete `MacroDataProvider` backed by the FRED observations API.
///
/// Values come back exactly as FRED quotes them (e.g. an annualized or
/// monthly percentage); unit conversion is the aligner's concern.
#[derive(Clone)]
pub struct FredClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FredClient {
    pub fn new(fetch: &FetchConfig, api_key: String) -> Result<Self, DataClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(fetch.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: fetch.macro_base_url.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl MacroDataProvider for FredClient {
    async fn fetch_observations(
        &self,
        series_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<TimeSeries, DataClientError> {
        let url = format!("{}/fred/series/observations", self.base_url);

        debug!("requesting observations for {series_id} in [{start}, {end}]");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("observation_start", &start.to_string()),
                ("observation_end", &end.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<FredErrorResponse>(&body) {
                return Err(DataClientError::Api(format!(
                    "macro provider error {}: {}",
                    error.error_code, error.error_message
                )));
            }
            return Err(DataClientError::Api(format!(
                "macro provider returned HTTP {status} for {series_id}"
            )));
        }

        let parsed: ObservationsResponse = serde_json::from_str(&body)
            .map_err(|e| DataClientError::Deserialization(e.to_string()))?;

        // FRED reports gaps as "." rather than omitting the row.
        let observations = parsed
            .observations
            .into_iter()
            .filter_map(|obs| obs.value.parse::<f64>().ok().map(|v| (obs.date, v)))
            .collect();

        let series = TimeSeries::new(observations);
        if series.is_empty() {
            return Err(DataClientError::NoData {
                symbol: series_id.to_string(),
            });
        }
        Ok(series)
    }
}
