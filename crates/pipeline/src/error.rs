use analytics::AnalyticsError;
use data_client::error::DataClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Data acquisition failed: {0}")]
    Acquisition(#[from] DataClientError),

    #[error("Analytics failure: {0}")]
    Analytics(#[from] AnalyticsError),
}
