use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataClientError {
    /// The provider answered but had no observations in the requested range.
    /// Distinct from transport faults: this must never be retried.
    #[error("No observations for '{symbol}' in the requested range")]
    NoData { symbol: String },

    #[error("HTTP transport failure: {0}")]
    Http(#[from] reqwest::Error),

    #[error("The provider returned an error: {0}")]
    Api(String),

    #[error("Failed to deserialize the provider response: {0}")]
    Deserialization(String),
}

impl DataClientError {
    /// Whether retrying the request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, DataClientError::Http(_) | DataClientError::Api(_))
    }
}
