use chrono::NaiveDate;
use serde::Deserialize;

// ==============================================================================
// Market data provider (Yahoo Finance v8 chart API)
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    /// Trading-day timestamps in epoch seconds. Absent when the range holds
    /// no trading data at all.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
    /// Split/dividend-adjusted closes; preferred over raw closes when present.
    pub adjclose: Option<Vec<AdjCloseBlock>>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteBlock {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjCloseBlock {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

// ==============================================================================
// Macro data provider (FRED series/observations API)
// ==============================================================================

#[derive(Debug, Deserialize)]
pub struct ObservationsResponse {
    #[serde(default)]
    pub observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    /// FRED encodes a missing observation as the literal string ".".
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct FredErrorResponse {
    pub error_code: i64,
    pub error_message: String,
}
