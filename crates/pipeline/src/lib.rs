use crate::error::PipelineError;
use analytics::{align, EventWindow, ReferenceSeries, StatisticsEngine};
use chrono::NaiveDate;
use configuration::Config;
use core_types::{RecordOutcome, ReferenceRate, ResultTable, StatisticsRecord, WindowType};
use data_client::error::DataClientError;
use data_client::{with_retry, MacroDataProvider, MarketDataProvider};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

pub mod error;

/// Extra calendar months fetched on each side of the window when the
/// reference is a lower-frequency macro series, so forward-fill has a valid
/// anchor value at the window boundaries.
const MACRO_FETCH_MARGIN_MONTHS: u32 = 2;

/// Orchestrates one analysis batch: for every (instrument, event date,
/// window type) triple, fetch both series, align them, compute statistics,
/// and assemble a labeled record.
///
/// Each triple is independent and side-effect-free except for its one output
/// record, so the batch fans out across a bounded worker pool. No triple's
/// failure aborts the batch: every failure is downgraded to a no-data record
/// at the triple boundary, with a diagnostic.
#[derive(Clone)]
pub struct BatchRunner {
    market: Arc<dyn MarketDataProvider>,
    macro_provider: Arc<dyn MacroDataProvider>,
    config: Config,
    engine: StatisticsEngine,
}

impl BatchRunner {
    pub fn new(
        market: Arc<dyn MarketDataProvider>,
        macro_provider: Arc<dyn MacroDataProvider>,
        config: Config,
    ) -> Self {
        Self {
            market,
            macro_provider,
            config,
            engine: StatisticsEngine::new(),
        }
    }

    /// Runs the full instrument × event × window-type enumeration and
    /// returns the accumulated table, sorted by key for determinism.
    pub async fn run(&self) -> ResultTable {
        let triples: Vec<(String, NaiveDate, WindowType)> = self
            .config
            .instruments
            .iter()
            .flat_map(|symbol| {
                self.config.event_dates.iter().flat_map(|event_date| {
                    WindowType::ALL
                        .into_iter()
                        .map(|wt| (symbol.clone(), *event_date, wt))
                })
            })
            .collect();

        let progress_bar = ProgressBar::new(triples.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap()
                .progress_chars("=>-"),
        );

        let semaphore = Arc::new(Semaphore::new(self.config.fetch.max_concurrent));
        let handles: Vec<_> = triples
            .into_iter()
            .map(|(symbol, event_date, window_type)| {
                let runner = self.clone();
                let semaphore = semaphore.clone();
                let progress_bar = progress_bar.clone();
                let task_symbol = symbol.clone();
                let handle = tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .expect("batch semaphore closed");
                    let record = runner.run_triple(&task_symbol, event_date, window_type).await;
                    progress_bar.inc(1);
                    record
                });
                ((symbol, event_date, window_type), handle)
            })
            .collect();

        let mut table = ResultTable::new();
        for ((symbol, event_date, window_type), handle) in handles {
            match handle.await {
                Ok(record) => table.push(record),
                // A panicking task must not abort the batch; it yields a
                // no-data record like any other triple failure.
                Err(err) => {
                    warn!("task for {symbol} {event_date} ({window_type}) failed: {err}");
                    table.push(StatisticsRecord {
                        instrument: strip_index_prefix(&symbol).to_string(),
                        event_date,
                        window_type,
                        window_length_months: self.config.window_length_months,
                        annualization_factor: self.engine.annualization_factor(),
                        outcome: RecordOutcome::NoData,
                    });
                }
            }
        }

        progress_bar.finish_with_message("batch complete");
        table.sort();
        table
    }

    /// Computes one (instrument, event, window type) triple, downgrading any
    /// failure to a uniformly-populated no-data record.
    pub async fn run_triple(
        &self,
        symbol: &str,
        event_date: NaiveDate,
        window_type: WindowType,
    ) -> StatisticsRecord {
        let window = EventWindow::derive(event_date, window_type, self.config.window_length_months);

        let outcome = match self.compute_outcome(symbol, &window).await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("downgrading {symbol} {event_date} ({window_type}) to no-data: {err}");
                RecordOutcome::NoData
            }
        };

        info!("finished {symbol} for event {event_date} ({window_type})");
        StatisticsRecord {
            instrument: strip_index_prefix(symbol).to_string(),
            event_date,
            window_type,
            window_length_months: self.config.window_length_months,
            annualization_factor: self.engine.annualization_factor(),
            outcome,
        }
    }

    /// The fallible core of one triple: fetch, align, compute.
    ///
    /// An empty range ("no data") is a definitive answer and maps straight
    /// to a no-data outcome; transport faults surface as errors after the
    /// fetcher's bounded retries so the caller can log the distinction.
    async fn compute_outcome(
        &self,
        symbol: &str,
        window: &EventWindow,
    ) -> Result<RecordOutcome, PipelineError> {
        let max_attempts = self.config.fetch.max_attempts;

        let prices = match with_retry(symbol, max_attempts, || {
            self.market
                .fetch_daily_closes(symbol, window.start_date, window.end_date)
        })
        .await
        {
            Ok(series) => series,
            Err(DataClientError::NoData { .. }) => return Ok(RecordOutcome::NoData),
            Err(err) => return Err(err.into()),
        };
        let returns = prices.simple_returns();

        let reference = match &self.config.reference {
            ReferenceRate::MacroSeries { series_id } => {
                let (start, end) = window.extended(MACRO_FETCH_MARGIN_MONTHS);
                match with_retry(series_id, max_attempts, || {
                    self.macro_provider.fetch_observations(series_id, start, end)
                })
                .await
                {
                    Ok(series) => ReferenceSeries::MonthlyRatePct(series),
                    Err(DataClientError::NoData { .. }) => return Ok(RecordOutcome::NoData),
                    Err(err) => return Err(err.into()),
                }
            }
            ReferenceRate::Instrument {
                symbol: reference_symbol,
            } => {
                match with_retry(reference_symbol, max_attempts, || {
                    self.market.fetch_daily_closes(
                        reference_symbol,
                        window.start_date,
                        window.end_date,
                    )
                })
                .await
                {
                    Ok(series) => ReferenceSeries::InstrumentPrices(series),
                    Err(DataClientError::NoData { .. }) => return Ok(RecordOutcome::NoData),
                    Err(err) => return Err(err.into()),
                }
            }
        };

        let pair = align(&returns, &reference)?;
        Ok(self.engine.compute(&pair))
    }
}

/// Strips a leading index-market prefix (`^`) from a symbol, matching the
/// row identity downstream consumers key on.
pub fn strip_index_prefix(symbol: &str) -> &str {
    symbol.trim_start_matches('^')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_prefix_is_stripped() {
        assert_eq!(strip_index_prefix("^STOXX50E"), "STOXX50E");
        assert_eq!(strip_index_prefix("DAX"), "DAX");
    }
}
