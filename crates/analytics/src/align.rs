use crate::error::AnalyticsError;
use chrono::NaiveDate;
use core_types::{ReturnSeries, TimeSeries};

/// Average days per calendar month. Used only to convert a monthly-quoted
/// periodic rate into its per-day equivalent; all annualization elsewhere
/// uses the 252-trading-day convention.
pub const AVERAGE_DAYS_IN_MONTH: f64 = 30.44;

/// The reference series in its raw, as-fetched form.
#[derive(Debug, Clone)]
pub enum ReferenceSeries {
    /// A lower-frequency rate quoted as a periodic percentage (e.g. a
    /// monthly 1.2 meaning 1.2% per month). Needs resampling to daily.
    MonthlyRatePct(TimeSeries),
    /// A second tradable price series at the instrument's own frequency.
    /// Its simple returns are aligned by date intersection directly.
    InstrumentPrices(TimeSeries),
}

/// An instrument return series and its reference, reduced to a shared date
/// index. Both sides are guaranteed to have identical dates in identical
/// order with no missing value at any shared date.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    dates: Vec<NaiveDate>,
    returns: Vec<f64>,
    reference: Vec<f64>,
}

impl AlignedPair {
    pub fn new(
        dates: Vec<NaiveDate>,
        returns: Vec<f64>,
        reference: Vec<f64>,
    ) -> Result<Self, AnalyticsError> {
        if returns.len() != reference.len() || returns.len() != dates.len() {
            return Err(AnalyticsError::MisalignedSeries {
                returns: returns.len(),
                reference: reference.len(),
            });
        }
        Ok(Self {
            dates,
            returns,
            reference,
        })
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    pub fn reference(&self) -> &[f64] {
        &self.reference
    }

    /// The per-date excess of the instrument return over the reference.
    pub fn excess_returns(&self) -> Vec<f64> {
        self.returns
            .iter()
            .zip(&self.reference)
            .map(|(r, rf)| r - rf)
            .collect()
    }
}

/// Converts a monthly percentage rate series into its per-day equivalent:
/// `(1 + rate/100)^(1/30.44) − 1`, keeping the monthly observation dates.
pub fn monthly_rate_to_daily(series: &TimeSeries) -> TimeSeries {
    series.map_values(|pct| (1.0 + pct / 100.0).powf(1.0 / AVERAGE_DAYS_IN_MONTH) - 1.0)
}

/// Reduces the reference onto the instrument's return dates.
///
/// A monthly rate is first converted to a per-day rate, then forward-filled:
/// each return date takes the most recent rate observed on or before it.
/// Return dates with no anchor (or, for a tradable reference, no matching
/// return) are dropped, never zero-filled.
pub fn align(
    returns: &ReturnSeries,
    reference: &ReferenceSeries,
) -> Result<AlignedPair, AnalyticsError> {
    let mut dates = Vec::with_capacity(returns.len());
    let mut instrument = Vec::with_capacity(returns.len());
    let mut aligned_reference = Vec::with_capacity(returns.len());

    match reference {
        ReferenceSeries::MonthlyRatePct(raw) => {
            let daily = monthly_rate_to_daily(raw);
            for (date, r) in returns.iter() {
                if let Some(rf) = daily.value_on_or_before(*date) {
                    dates.push(*date);
                    instrument.push(*r);
                    aligned_reference.push(rf);
                }
            }
        }
        ReferenceSeries::InstrumentPrices(prices) => {
            let reference_returns = prices.simple_returns();
            for (date, r) in returns.iter() {
                if let Some(rf) = reference_returns.value_on(*date) {
                    dates.push(*date);
                    instrument.push(*r);
                    aligned_reference.push(rf);
                }
            }
        }
    }

    AlignedPair::new(dates, instrument, aligned_reference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    /// A flat daily price walk spanning [start, end] so that every
    /// consecutive day yields a return observation.
    fn flat_prices(start: &str, end: &str) -> TimeSeries {
        let mut observations = Vec::new();
        let mut date = d(start);
        while date <= d(end) {
            observations.push((date, 100.0));
            date = date.succ_opt().unwrap();
        }
        TimeSeries::new(observations)
    }

    #[test]
    fn forward_fill_switches_at_the_new_monthly_observation() {
        let monthly = TimeSeries::new(vec![(d("2020-01-01"), 1.0), (d("2020-02-01"), 1.2)]);
        let returns = flat_prices("2020-01-15", "2020-02-15").simple_returns();

        let pair = align(&returns, &ReferenceSeries::MonthlyRatePct(monthly)).unwrap();
        assert_eq!(pair.len(), returns.len());

        let january_rate = (1.0_f64 + 0.01).powf(1.0 / AVERAGE_DAYS_IN_MONTH) - 1.0;
        let february_rate = (1.0_f64 + 0.012).powf(1.0 / AVERAGE_DAYS_IN_MONTH) - 1.0;
        for (date, rf) in pair.dates().iter().zip(pair.reference()) {
            if *date < d("2020-02-01") {
                assert_relative_eq!(*rf, january_rate);
            } else {
                assert_relative_eq!(*rf, february_rate);
            }
        }
    }

    #[test]
    fn dates_before_the_first_rate_observation_are_dropped() {
        let monthly = TimeSeries::new(vec![(d("2020-02-01"), 1.0)]);
        let returns = flat_prices("2020-01-28", "2020-02-03").simple_returns();

        let pair = align(&returns, &ReferenceSeries::MonthlyRatePct(monthly)).unwrap();
        assert!(pair.dates().iter().all(|date| *date >= d("2020-02-01")));
        assert!(pair.len() < returns.len());
    }

    #[test]
    fn tradable_reference_aligns_by_date_intersection() {
        let instrument = TimeSeries::new(vec![
            (d("2020-01-01"), 100.0),
            (d("2020-01-02"), 101.0),
            (d("2020-01-03"), 102.0),
        ]);
        // The reference is missing Jan 2, so the Jan 2 and Jan 3 returns
        // cannot both survive: only dates present in both series remain.
        let reference = TimeSeries::new(vec![
            (d("2020-01-01"), 50.0),
            (d("2020-01-03"), 51.0),
        ]);

        let returns = instrument.simple_returns();
        let pair = align(&returns, &ReferenceSeries::InstrumentPrices(reference)).unwrap();
        assert_eq!(pair.dates(), &[d("2020-01-03")]);
        assert_relative_eq!(pair.returns()[0], 102.0 / 101.0 - 1.0);
        assert_relative_eq!(pair.reference()[0], 51.0 / 50.0 - 1.0);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let result = AlignedPair::new(vec![d("2020-01-01")], vec![0.1], vec![]);
        assert!(matches!(
            result,
            Err(AnalyticsError::MisalignedSeries { .. })
        ));
    }
}
