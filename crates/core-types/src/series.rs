use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An ordered date-indexed series of observations (price levels or rates).
///
/// Invariants: dates are strictly increasing with no duplicates; every value
/// is finite. Gaps (non-trading days) are allowed. The constructor enforces
/// all of this, so downstream code can rely on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    observations: Vec<(NaiveDate, f64)>,
}

impl TimeSeries {
    /// Builds a series from raw observations: sorts by date, keeps the first
    /// value for any duplicated date, and drops non-finite values.
    pub fn new(mut observations: Vec<(NaiveDate, f64)>) -> Self {
        observations.retain(|(_, v)| v.is_finite());
        observations.sort_by_key(|(d, _)| *d);
        observations.dedup_by_key(|(d, _)| *d);
        Self { observations }
    }

    pub fn empty() -> Self {
        Self {
            observations: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(NaiveDate, f64)> {
        self.observations.iter()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|(d, _)| *d)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|(d, _)| *d)
    }

    /// Looks up the value observed exactly on `date`.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.observations
            .binary_search_by_key(&date, |(d, _)| *d)
            .ok()
            .map(|idx| self.observations[idx].1)
    }

    /// Looks up the most recent value observed on or before `date`.
    ///
    /// This is the primitive behind forward-filling a lower-frequency
    /// series onto a daily index.
    pub fn value_on_or_before(&self, date: NaiveDate) -> Option<f64> {
        match self.observations.binary_search_by_key(&date, |(d, _)| *d) {
            Ok(idx) => Some(self.observations[idx].1),
            Err(0) => None,
            Err(idx) => Some(self.observations[idx - 1].1),
        }
    }

    /// Applies `f` to every value, preserving the date index.
    pub fn map_values<F: Fn(f64) -> f64>(&self, f: F) -> TimeSeries {
        TimeSeries {
            observations: self
                .observations
                .iter()
                .map(|(d, v)| (*d, f(*v)))
                .collect(),
        }
    }

    /// Converts price levels into simple period-over-period returns.
    ///
    /// The result has exactly one observation fewer than the source and is
    /// indexed on the later date of each consecutive pair.
    pub fn simple_returns(&self) -> ReturnSeries {
        let observations = self
            .observations
            .windows(2)
            .map(|w| (w[1].0, w[1].1 / w[0].1 - 1.0))
            .collect();
        ReturnSeries { observations }
    }
}

/// A derived series of simple returns, indexed on the later date of each
/// consecutive source pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    observations: Vec<(NaiveDate, f64)>,
}

impl ReturnSeries {
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(NaiveDate, f64)> {
        self.observations.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.observations.iter().map(|(d, _)| *d)
    }

    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.observations
            .binary_search_by_key(&date, |(d, _)| *d)
            .ok()
            .map(|idx| self.observations[idx].1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn constructor_sorts_dedups_and_drops_non_finite() {
        let series = TimeSeries::new(vec![
            (d("2020-01-03"), 3.0),
            (d("2020-01-01"), 1.0),
            (d("2020-01-01"), 99.0),
            (d("2020-01-02"), f64::NAN),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.first_date(), Some(d("2020-01-01")));
        assert_eq!(series.value_on(d("2020-01-01")), Some(1.0));
    }

    #[test]
    fn returns_use_exactly_n_minus_one_observations() {
        let series = TimeSeries::new(vec![
            (d("2020-01-01"), 100.0),
            (d("2020-01-02"), 110.0),
            (d("2020-01-03"), 99.0),
            (d("2020-01-06"), 99.0),
        ]);
        let returns = series.simple_returns();
        assert_eq!(returns.len(), series.len() - 1);
        assert_relative_eq!(returns.value_on(d("2020-01-02")).unwrap(), 0.10);
        assert_relative_eq!(returns.value_on(d("2020-01-03")).unwrap(), -0.10);
        assert_relative_eq!(returns.value_on(d("2020-01-06")).unwrap(), 0.0);
    }

    #[test]
    fn value_on_or_before_forward_fills() {
        let series = TimeSeries::new(vec![(d("2020-01-01"), 1.0), (d("2020-02-01"), 2.0)]);
        assert_eq!(series.value_on_or_before(d("2019-12-31")), None);
        assert_eq!(series.value_on_or_before(d("2020-01-15")), Some(1.0));
        assert_eq!(series.value_on_or_before(d("2020-02-01")), Some(2.0));
        assert_eq!(series.value_on_or_before(d("2020-03-01")), Some(2.0));
    }
}
