use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::{PairStatus, WindowType};

/// The ten numeric statistics computed for one window.
///
/// All return and volatility figures are annualized; min/max, skewness and
/// kurtosis describe the daily excess-return distribution directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsBundle {
    pub avg_return: f64,
    pub geo_avg_return: f64,
    pub avg_excess_return: f64,
    pub geo_avg_excess_return: f64,
    pub std_excess_return: f64,
    pub sharpe_ratio: f64,
    pub min_excess_return: f64,
    pub max_excess_return: f64,
    pub skew_excess_return: f64,
    pub kurtosis_excess_return: f64,
}

impl StatsBundle {
    /// Column labels in export order. These are part of the output schema
    /// consumed downstream and must stay stable.
    pub const FIELD_LABELS: [&'static str; 10] = [
        "Annualized avg returns",
        "Annualized geo avg returns",
        "Annualized avg excess returns",
        "Annualized geo avg excess returns",
        "Annualized std excess returns",
        "Annualized Sharpe ratio",
        "Min excess returns",
        "Max excess returns",
        "Skewness excess returns",
        "Kurtosis excess returns",
    ];

    pub fn zeroed() -> Self {
        Self::from_array([0.0; 10])
    }

    /// Field values in the same order as `FIELD_LABELS`.
    pub fn as_array(&self) -> [f64; 10] {
        [
            self.avg_return,
            self.geo_avg_return,
            self.avg_excess_return,
            self.geo_avg_excess_return,
            self.std_excess_return,
            self.sharpe_ratio,
            self.min_excess_return,
            self.max_excess_return,
            self.skew_excess_return,
            self.kurtosis_excess_return,
        ]
    }

    pub fn from_array(values: [f64; 10]) -> Self {
        Self {
            avg_return: values[0],
            geo_avg_return: values[1],
            avg_excess_return: values[2],
            geo_avg_excess_return: values[3],
            std_excess_return: values[4],
            sharpe_ratio: values[5],
            min_excess_return: values[6],
            max_excess_return: values[7],
            skew_excess_return: values[8],
            kurtosis_excess_return: values[9],
        }
    }
}

/// The outcome of one (instrument, event, window) computation.
///
/// "No data" is a first-class value rather than an error: the statistics
/// engine returns it whenever the window cannot support a full bundle, and
/// a record is never partially populated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    Computed(StatsBundle),
    NoData,
}

impl RecordOutcome {
    pub fn is_no_data(&self) -> bool {
        matches!(self, RecordOutcome::NoData)
    }

    pub fn stats(&self) -> Option<&StatsBundle> {
        match self {
            RecordOutcome::Computed(bundle) => Some(bundle),
            RecordOutcome::NoData => None,
        }
    }

    /// The bundle with NoData coerced to zeros, as the growth pass requires.
    pub fn stats_or_zero(&self) -> StatsBundle {
        match self {
            RecordOutcome::Computed(bundle) => *bundle,
            RecordOutcome::NoData => StatsBundle::zeroed(),
        }
    }
}

/// One labeled row of the performance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    /// Instrument identity with any index-market prefix (leading `^`)
    /// already stripped.
    pub instrument: String,
    pub event_date: NaiveDate,
    pub window_type: WindowType,
    pub window_length_months: u32,
    pub annualization_factor: f64,
    pub outcome: RecordOutcome,
}

impl StatisticsRecord {
    pub fn sort_key(&self) -> (String, NaiveDate, WindowType) {
        (self.instrument.clone(), self.event_date, self.window_type)
    }
}

/// Append-only collection of statistics records accumulated across a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    records: Vec<StatisticsRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: StatisticsRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[StatisticsRecord] {
        &self.records
    }

    /// Sorts rows by (instrument, event date, window type) so output is
    /// deterministic regardless of the order workers completed in.
    pub fn sort(&mut self) {
        self.records.sort_by_key(|r| r.sort_key());
    }
}

impl FromIterator<StatisticsRecord> for ResultTable {
    fn from_iter<I: IntoIterator<Item = StatisticsRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// One row of the growth table: post-minus-pre deltas for a single
/// (instrument, event) key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub instrument: String,
    pub event_date: NaiveDate,
    pub pair_status: PairStatus,
    pub deltas: StatsBundle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_data_coerces_to_zeros() {
        let bundle = RecordOutcome::NoData.stats_or_zero();
        assert_eq!(bundle.as_array(), [0.0; 10]);
    }

    #[test]
    fn field_array_round_trips() {
        let values = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, -0.7, 0.8, 0.9, 1.0];
        assert_eq!(StatsBundle::from_array(values).as_array(), values);
    }
}
