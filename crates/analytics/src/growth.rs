use chrono::NaiveDate;
use core_types::{GrowthRecord, PairStatus, ResultTable, StatisticsRecord, StatsBundle, WindowType};
use std::collections::BTreeMap;
use tracing::warn;

/// Pivots a result table into per-(instrument, event) post-minus-pre deltas.
///
/// Straddling records take no part. Where a key has more than one record of
/// a side, the first one wins. No-data outcomes coerce to zero before
/// subtraction; a missing side also contributes zeros but is surfaced
/// through `pair_status` rather than silently conflated with "no effect".
pub fn compute_growth(table: &ResultTable) -> Vec<GrowthRecord> {
    type Pair<'a> = (Option<&'a StatisticsRecord>, Option<&'a StatisticsRecord>);
    let mut pairs: BTreeMap<(String, NaiveDate), Pair> = BTreeMap::new();

    for record in table.records() {
        let key = (record.instrument.clone(), record.event_date);
        let entry = pairs.entry(key).or_insert((None, None));
        match record.window_type {
            WindowType::Pre => {
                if entry.0.is_none() {
                    entry.0 = Some(record);
                }
            }
            WindowType::Post => {
                if entry.1.is_none() {
                    entry.1 = Some(record);
                }
            }
            WindowType::Straddling => {}
        }
    }

    pairs
        .into_iter()
        .filter_map(|((instrument, event_date), (pre, post))| {
            let pair_status = match (pre, post) {
                (Some(_), Some(_)) => PairStatus::Complete,
                (None, Some(_)) => PairStatus::MissingPre,
                (Some(_), None) => PairStatus::MissingPost,
                // A key seeded only by straddling records has nothing to
                // difference.
                (None, None) => return None,
            };
            if pair_status != PairStatus::Complete {
                warn!(
                    "incomplete pre/post pair for {instrument} around {event_date}: {pair_status}"
                );
            }

            let pre_values = pre
                .map(|r| r.outcome.stats_or_zero())
                .unwrap_or_else(StatsBundle::zeroed)
                .as_array();
            let post_values = post
                .map(|r| r.outcome.stats_or_zero())
                .unwrap_or_else(StatsBundle::zeroed)
                .as_array();

            let mut deltas = [0.0; 10];
            for (i, delta) in deltas.iter_mut().enumerate() {
                *delta = post_values[i] - pre_values[i];
            }

            Some(GrowthRecord {
                instrument,
                event_date,
                pair_status,
                deltas: StatsBundle::from_array(deltas),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core_types::RecordOutcome;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn record(
        instrument: &str,
        event_date: &str,
        window_type: WindowType,
        avg_return: f64,
    ) -> StatisticsRecord {
        let mut bundle = StatsBundle::zeroed();
        bundle.avg_return = avg_return;
        StatisticsRecord {
            instrument: instrument.to_string(),
            event_date: d(event_date),
            window_type,
            window_length_months: 3,
            annualization_factor: 252.0,
            outcome: RecordOutcome::Computed(bundle),
        }
    }

    #[test]
    fn delta_is_post_minus_pre() {
        let table: ResultTable = [
            record("DAX", "2016-11-08", WindowType::Pre, 0.05),
            record("DAX", "2016-11-08", WindowType::Post, 0.08),
        ]
        .into_iter()
        .collect();

        let growth = compute_growth(&table);
        assert_eq!(growth.len(), 1);
        assert_eq!(growth[0].pair_status, PairStatus::Complete);
        assert_relative_eq!(growth[0].deltas.avg_return, 0.03);
    }

    #[test]
    fn straddling_records_are_ignored() {
        let table: ResultTable = [record("DAX", "2016-11-08", WindowType::Straddling, 0.9)]
            .into_iter()
            .collect();
        assert!(compute_growth(&table).is_empty());
    }

    #[test]
    fn missing_post_is_marked_not_zero_filled_silently() {
        let table: ResultTable = [record("DAX", "2016-11-08", WindowType::Pre, 0.05)]
            .into_iter()
            .collect();

        let growth = compute_growth(&table);
        assert_eq!(growth.len(), 1);
        assert_eq!(growth[0].pair_status, PairStatus::MissingPost);
        assert_relative_eq!(growth[0].deltas.avg_return, -0.05);
    }

    #[test]
    fn no_data_outcomes_coerce_to_zero() {
        let mut no_data = record("DAX", "2016-11-08", WindowType::Pre, 0.0);
        no_data.outcome = RecordOutcome::NoData;
        let table: ResultTable = [
            no_data,
            record("DAX", "2016-11-08", WindowType::Post, 0.08),
        ]
        .into_iter()
        .collect();

        let growth = compute_growth(&table);
        assert_eq!(growth[0].pair_status, PairStatus::Complete);
        assert_relative_eq!(growth[0].deltas.avg_return, 0.08);
    }

    #[test]
    fn keys_come_out_in_deterministic_order() {
        let table: ResultTable = [
            record("SAP", "2016-11-08", WindowType::Pre, 0.01),
            record("SAP", "2016-11-08", WindowType::Post, 0.02),
            record("DAX", "2020-11-03", WindowType::Pre, 0.01),
            record("DAX", "2020-11-03", WindowType::Post, 0.02),
            record("DAX", "2016-11-08", WindowType::Pre, 0.01),
            record("DAX", "2016-11-08", WindowType::Post, 0.02),
        ]
        .into_iter()
        .collect();

        let keys: Vec<(String, NaiveDate)> = compute_growth(&table)
            .into_iter()
            .map(|g| (g.instrument, g.event_date))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("DAX".to_string(), d("2016-11-08")),
                ("DAX".to_string(), d("2020-11-03")),
                ("SAP".to_string(), d("2016-11-08")),
            ]
        );
    }
}
