use crate::align::AlignedPair;
use core_types::{RecordOutcome, StatsBundle};
use tracing::debug;

/// Trading days per year; the annualization convention for every annualized
/// statistic this engine produces.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// A stateless calculator reducing an aligned return/reference pair to its
/// distributional statistics.
///
/// Degenerate windows (fewer than two observations, zero-variance excess
/// returns, or any non-finite intermediate) produce `RecordOutcome::NoData`
/// as a value; nothing is thrown past this component.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsEngine {
    annualization_factor: f64,
}

impl Default for StatisticsEngine {
    fn default() -> Self {
        Self {
            annualization_factor: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl StatisticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_annualization_factor(annualization_factor: f64) -> Self {
        Self {
            annualization_factor,
        }
    }

    pub fn annualization_factor(&self) -> f64 {
        self.annualization_factor
    }

    /// Computes the full statistics bundle over an aligned pair.
    pub fn compute(&self, pair: &AlignedPair) -> RecordOutcome {
        let n = pair.len();
        // A sample standard deviation needs at least two observations.
        if n < 2 {
            debug!("window has {n} aligned observations, marking record no-data");
            return RecordOutcome::NoData;
        }

        let a = self.annualization_factor;
        let returns = pair.returns();
        let excess = pair.excess_returns();

        let std_excess_daily = sample_std(&excess);
        if std_excess_daily == 0.0 || !std_excess_daily.is_finite() {
            debug!("zero-variance excess returns, marking record no-data");
            return RecordOutcome::NoData;
        }

        let avg_excess_return = mean(&excess) * a;
        let std_excess_return = std_excess_daily * a.sqrt();

        let (min_excess, max_excess) = extrema(&excess);
        let (skew, kurtosis) = standardized_moments(&excess);

        let bundle = StatsBundle {
            avg_return: mean(returns) * a,
            geo_avg_return: annualized_geometric(returns, a),
            avg_excess_return,
            geo_avg_excess_return: annualized_geometric(&excess, a),
            std_excess_return,
            sharpe_ratio: avg_excess_return / std_excess_return,
            min_excess_return: min_excess,
            max_excess_return: max_excess,
            skew_excess_return: skew,
            kurtosis_excess_return: kurtosis,
        };

        // A record is either fully populated or uniformly no-data; a NaN
        // leaking into one field (e.g. from a non-positive compounded
        // product) must not produce a partial record.
        if bundle.as_array().iter().any(|v| !v.is_finite()) {
            debug!("non-finite statistic encountered, marking record no-data");
            return RecordOutcome::NoData;
        }

        RecordOutcome::Computed(bundle)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1), matching the volatility convention
/// of the historical output.
fn sample_std(values: &[f64]) -> f64 {
    let mu = mean(values);
    let sum_sq = values.iter().map(|v| (v - mu) * (v - mu)).sum::<f64>();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// The constant per-period return compounding to the observed cumulative
/// growth, annualized: `(Π(1+v))^(1/n) − 1` per day, then `(1+g)^A − 1`.
fn annualized_geometric(values: &[f64], annualization_factor: f64) -> f64 {
    let compounded = values.iter().map(|v| 1.0 + v).product::<f64>();
    let per_period = compounded.powf(1.0 / values.len() as f64) - 1.0;
    (1.0 + per_period).powf(annualization_factor) - 1.0
}

fn extrema(values: &[f64]) -> (f64, f64) {
    values.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(min, max), v| (min.min(*v), max.max(*v)),
    )
}

/// Population (ddof = 0) skewness and excess kurtosis, the conventional
/// library definitions: a normal distribution scores 0 on both.
fn standardized_moments(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mu = mean(values);
    let m2 = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / n;
    let m3 = values.iter().map(|v| (v - mu).powi(3)).sum::<f64>() / n;
    let m4 = values.iter().map(|v| (v - mu).powi(4)).sum::<f64>() / n;

    let skew = m3 / m2.powf(1.5);
    let excess_kurtosis = m4 / (m2 * m2) - 3.0;
    (skew, excess_kurtosis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::AlignedPair;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    /// Builds an aligned pair with the given instrument returns against a
    /// zero reference, so the excess series equals the return series.
    fn pair_with_zero_reference(returns: &[f64]) -> AlignedPair {
        let dates: Vec<NaiveDate> = (0..returns.len())
            .map(|i| {
                NaiveDate::from_ymd_opt(2020, 1, 1)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(i as u64))
                    .unwrap()
            })
            .collect();
        AlignedPair::new(dates, returns.to_vec(), vec![0.0; returns.len()]).unwrap()
    }

    #[test]
    fn empty_window_yields_no_data() {
        let pair = pair_with_zero_reference(&[]);
        assert!(StatisticsEngine::new().compute(&pair).is_no_data());
    }

    #[test]
    fn single_observation_yields_no_data() {
        let pair = pair_with_zero_reference(&[0.01]);
        assert!(StatisticsEngine::new().compute(&pair).is_no_data());
    }

    #[test]
    fn constant_excess_returns_yield_no_data_not_infinity() {
        let pair = pair_with_zero_reference(&[0.01, 0.01, 0.01]);
        assert!(StatisticsEngine::new().compute(&pair).is_no_data());
    }

    #[test]
    fn sharpe_is_exactly_mean_over_std() {
        let pair = pair_with_zero_reference(&[0.01, -0.02, 0.015, 0.005, -0.01]);
        let outcome = StatisticsEngine::new().compute(&pair);
        let bundle = outcome.stats().expect("expected a computed record");
        assert_relative_eq!(
            bundle.sharpe_ratio,
            bundle.avg_excess_return / bundle.std_excess_return
        );
    }

    #[test]
    fn annualized_geometric_round_trips_against_direct_compounding() {
        let returns = [0.01, -0.02, 0.015, 0.005, -0.01];
        let pair = pair_with_zero_reference(&returns);
        let engine = StatisticsEngine::new();
        let bundle = engine.compute(&pair).stats().copied().unwrap();

        let compounded = returns.iter().map(|r| 1.0 + r).product::<f64>();
        let direct = compounded.powf(engine.annualization_factor() / returns.len() as f64);
        assert_relative_eq!(1.0 + bundle.geo_avg_return, direct, max_relative = 1e-12);
    }

    #[test]
    fn annualized_mean_and_volatility_match_hand_calculation() {
        let returns = [0.01, -0.01, 0.02, 0.0];
        let pair = pair_with_zero_reference(&returns);
        let bundle = StatisticsEngine::new()
            .compute(&pair)
            .stats()
            .copied()
            .unwrap();

        let mu = returns.iter().sum::<f64>() / 4.0;
        assert_relative_eq!(bundle.avg_return, mu * 252.0);

        let var = returns.iter().map(|r| (r - mu).powi(2)).sum::<f64>() / 3.0;
        assert_relative_eq!(bundle.std_excess_return, var.sqrt() * 252.0_f64.sqrt());

        assert_relative_eq!(bundle.min_excess_return, -0.01);
        assert_relative_eq!(bundle.max_excess_return, 0.02);
    }

    #[test]
    fn symmetric_distribution_has_zero_skew_and_known_kurtosis() {
        let pair = pair_with_zero_reference(&[-0.01, 0.0, 0.01]);
        let bundle = StatisticsEngine::new()
            .compute(&pair)
            .stats()
            .copied()
            .unwrap();
        assert_relative_eq!(bundle.skew_excess_return, 0.0);
        // Population excess kurtosis of a symmetric three-point
        // distribution {-1, 0, 1}: m4/m2^2 - 3 = 1.5 - 3.
        assert_relative_eq!(bundle.kurtosis_excess_return, -1.5);
    }

    #[test]
    fn negative_compounded_product_produces_no_data_rather_than_nan() {
        // A worse-than-total loss drives the compounded product negative;
        // its fractional root is undefined and the geometric statistics
        // cannot be formed.
        let pair = pair_with_zero_reference(&[0.01, -1.5, 0.02]);
        assert!(StatisticsEngine::new().compute(&pair).is_no_data());
    }
}
