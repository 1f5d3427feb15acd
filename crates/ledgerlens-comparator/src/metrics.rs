//! Error statistics over paired values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Agreement statistics over the paths both sides share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Share of exactly equal values, in percent
    pub accuracy_pct: f64,

    /// Mean absolute error
    pub mae: f64,

    /// Mean absolute percentage error over nonzero true values; null if there are none
    pub mape_pct: Option<f64>,

    /// Root mean squared error
    pub rmse: f64,

    /// Coefficient of determination; null when the true values have no variance
    pub r2: Option<f64>,
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len() as f64;
    values.sum::<f64>() / n
}

/// Compare `predicted` against `truth` on their common paths
///
/// Returns `None` when no path is shared.
pub fn compute_metrics(
    truth: &BTreeMap<String, f64>,
    predicted: &BTreeMap<String, f64>,
) -> Option<Metrics> {
    let pairs: Vec<(f64, f64)> = truth
        .iter()
        .filter_map(|(path, &t)| predicted.get(path).map(|&p| (t, p)))
        .collect();
    if pairs.is_empty() {
        return None;
    }

    let diffs: Vec<f64> = pairs.iter().map(|(t, p)| p - t).collect();
    let exact = diffs.iter().filter(|d| **d == 0.0).count();
    let accuracy = exact as f64 / pairs.len() as f64 * 100.0;
    let mae = mean(diffs.iter().map(|d| d.abs()));
    let mse = mean(diffs.iter().map(|d| d * d));
    let rmse = mse.sqrt();

    let pct_errors: Vec<f64> = pairs
        .iter()
        .filter(|(t, _)| *t != 0.0)
        .map(|(t, p)| ((p - t) / t).abs() * 100.0)
        .collect();
    let mape = (!pct_errors.is_empty()).then(|| mean(pct_errors.into_iter()));

    let true_mean = mean(pairs.iter().map(|(t, _)| *t));
    let variance = mean(pairs.iter().map(|(t, _)| (t - true_mean).powi(2)));
    let r2 = (variance != 0.0).then(|| 1.0 - mse / variance);

    Some(Metrics {
        accuracy_pct: round_to(accuracy, 2),
        mae: round_to(mae, 2),
        mape_pct: mape.map(|m| round_to(m, 2)),
        rmse: round_to(rmse, 2),
        r2: r2.map(|r| round_to(r, 4)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amounts(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_zero_truth_excluded_from_mape_only() {
        let truth = amounts(&[("a", 0.0), ("b", 10.0)]);
        let predicted = amounts(&[("a", 5.0), ("b", 10.0)]);

        let metrics = compute_metrics(&truth, &predicted).unwrap();
        assert_eq!(metrics.accuracy_pct, 50.0);
        assert_eq!(metrics.mae, 2.5);
        assert_eq!(metrics.mape_pct, Some(0.0));
        assert_eq!(metrics.rmse, 3.54);
        assert_eq!(metrics.r2, Some(0.5));
    }

    #[test]
    fn test_only_zero_truth_gives_null_mape() {
        let truth = amounts(&[("a", 0.0)]);
        let predicted = amounts(&[("a", 5.0)]);

        let metrics = compute_metrics(&truth, &predicted).unwrap();
        assert_eq!(metrics.mape_pct, None);
        assert_eq!(metrics.mae, 5.0);
        assert_eq!(metrics.r2, None);
    }

    #[test]
    fn test_constant_truth_gives_null_r2() {
        let truth = amounts(&[("a", 100.0), ("b", 100.0)]);
        let predicted = amounts(&[("a", 110.0), ("b", 90.0)]);

        let metrics = compute_metrics(&truth, &predicted).unwrap();
        assert_eq!(metrics.r2, None);
        assert_eq!(metrics.mape_pct, Some(10.0));
        assert_eq!(metrics.rmse, 10.0);
    }

    #[test]
    fn test_rounding() {
        let truth = amounts(&[("a", 3.0), ("b", 7.0), ("c", 11.0)]);
        let predicted = amounts(&[("a", 3.0), ("b", 8.0), ("c", 10.0)]);

        let metrics = compute_metrics(&truth, &predicted).unwrap();
        assert_eq!(metrics.accuracy_pct, 33.33);
        assert_eq!(metrics.mae, 0.67);
        // mse = 2/3, variance = 32/3
        assert_eq!(metrics.r2, Some(0.9375));
        // (1/7 + 1/11) / 3 * 100 = 7.79
        assert_eq!(metrics.mape_pct, Some(7.79));
    }

    #[test]
    fn test_disjoint_paths_give_none() {
        let truth = amounts(&[("a", 1.0)]);
        let predicted = amounts(&[("b", 1.0)]);
        assert!(compute_metrics(&truth, &predicted).is_none());
    }

    #[test]
    fn test_null_fields_serialize_as_null() {
        let metrics = Metrics {
            accuracy_pct: 100.0,
            mae: 0.0,
            mape_pct: None,
            rmse: 0.0,
            r2: None,
        };
        let json = serde_json::to_value(&metrics).unwrap();
        assert!(json["mape_pct"].is_null());
        assert!(json["r2"].is_null());
    }
}
