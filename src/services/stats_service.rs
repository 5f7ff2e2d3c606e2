use crate::models::{SeriesTable, SummaryStats};

/// Percent change from `from` to `to`; `None` when `from` is zero or the
/// result is not finite
pub fn percent_change(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 {
        return None;
    }
    let change = (to - from) / from * 100.0;
    change.is_finite().then_some(change)
}

/// Change over the final step only: `(v[n-1] - v[n-2]) / v[n-2] * 100`
pub fn last_step_change(values: &[f64]) -> Option<f64> {
    match values {
        [.., prev, last] => percent_change(*prev, *last),
        _ => None,
    }
}

/// Change over the whole range: `(v[n-1] - v[0]) / v[0] * 100`
pub fn total_change(values: &[f64]) -> Option<f64> {
    match (values.first(), values.last()) {
        (Some(first), Some(last)) => percent_change(*first, *last),
        _ => None,
    }
}

fn finite(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| v.is_finite())
}

/// Sum of finite values; `None` if there are none
pub fn sum(values: &[f64]) -> Option<f64> {
    let mut seen = false;
    let total = finite(values).fold(0.0, |acc, v| {
        seen = true;
        acc + v
    });
    seen.then_some(total)
}

/// Mean of finite values; `None` if there are none
pub fn mean(values: &[f64]) -> Option<f64> {
    let count = finite(values).count();
    sum(values).map(|total| total / count as f64)
}

/// Price-style summary for every series: latest value, both change metrics
/// and the mean, ordered by label. Labels with no rows are skipped, so an
/// empty table yields no stats.
pub fn summarize(table: &SeriesTable) -> Vec<SummaryStats> {
    let mut labels = table.labels();
    labels.sort_unstable();
    labels
        .into_iter()
        .filter_map(|label| {
            let values = table.values_for(label);
            let latest_value = *values.last()?;
            Some(SummaryStats {
                series_label: label.to_string(),
                latest_value,
                last_step_change_pct: last_step_change(&values),
                total_change_pct: total_change(&values),
                mean: mean(&values),
                sum: None,
            })
        })
        .collect()
}

/// Aggregate-style summary for a single-series table (weather metrics):
/// latest value plus mean or sum
pub fn summarize_aggregate(table: &SeriesTable, with_mean: bool, with_sum: bool) -> Option<SummaryStats> {
    let label = table.labels().first()?.to_string();
    let values = table.values_for(&label);
    let latest_value = *values.last()?;

    Some(SummaryStats {
        series_label: label,
        latest_value,
        last_step_change_pct: None,
        total_change_pct: None,
        mean: if with_mean { mean(&values) } else { None },
        sum: if with_sum { sum(&values) } else { None },
    })
}
