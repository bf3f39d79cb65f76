//! Pure transforms from record collections to chart-ready series.
//!
//! Every function here is total: malformed or missing fields degrade to zero or are skipped,
//! nothing returns an error.

use crate::models::{ChartSeries, HistogramBin, PairedSeries, Record};
use std::collections::BTreeMap;

/// Default number of year categories on the papers-per-year chart.
pub const DEFAULT_MAX_YEARS: usize = 6;
/// Default number of bars on the top-cited chart.
pub const DEFAULT_TOP_N: usize = 6;

/// Count records per year and keep the `max_categories` most recent years, oldest first.
///
/// Records without a year (or with year `0`) are dropped.
pub fn aggregate_by_year(records: &[Record], max_categories: usize) -> ChartSeries {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for r in records {
        match r.year {
            Some(y) if y != 0 => *counts.entry(y).or_default() += 1,
            _ => {}
        }
    }

    // BTreeMap iterates ascending; walk from the newest end and flip back.
    let mut recent: Vec<(i32, usize)> = counts.into_iter().rev().take(max_categories).collect();
    recent.reverse();

    ChartSeries {
        labels: recent.iter().map(|(y, _)| y.to_string()).collect(),
        values: recent.iter().map(|(_, c)| *c as f64).collect(),
    }
}

/// Top `top_n` records by citation count, smallest of the top on the left.
pub fn top_by_metric(records: &[Record], top_n: usize) -> ChartSeries {
    top_by(records, top_n, |r| r.citations() as f64)
}

/// Top `top_n` records by an arbitrary metric.
///
/// The selection is sorted descending, truncated, then reversed so magnitude grows left to
/// right. Labels are 1-based positions in the reversed order. Non-finite or negative metric
/// values count as 0.
pub fn top_by<F>(records: &[Record], top_n: usize, metric: F) -> ChartSeries
where
    F: Fn(&Record) -> f64,
{
    let mut values: Vec<f64> = records
        .iter()
        .map(|r| {
            let v = metric(r);
            if v.is_finite() && v > 0.0 { v } else { 0.0 }
        })
        .collect();
    values.sort_by(|a, b| b.total_cmp(a));
    values.truncate(top_n);
    values.reverse();

    ChartSeries {
        labels: (1..=values.len()).map(|i| i.to_string()).collect(),
        values,
    }
}

/// The citation bins used by the histogram chart.
pub fn citation_bins() -> Vec<HistogramBin> {
    vec![
        HistogramBin::new("0", 0.0, 0.0),
        HistogramBin::new("1-9", 1.0, 9.0),
        HistogramBin::new("10-49", 10.0, 49.0),
        HistogramBin::new("50-99", 50.0, 99.0),
        HistogramBin::new("100-249", 100.0, 249.0),
        HistogramBin::new("250-499", 250.0, 499.0),
        HistogramBin::new("500+", 500.0, f64::INFINITY),
    ]
}

/// Citation histogram over [`citation_bins`]: `first` counts citable records, `second` counts
/// published records.
pub fn histogram(records: &[Record]) -> PairedSeries {
    histogram_with(records, &citation_bins())
}

/// Citation histogram over a caller-supplied bin set.
///
/// A value matching no bin lands in the last bin. An empty bin set yields empty series.
pub fn histogram_with(records: &[Record], bins: &[HistogramBin]) -> PairedSeries {
    let mut citable = vec![0.0; bins.len()];
    let mut published = vec![0.0; bins.len()];

    if !bins.is_empty() {
        for r in records {
            let c = r.citations() as f64;
            let i = bin_index(bins, c);
            if r.is_citable() {
                citable[i] += 1.0;
            }
            if r.is_published() {
                published[i] += 1.0;
            }
        }
    }

    PairedSeries {
        labels: bins.iter().map(|b| b.label.clone()).collect(),
        first: citable,
        second: published,
    }
}

fn bin_index(bins: &[HistogramBin], value: f64) -> usize {
    bins.iter()
        .position(|b| b.contains(value))
        .unwrap_or(bins.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cited(c: u64) -> Record {
        Record {
            cited_by_count: Some(c),
            ..Record::default()
        }
    }

    #[test]
    fn bins_partition_from_zero() {
        let bins = citation_bins();
        assert_eq!(bins[0].min, 0.0);
        for pair in bins.windows(2) {
            assert_eq!(pair[0].max + 1.0, pair[1].min);
        }
        assert!(bins.last().unwrap().max.is_infinite());
    }

    #[test]
    fn bin_boundaries_are_inclusive() {
        let bins = citation_bins();
        assert_eq!(bin_index(&bins, 9.0), 1);
        assert_eq!(bin_index(&bins, 10.0), 2);
        assert_eq!(bin_index(&bins, 499.0), 5);
        assert_eq!(bin_index(&bins, 500.0), 6);
    }

    #[test]
    fn gap_between_bins_falls_into_last() {
        let bins = vec![HistogramBin::new("a", 0.0, 0.0), HistogramBin::new("b", 1.0, 2.0)];
        assert_eq!(bin_index(&bins, 0.5), 1);
    }

    #[test]
    fn empty_bin_set_is_total() {
        let h = histogram_with(&[cited(3)], &[]);
        assert!(h.labels.is_empty());
        assert!(h.first.is_empty());
    }

    #[test]
    fn top_by_clamps_bad_metric_values() {
        let recs = vec![cited(1), cited(2)];
        let s = top_by(&recs, 5, |r| if r.citations() == 1 { f64::NAN } else { -3.0 });
        assert_eq!(s.values, vec![0.0, 0.0]);
    }
}
