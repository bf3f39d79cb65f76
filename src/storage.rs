use crate::models::{ChartSeries, PairedSeries};
use anyhow::{Result, ensure};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that spreadsheet apps would evaluate as formulas.
fn sanitize_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{s}"),
        _ => s.to_string(),
    }
}

/// Save a series as CSV with header `label,value`. Unlabeled series get 1-based positions.
pub fn save_series_csv<P: AsRef<Path>>(series: &ChartSeries, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["label", "value"])?;
    for (i, v) in series.values.iter().enumerate() {
        let label = series
            .labels
            .get(i)
            .cloned()
            .unwrap_or_else(|| (i + 1).to_string());
        wtr.write_record([sanitize_cell(&label), v.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a paired series as CSV with header `label,<first_name>,<second_name>`.
pub fn save_paired_csv<P: AsRef<Path>>(
    pair: &PairedSeries,
    first_name: &str,
    second_name: &str,
    path: P,
) -> Result<()> {
    ensure!(
        pair.first.len() == pair.second.len(),
        "paired series lengths differ ({} vs {})",
        pair.first.len(),
        pair.second.len()
    );
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(["label", first_name, second_name])?;
    for (i, (a, b)) in pair.first.iter().zip(&pair.second).enumerate() {
        let label = pair
            .labels
            .get(i)
            .cloned()
            .unwrap_or_else(|| (i + 1).to_string());
        wtr.write_record([sanitize_cell(&label), a.to_string(), b.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save any serializable value as pretty JSON.
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}
