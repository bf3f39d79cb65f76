use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One publication record from the feed document.
///
/// Every field is optional and decoded leniently: a value of the wrong JSON type is treated as
/// absent instead of failing the whole document. Accessors apply the domain defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Record {
    #[serde(default, deserialize_with = "de_lenient_year")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub publication_date: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_count")]
    pub cited_by_count: Option<u64>,
    #[serde(default, deserialize_with = "de_lenient_bool")]
    pub is_citable: Option<bool>,
    #[serde(default, deserialize_with = "de_lenient_bool")]
    pub is_published: Option<bool>,

    #[serde(default, deserialize_with = "de_lenient_string")]
    pub title: Option<String>,
    /// Comma-separated author list, as written by the feed builder.
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub authors: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub venue: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub doi: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_string")]
    pub arxiv: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_recid")]
    pub inspire_recid: Option<u64>,
}

impl Record {
    /// Decode a single feed item. Anything that is not a JSON object becomes an empty record.
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// Citation count, absent → 0.
    pub fn citations(&self) -> u64 {
        self.cited_by_count.unwrap_or(0)
    }

    /// Citable unless explicitly marked `false`.
    pub fn is_citable(&self) -> bool {
        self.is_citable != Some(false)
    }

    /// Published only when explicitly marked `true`.
    pub fn is_published(&self) -> bool {
        self.is_published == Some(true)
    }

    /// Author names split on commas, trimmed, empties dropped.
    pub fn author_names(&self) -> impl Iterator<Item = &str> {
        self.authors
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// The static feed document: `{ "items": [ ... ] }`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PublicationsDocument {
    pub items: Vec<Record>,
}

impl<'de> Deserialize<'de> for PublicationsDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // A missing or non-array `items` is an empty feed, not a decode error.
        let raw = Value::deserialize(deserializer)?;
        let items = raw
            .get("items")
            .and_then(Value::as_array)
            .map(|arr| arr.iter().map(Record::from_value).collect())
            .unwrap_or_default();
        Ok(Self { items })
    }
}

/// A labeled sequence of bar values.
///
/// `labels` is either empty (unlabeled) or index-aligned with `values`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        Self { labels, values }
    }

    pub fn unlabeled(values: Vec<f64>) -> Self {
        Self {
            labels: Vec::new(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_labeled(&self) -> bool {
        !self.labels.is_empty()
    }

    /// Largest value, or 0 for an empty series.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Two count series over one shared label set (grouped bars).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PairedSeries {
    pub labels: Vec<String>,
    pub first: Vec<f64>,
    pub second: Vec<f64>,
}

impl PairedSeries {
    /// Number of categories: the label count, or the longer series when unlabeled.
    pub fn category_count(&self) -> usize {
        if self.labels.is_empty() {
            self.first.len().max(self.second.len())
        } else {
            self.labels.len()
        }
    }

    /// Shared maximum of both series, floored at 1.
    pub fn shared_max(&self) -> f64 {
        self.first
            .iter()
            .chain(self.second.iter())
            .copied()
            .fold(1.0, f64::max)
    }
}

/// A closed numeric range `[min, max]` used to histogram a metric.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistogramBin {
    pub label: String,
    pub min: f64,
    pub max: f64,
}

impl HistogramBin {
    pub fn new(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            label: label.into(),
            min,
            max,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Headline numbers shown next to the charts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteStats {
    pub works_count: usize,
    pub cited_by_count: u64,
    pub collaborators: usize,
    pub h_index: usize,
}

// ------------------------ Lenient decoding ------------------------

fn de_lenient_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Value>::deserialize(deserializer)
}

/// Number or numeric string; anything else (including 0-length strings) is absent.
fn as_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|x| x.is_finite())
}

fn de_lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_lenient_value(deserializer)?
        .as_ref()
        .and_then(as_number)
        .map(f64::trunc)
        .filter(|y| *y >= i32::MIN as f64 && *y <= i32::MAX as f64)
        .map(|y| y as i32))
}

fn de_lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    // Counts are integral and never negative; fractions floor, negatives clamp to 0.
    Ok(de_lenient_value(deserializer)?
        .as_ref()
        .and_then(as_number)
        .map(|c| c.max(0.0).floor() as u64))
}

fn de_lenient_recid<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(de_lenient_value(deserializer)?
        .as_ref()
        .and_then(as_number)
        .filter(|c| *c >= 0.0)
        .map(|c| c as u64))
}

fn de_lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match de_lenient_value(deserializer)? {
        Some(Value::Bool(b)) => Some(b),
        _ => None,
    })
}

fn de_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match de_lenient_value(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}
