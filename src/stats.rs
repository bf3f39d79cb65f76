use crate::models::{Record, SiteStats};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

/// Compute the headline numbers for a (de-duplicated) record collection.
///
/// `collaborators` is a proxy: distinct author names across all records, minus one for the
/// site owner.
pub fn site_stats(records: &[Record]) -> SiteStats {
    let coauthors: BTreeSet<&str> = records.iter().flat_map(Record::author_names).collect();
    let cites: Vec<u64> = records.iter().map(Record::citations).collect();
    SiteStats {
        works_count: records.len(),
        cited_by_count: cites.iter().sum(),
        collaborators: coauthors.len().saturating_sub(1),
        h_index: h_index(&cites),
    }
}

/// Largest `h` such that `h` works have at least `h` citations each.
pub fn h_index(citations: &[u64]) -> usize {
    let mut sorted = citations.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
        .iter()
        .enumerate()
        .take_while(|(i, c)| **c >= (*i as u64) + 1)
        .count()
}

/// Identity used to drop duplicate records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupeKey {
    Doi(String),
    Arxiv(String),
    RecordId(u64),
    TitleYear(String, Option<i32>),
}

impl DedupeKey {
    /// Prefer DOI, then arXiv id, then record id, then normalised title + year.
    pub fn for_record(r: &Record) -> Self {
        if let Some(doi) = r.doi.as_deref().filter(|s| !s.is_empty()) {
            return DedupeKey::Doi(doi.to_lowercase());
        }
        if let Some(arxiv) = r.arxiv.as_deref().filter(|s| !s.is_empty()) {
            return DedupeKey::Arxiv(arxiv.to_lowercase());
        }
        if let Some(id) = r.inspire_recid.filter(|id| *id != 0) {
            return DedupeKey::RecordId(id);
        }
        DedupeKey::TitleYear(normalize_title(r.title.as_deref().unwrap_or("")), r.year)
    }
}

/// Lowercase, collapse whitespace, strip punctuation.
pub fn normalize_title(title: &str) -> String {
    static WS: OnceLock<Regex> = OnceLock::new();
    static PUNCT: OnceLock<Regex> = OnceLock::new();
    let ws = WS.get_or_init(|| Regex::new(r"\s+").expect("static regex"));
    let punct = PUNCT.get_or_init(|| Regex::new(r"[^\w\s]").expect("static regex"));

    let lower = title.to_lowercase();
    let collapsed = ws.replace_all(&lower, " ");
    punct.replace_all(collapsed.trim(), "").into_owned()
}

/// Keep the first occurrence of each [`DedupeKey`], preserving input order.
pub fn dedupe(records: &[Record]) -> Vec<Record> {
    let mut seen: HashSet<DedupeKey> = HashSet::new();
    records
        .iter()
        .filter(|r| seen.insert(DedupeKey::for_record(r)))
        .cloned()
        .collect()
}

/// Parse a feed date: `YYYY-MM-DD`, `YYYY-MM`, or `YYYY` (optionally followed by a time part).
pub fn parse_publication_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day_part = s.split(['T', ' ']).next().unwrap_or(s);
    if let Ok(d) = NaiveDate::parse_from_str(day_part, "%Y-%m-%d") {
        return Some(d);
    }
    if let Some((y, m)) = day_part.split_once('-') {
        let (y, m) = (y.parse::<i32>().ok()?, m.parse::<u32>().ok()?);
        return NaiveDate::from_ymd_opt(y, m, 1);
    }
    day_part
        .parse::<i32>()
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
}

/// Sort key for newest-first listings: the publication date, else January 1st of the year.
///
/// One key per record keeps the comparison a total order, so a dated record and a year-only
/// record of the same year are ordered by date rather than left in input order.
fn recency_key(r: &Record) -> Option<NaiveDate> {
    r.publication_date
        .as_deref()
        .and_then(parse_publication_date)
        .or_else(|| {
            r.year
                .filter(|y| *y != 0)
                .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
        })
}

/// The `n` newest records (all when `n` is `None`). Undated records sort last, stable.
pub fn latest(records: &[Record], n: Option<usize>) -> Vec<Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| recency_key(b).cmp(&recency_key(a)));
    if let Some(n) = n {
        sorted.truncate(n);
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h_index_basics() {
        assert_eq!(h_index(&[]), 0);
        assert_eq!(h_index(&[0, 0]), 0);
        assert_eq!(h_index(&[10, 8, 5, 4, 3]), 4);
        assert_eq!(h_index(&[100]), 1);
    }

    #[test]
    fn title_normalisation() {
        assert_eq!(normalize_title("  On   the Origin, of Bars! "), "on the origin of bars");
    }

    #[test]
    fn partial_dates_parse() {
        assert_eq!(parse_publication_date("2021-05-03"), NaiveDate::from_ymd_opt(2021, 5, 3));
        assert_eq!(parse_publication_date("2021-05"), NaiveDate::from_ymd_opt(2021, 5, 1));
        assert_eq!(parse_publication_date("2021"), NaiveDate::from_ymd_opt(2021, 1, 1));
        assert_eq!(
            parse_publication_date("2021-05-03T10:00:00"),
            NaiveDate::from_ymd_opt(2021, 5, 3)
        );
        assert_eq!(parse_publication_date("soon"), None);
    }
}
