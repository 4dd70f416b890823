//! Row sorting
//!
//! Every sort call orders the data rows by one column, reverses the result
//! when the table's direction flag says so, and hands back the flipped flag.
//! The flag is global to the table, not per column.

use super::table::Row;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use icu_collator::{Collator, CollatorOptions};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How the cells of a column are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Case-insensitive text comparison
    #[default]
    String,
    /// Chronological comparison of parsed dates
    Date,
    /// Ranked status tokens, highest rank first
    Status,
}

impl ColumnType {
    pub fn all() -> [ColumnType; 3] {
        [ColumnType::String, ColumnType::Date, ColumnType::Status]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Date => "date",
            ColumnType::Status => "status",
        }
    }

    /// Short tag shown next to the column header
    pub fn tag(&self) -> &'static str {
        match self {
            ColumnType::String => "abc",
            ColumnType::Date => "date",
            ColumnType::Status => "stat",
        }
    }

    /// Next type in the cycle string → date → status → string
    pub fn next(&self) -> ColumnType {
        match self {
            ColumnType::String => ColumnType::Date,
            ColumnType::Date => ColumnType::Status,
            ColumnType::Status => ColumnType::String,
        }
    }

    /// Build the sort key for one cell, or `None` when the cell cannot be
    /// interpreted as this type
    fn key(&self, cell: &str, ranking: &StatusRanking) -> Option<SortKey> {
        match self {
            ColumnType::String => Some(SortKey::text(cell)),
            ColumnType::Date => parse_date(cell).map(SortKey::Date),
            ColumnType::Status => ranking.rank(cell).map(|rank| SortKey::Rank(Reverse(rank))),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ColumnType {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        ColumnType::all()
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| SortError::UnknownColumnType(s.to_string()))
    }
}

/// Errors raised by a sort call. Rows and state are untouched when one occurs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
    #[error("Unknown column type '{0}' (expected string, date or status)")]
    UnknownColumnType(String),

    #[error("Column {column} is out of range (rows have {width} columns)")]
    ColumnOutOfRange { column: usize, width: usize },
}

/// Sort direction state for one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableSortState {
    /// Whether the next sort call produces descending order
    pub descending: bool,
    /// Column and type of the most recent successful sort
    pub last_sort: Option<(usize, ColumnType)>,
}

impl TableSortState {
    pub fn new(descending: bool) -> Self {
        Self {
            descending,
            last_sort: None,
        }
    }

    fn toggled(self, column: usize, kind: ColumnType) -> Self {
        Self {
            descending: !self.descending,
            last_sort: Some((column, kind)),
        }
    }

    /// Arrow for the header of `column` if it holds the current sort
    pub fn indicator(&self, column: usize) -> Option<&'static str> {
        match self.last_sort {
            // The flag has already flipped, so `descending` describes the next call.
            Some((sorted, _)) if sorted == column => Some(if self.descending { "▲" } else { "▼" }),
            _ => None,
        }
    }
}

/// Rank table for status tokens. Higher ranks sort first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, i64>", into = "HashMap<String, i64>")]
pub struct StatusRanking {
    ranks: HashMap<String, i64>,
}

impl Default for StatusRanking {
    fn default() -> Self {
        Self::new([("success".to_string(), 1), ("fail".to_string(), 0)])
    }
}

impl StatusRanking {
    pub fn new(ranks: impl IntoIterator<Item = (String, i64)>) -> Self {
        Self {
            ranks: ranks
                .into_iter()
                .map(|(token, rank)| (token.trim().to_lowercase(), rank))
                .collect(),
        }
    }

    /// Rank of a cell, matched case-insensitively
    pub fn rank(&self, cell: &str) -> Option<i64> {
        self.ranks.get(&cell.trim().to_lowercase()).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

impl From<HashMap<String, i64>> for StatusRanking {
    fn from(ranks: HashMap<String, i64>) -> Self {
        Self::new(ranks)
    }
}

impl From<StatusRanking> for HashMap<String, i64> {
    fn from(ranking: StatusRanking) -> Self {
        ranking.ranks
    }
}

/// Comparable form of a cell. A column only ever produces one variant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    /// Lowercased text, ordered by the root-locale collator
    Text(String),
    Date(NaiveDateTime),
    Rank(Reverse<i64>),
}

impl SortKey {
    fn text(cell: &str) -> Self {
        SortKey::Text(cell.to_lowercase())
    }

    fn compare(&self, other: &Self, collator: Option<&Collator>) -> Ordering {
        match (self, other, collator) {
            (SortKey::Text(a), SortKey::Text(b), Some(collator)) => collator.compare(a, b),
            _ => self.cmp(other),
        }
    }
}

/// Root-locale collator for text columns. Without one, text falls back to
/// code point order.
fn text_collator() -> Option<Collator> {
    match Collator::try_new(&Default::default(), CollatorOptions::new()) {
        Ok(collator) => Some(collator),
        Err(e) => {
            log::warn!("no collator available, comparing text by code point: {}", e);
            None
        }
    }
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d, %Y"];

/// Parse a cell as a date or date-time.
///
/// Offsets are normalised to UTC; plain dates are taken at midnight.
pub fn parse_date(cell: &str) -> Option<NaiveDateTime> {
    let text = cell.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Check `column` against the narrowest row
fn check_column(rows: &[Row], column: usize) -> Result<(), SortError> {
    match rows.iter().map(Row::len).min() {
        Some(width) if column >= width => Err(SortError::ColumnOutOfRange { column, width }),
        _ => Ok(()),
    }
}

/// Sort `rows` by `column` and return the toggled state.
///
/// Rows whose cell cannot be read as `kind` (an unparseable date, a status
/// token missing from `ranking`) keep their input order after all other
/// rows, in both directions.
pub fn sort_rows(
    rows: &mut Vec<Row>,
    column: usize,
    kind: ColumnType,
    state: TableSortState,
    ranking: &StatusRanking,
) -> Result<TableSortState, SortError> {
    check_column(rows, column)?;

    let mut keyed: Vec<(SortKey, Row)> = Vec::with_capacity(rows.len());
    let mut unkeyed: Vec<Row> = Vec::new();

    for row in rows.drain(..) {
        match row.cell(column).and_then(|cell| kind.key(cell, ranking)) {
            Some(key) => keyed.push((key, row)),
            None => unkeyed.push(row),
        }
    }

    let collator = match kind {
        ColumnType::String => text_collator(),
        _ => None,
    };

    // `sort_by` is stable, so equal keys keep their input order.
    keyed.sort_by(|(a, _), (b, _)| a.compare(b, collator.as_ref()));
    if state.descending {
        keyed.reverse();
    }

    log::debug!(
        "sorted column {} as {} ({}): {} rows, {} without a key",
        column,
        kind,
        if state.descending { "descending" } else { "ascending" },
        keyed.len() + unkeyed.len(),
        unkeyed.len()
    );

    rows.extend(keyed.into_iter().map(|(_, row)| row));
    rows.extend(unkeyed);

    Ok(state.toggled(column, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows_of(values: &[&str]) -> Vec<Row> {
        values.iter().map(|v| Row::from(vec![*v])).collect()
    }

    fn values(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.cell(0).unwrap()).collect()
    }

    fn sort_once(rows: &mut Vec<Row>, kind: ColumnType, state: TableSortState) -> TableSortState {
        sort_rows(rows, 0, kind, state, &StatusRanking::default()).unwrap()
    }

    #[test]
    fn test_string_sort_ignores_case() {
        let mut rows = rows_of(&["banana", "Apple", "cherry"]);
        sort_once(&mut rows, ColumnType::String, TableSortState::default());
        assert_eq!(values(&rows), vec!["Apple", "banana", "cherry"]);
    }

    #[test]
    fn test_string_sort_folds_accents() {
        let mut rows = rows_of(&["zebra", "Éclair", "egg", "dog"]);
        sort_once(&mut rows, ColumnType::String, TableSortState::default());
        assert_eq!(values(&rows), vec!["dog", "Éclair", "egg", "zebra"]);
    }

    #[test]
    fn test_string_sort_follows_locale_collation() {
        let mut rows = rows_of(&["zebra", "œuvre", "~tilde", "Ästhetik", "_under"]);
        sort_once(&mut rows, ColumnType::String, TableSortState::default());
        let sorted = values(&rows);

        let position = |value: &str| sorted.iter().position(|v| *v == value).unwrap();
        // Punctuation sorts ahead of letters.
        assert!(position("~tilde") < position("Ästhetik"));
        assert!(position("_under") < position("Ästhetik"));
        assert_eq!(&sorted[2..], &["Ästhetik", "œuvre", "zebra"]);
    }

    #[test]
    fn test_date_sort_is_chronological() {
        let mut rows = rows_of(&["2023-05-01", "2021-01-10", "2022-12-31"]);
        sort_once(&mut rows, ColumnType::Date, TableSortState::default());
        assert_eq!(values(&rows), vec!["2021-01-10", "2022-12-31", "2023-05-01"]);
    }

    #[test]
    fn test_date_sort_mixes_formats() {
        let mut rows = rows_of(&["2022-03-01T10:00:00Z", "01/15/2022", "2022-02-01 08:30:00"]);
        sort_once(&mut rows, ColumnType::Date, TableSortState::default());
        assert_eq!(
            values(&rows),
            vec!["01/15/2022", "2022-02-01 08:30:00", "2022-03-01T10:00:00Z"]
        );
    }

    #[test]
    fn test_status_sort_puts_success_first() {
        let mut rows = Vec::new();
        for (id, status) in [("1", "fail"), ("2", "success"), ("3", "fail")] {
            rows.push(Row::from(vec![id, status]));
        }

        sort_rows(&mut rows, 1, ColumnType::Status, TableSortState::default(), &StatusRanking::default())
            .unwrap();

        let ids: Vec<&str> = rows.iter().map(|r| r.cell(0).unwrap()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_status_sort_is_case_insensitive() {
        let mut rows = rows_of(&["FAIL", "Success"]);
        sort_once(&mut rows, ColumnType::Status, TableSortState::default());
        assert_eq!(values(&rows), vec!["Success", "FAIL"]);
    }

    #[test]
    fn test_second_call_reverses_first() {
        let mut rows = rows_of(&["banana", "Apple", "cherry"]);
        let state = sort_once(&mut rows, ColumnType::String, TableSortState::default());
        let first: Vec<String> = values(&rows).iter().map(|s| s.to_string()).collect();

        sort_once(&mut rows, ColumnType::String, state);
        let mut reversed = first.clone();
        reversed.reverse();
        assert_eq!(values(&rows), reversed);
    }

    #[test]
    fn test_two_calls_restore_sorted_order() {
        let mut rows = rows_of(&["c", "a", "b"]);
        let state = sort_once(&mut rows, ColumnType::String, TableSortState::default());
        let after_first = rows.clone();

        let state = sort_once(&mut rows, ColumnType::String, state);
        let state = sort_once(&mut rows, ColumnType::String, state);
        assert_eq!(rows, after_first);
        assert!(state.descending);
    }

    #[test]
    fn test_every_call_toggles_regardless_of_column() {
        let mut rows = vec![Row::from(vec!["b", "2021-01-01"]), Row::from(vec!["a", "2020-01-01"])];
        let ranking = StatusRanking::default();

        let state = sort_rows(&mut rows, 0, ColumnType::String, TableSortState::default(), &ranking)
            .unwrap();
        assert!(state.descending);
        assert_eq!(state.last_sort, Some((0, ColumnType::String)));

        let state = sort_rows(&mut rows, 1, ColumnType::Date, state, &ranking).unwrap();
        assert!(!state.descending);
        assert_eq!(state.last_sort, Some((1, ColumnType::Date)));
        // Descending by date because the flag was set by the previous column.
        assert_eq!(rows[0].cell(1), Some("2021-01-01"));
    }

    #[test]
    fn test_starting_descending_reverses_first_call() {
        let mut rows = rows_of(&["banana", "Apple", "cherry"]);
        let state = sort_once(&mut rows, ColumnType::String, TableSortState::new(true));
        assert_eq!(values(&rows), vec!["cherry", "banana", "Apple"]);
        assert!(!state.descending);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let mut rows = vec![
            Row::from(vec!["1", "success"]),
            Row::from(vec!["2", "fail"]),
            Row::from(vec!["3", "success"]),
            Row::from(vec!["4", "fail"]),
        ];
        sort_rows(&mut rows, 1, ColumnType::Status, TableSortState::default(), &StatusRanking::default())
            .unwrap();

        let ids: Vec<&str> = rows.iter().map(|r| r.cell(0).unwrap()).collect();
        assert_eq!(ids, vec!["1", "3", "2", "4"]);
    }

    #[test]
    fn test_unparseable_dates_sort_last_in_both_directions() {
        let mut rows = rows_of(&["not a date", "2022-01-01", "", "2021-01-01"]);

        let state = sort_once(&mut rows, ColumnType::Date, TableSortState::default());
        assert_eq!(values(&rows), vec!["2021-01-01", "2022-01-01", "not a date", ""]);

        sort_once(&mut rows, ColumnType::Date, state);
        assert_eq!(values(&rows), vec!["2022-01-01", "2021-01-01", "not a date", ""]);
    }

    #[test]
    fn test_unknown_status_sorts_last() {
        let mut rows = rows_of(&["pending", "fail", "success"]);
        sort_once(&mut rows, ColumnType::Status, TableSortState::default());
        assert_eq!(values(&rows), vec!["success", "fail", "pending"]);
    }

    #[test]
    fn test_custom_ranking() {
        let ranking = StatusRanking::new([
            ("success".to_string(), 2),
            ("running".to_string(), 1),
            ("fail".to_string(), 0),
        ]);
        let mut rows = rows_of(&["fail", "running", "success"]);
        sort_rows(&mut rows, 0, ColumnType::Status, TableSortState::default(), &ranking).unwrap();
        assert_eq!(values(&rows), vec!["success", "running", "fail"]);
    }

    #[test]
    fn test_out_of_range_column_is_rejected() {
        let mut rows = vec![Row::from(vec!["a", "b"]), Row::from(vec!["c"])];
        let original = rows.clone();
        let state = TableSortState::default();

        let result = sort_rows(&mut rows, 1, ColumnType::String, state, &StatusRanking::default());

        assert_eq!(result, Err(SortError::ColumnOutOfRange { column: 1, width: 1 }));
        assert_eq!(rows, original);
    }

    #[test]
    fn test_column_type_from_str() {
        assert_eq!("string".parse::<ColumnType>(), Ok(ColumnType::String));
        assert_eq!(" Date ".parse::<ColumnType>(), Ok(ColumnType::Date));
        assert_eq!("STATUS".parse::<ColumnType>(), Ok(ColumnType::Status));
        assert_eq!(
            "number".parse::<ColumnType>(),
            Err(SortError::UnknownColumnType("number".to_string()))
        );
    }

    #[test]
    fn test_column_type_cycle() {
        let mut kind = ColumnType::String;
        for _ in 0..3 {
            kind = kind.next();
        }
        assert_eq!(kind, ColumnType::String);
    }

    #[test]
    fn test_parse_date_formats() {
        let midnight = NaiveDate::from_ymd_opt(2023, 5, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(parse_date("2023-05-01"), Some(midnight));
        assert_eq!(parse_date("2023/05/01"), Some(midnight));
        assert_eq!(parse_date("05/01/2023"), Some(midnight));
        assert_eq!(parse_date("01 May 2023"), Some(midnight));
        assert_eq!(parse_date(" 2023-05-01T00:00:00+00:00 "), Some(midnight));
        assert_eq!(parse_date("2023-13-01"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_indicator_tracks_last_sort() {
        let mut rows = rows_of(&["b", "a"]);
        let state = sort_once(&mut rows, ColumnType::String, TableSortState::default());
        assert_eq!(state.indicator(0), Some("▲"));
        assert_eq!(state.indicator(1), None);

        let state = sort_once(&mut rows, ColumnType::String, state);
        assert_eq!(state.indicator(0), Some("▼"));
    }

    #[test]
    fn test_status_ranking_serde_lowercases_tokens() {
        let ranking: StatusRanking = serde_json::from_str(r#"{"Success": 3, "FAIL": 1}"#).unwrap();
        assert_eq!(ranking.rank("success"), Some(3));
        assert_eq!(ranking.rank("Fail"), Some(1));
        assert_eq!(ranking.rank("running"), None);
    }
}
