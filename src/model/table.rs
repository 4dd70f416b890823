//! Table data model
//!
//! A table is a header row plus data rows. Rows are plain value records;
//! sorting only rearranges them.

use super::sort::{self, ColumnType, SortError, StatusRanking, TableSortState};

/// A single data row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self { cells }
    }

    /// Text of the cell at `index`, if the row is wide enough
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }
}

impl From<Vec<String>> for Row {
    fn from(cells: Vec<String>) -> Self {
        Self::new(cells)
    }
}

impl From<Vec<&str>> for Row {
    fn from(cells: Vec<&str>) -> Self {
        Self::new(cells.into_iter().map(str::to_string).collect())
    }
}

/// Header row plus data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// Number of header columns
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Resolve a column reference: a zero-based index or a header name
    /// (case-insensitive). Index lookups are not range-checked here.
    pub fn column_index(&self, reference: &str) -> Option<usize> {
        let reference = reference.trim();
        if let Some(index) = self
            .headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(reference))
        {
            return Some(index);
        }
        reference.parse::<usize>().ok()
    }

    /// Iterate over the cells of one column, skipping rows too short to have it
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows.iter().filter_map(move |row| row.cell(index))
    }

    /// Rows as plain string vectors, for rendering and export
    pub fn row_cells(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(|row| row.cells.clone()).collect()
    }

    /// Sort the data rows by `column` and return the toggled direction state.
    ///
    /// The header row is never touched. On error the rows and the state are
    /// left as they were.
    pub fn sort(
        &mut self,
        column: usize,
        kind: ColumnType,
        state: TableSortState,
        ranking: &StatusRanking,
    ) -> Result<TableSortState, SortError> {
        if column >= self.headers.len() {
            return Err(SortError::ColumnOutOfRange {
                column,
                width: self.headers.len(),
            });
        }
        sort::sort_rows(&mut self.rows, column, kind, state, ranking)
    }
}
