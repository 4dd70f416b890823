//! Column type inference
//!
//! Guesses how each column should be compared by looking at its non-empty
//! cells: all known status tokens → status, all dates → date, else string.

use crate::model::sort::parse_date;
use crate::model::{ColumnType, StatusRanking, Table};
use std::collections::HashMap;

/// Infer the type of one column from its cells
pub fn infer_column_type<'a>(
    cells: impl IntoIterator<Item = &'a str>,
    ranking: &StatusRanking,
) -> ColumnType {
    let mut seen = 0;
    let mut all_status = true;
    let mut all_dates = true;

    for cell in cells {
        if cell.trim().is_empty() {
            continue;
        }
        seen += 1;
        all_status = all_status && ranking.rank(cell).is_some();
        all_dates = all_dates && parse_date(cell).is_some();
        if !all_status && !all_dates {
            return ColumnType::String;
        }
    }

    if seen == 0 {
        ColumnType::String
    } else if all_status {
        ColumnType::Status
    } else if all_dates {
        ColumnType::Date
    } else {
        ColumnType::String
    }
}

/// Infer one type per header, applying overrides keyed by header name
/// (case-insensitive)
pub fn infer_column_types(
    table: &Table,
    ranking: &StatusRanking,
    overrides: &HashMap<String, ColumnType>,
) -> Vec<ColumnType> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let forced = overrides
                .iter()
                .find(|(name, _)| name.trim().eq_ignore_ascii_case(header.trim()))
                .map(|(_, kind)| *kind);

            match forced {
                Some(kind) => {
                    log::debug!("column '{}' forced to {}", header, kind);
                    kind
                }
                None => infer_column_type(table.column(index), ranking),
            }
        })
        .collect()
}
