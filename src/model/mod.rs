//! Model layer
//!
//! This module contains the table data and its sort state:
//! - `Table` / `Row` - Header plus data rows as plain values
//! - `TableSortState` - Direction flag toggled by every sort
//! - `ModalStack` - Modal overlay management

pub mod modal;
pub mod sort;
pub mod table;

// Re-export commonly used types
pub use sort::{ColumnType, SortError, StatusRanking, TableSortState};
pub use table::{Row, Table};
