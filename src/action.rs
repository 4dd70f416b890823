//! Action enum - All possible application actions
//!
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for time-based updates
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    /// Scroll rows up one line
    ScrollUp,
    /// Scroll rows down one line
    ScrollDown,
    /// Scroll rows up one page
    PageUp,
    /// Scroll rows down one page
    PageDown,
    /// Jump to the first row
    FirstRow,
    /// Jump to the last row
    LastRow,

    // ─────────────────────────────────────────────────────────────────────────
    // Columns
    // ─────────────────────────────────────────────────────────────────────────
    /// Select the column to the right
    NextColumn,
    /// Select the column to the left
    PrevColumn,
    /// Sort rows by the selected column
    SortSelected,
    /// Sort rows by the given column (header click)
    SortColumn(usize),
    /// Cycle the comparison type of the selected column
    CycleColumnType,

    // ─────────────────────────────────────────────────────────────────────────
    // File
    // ─────────────────────────────────────────────────────────────────────────
    /// Reload the table file from disk
    Reload,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Close the current modal
    CloseModal,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::FirstRow => write!(f, "FirstRow"),
            Action::LastRow => write!(f, "LastRow"),
            Action::NextColumn => write!(f, "NextColumn"),
            Action::PrevColumn => write!(f, "PrevColumn"),
            Action::SortSelected => write!(f, "SortSelected"),
            Action::SortColumn(column) => write!(f, "SortColumn({})", column),
            Action::CycleColumnType => write!(f, "CycleColumnType"),
            Action::Reload => write!(f, "Reload"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
        }
    }
}
