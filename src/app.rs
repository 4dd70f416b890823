//! Root application component
//!
//! The App owns the table, its sort state and the per-column types. It
//! coordinates child components; sorting itself lives in `model::sort`.

use crate::action::Action;
use crate::cli::SortSpec;
use crate::component::Component;
use crate::components::{calculate_main_layout, HelpDialog, QuitDialog, TableComponent};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::{ColumnType, SortError, Table, TableSortState};
use crate::services;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::path::PathBuf;

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state
pub struct App {
    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// File the table was loaded from
    pub source: Option<PathBuf>,

    /// Header and data rows in their current order
    pub table: Table,

    /// Direction flag, flipped by every sort
    pub sort_state: TableSortState,

    /// Comparison type per column
    pub column_types: Vec<ColumnType>,

    pub config: Config,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// Error message to display
    pub error: Option<String>,

    /// Status message to display
    pub status_message: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub table_view: TableComponent,
    pub help_dialog: HelpDialog,
    pub quit_dialog: QuitDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create an App around an already loaded table
    pub fn with_table(config: Config, table: Table, source: Option<PathBuf>) -> App {
        let mut app = App {
            should_quit: false,
            source,
            table: Table::default(),
            sort_state: TableSortState::new(config.start_descending),
            column_types: Vec::new(),
            config,
            modals: ModalStack::new(),
            error: None,
            status_message: None,
            table_view: TableComponent::new(),
            help_dialog: HelpDialog::default(),
            quit_dialog: QuitDialog,
        };
        app.set_table(table);
        app
    }

    /// Install a freshly loaded table and reset the sort state
    fn set_table(&mut self, table: Table) {
        self.column_types = services::infer_column_types(
            &table,
            &self.config.status_ranks,
            &self.config.column_types,
        );
        self.table = table;
        self.sort_state = TableSortState::new(self.config.start_descending);

        let title = self
            .source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "table".to_string());
        self.table_view.set_title(title);
        self.table_view.set_types(self.column_types.clone());
        self.refresh_view();
    }

    /// Push the current row order and sort state to the table view
    fn refresh_view(&mut self) {
        self.table_view
            .set_data(self.table.headers.clone(), self.table.row_cells());
        self.table_view.set_sort_state(&self.sort_state);
    }

    /// Type used when sorting `column`
    pub fn column_type(&self, column: usize) -> ColumnType {
        self.column_types.get(column).copied().unwrap_or_default()
    }

    /// Sort by `column` with an explicit type and refresh the view.
    ///
    /// On error nothing changes, including the direction flag.
    pub fn apply_sort(&mut self, column: usize, kind: ColumnType) -> Result<(), SortError> {
        let state = self
            .table
            .sort(column, kind, self.sort_state, &self.config.status_ranks)?;
        self.sort_state = state;
        self.refresh_view();
        Ok(())
    }

    /// Sort by `column` with its configured type, reporting the outcome in
    /// the status bar
    pub fn sort_column(&mut self, column: usize) {
        let kind = self.column_type(column);
        // The incoming flag decides this call's direction.
        let direction = if self.sort_state.descending {
            "descending"
        } else {
            "ascending"
        };

        match self.apply_sort(column, kind) {
            Ok(()) => {
                let name = self.table.headers.get(column).cloned().unwrap_or_default();
                self.error = None;
                self.status_message = Some(format!("Sorted by '{}' ({}, {})", name, kind, direction));
            }
            Err(e) => {
                log::warn!("sort failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Apply `--sort` arguments in order
    pub fn run_sorts(&mut self, specs: &[SortSpec]) -> Result<()> {
        for spec in specs {
            let column = spec.column_index(&self.table)?;
            let kind = spec.kind.unwrap_or_else(|| self.column_type(column));
            self.apply_sort(column, kind)?;
            self.table_view.select_column(column);
        }
        Ok(())
    }

    /// Move the selected column to the next comparison type
    fn cycle_column_type(&mut self) {
        let column = self.table_view.selected_column();
        if column >= self.column_types.len() {
            return;
        }
        let kind = self.column_types[column].next();
        self.column_types[column] = kind;
        self.table_view.set_types(self.column_types.clone());
        self.status_message = Some(format!(
            "Column '{}' now sorts as {}",
            self.table.headers[column], kind
        ));
    }

    /// Reload the table from its source file
    fn reload(&mut self) {
        let Some(path) = self.source.clone() else {
            self.error = Some("Table was not loaded from a file".to_string());
            return;
        };

        match services::load_table(&path) {
            Ok(table) => {
                self.set_table(table);
                self.error = None;
                self.status_message = Some(format!("Reloaded {}", path.display()));
            }
            Err(e) => {
                log::error!("reload failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(ref error) = self.error {
            Line::from(Span::styled(
                format!(" Error: {}", error),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
        } else {
            let next = if self.sort_state.descending {
                "descending"
            } else {
                "ascending"
            };
            let message = self.status_message.as_deref().unwrap_or("Ready");
            Line::from(vec![
                Span::styled(format!(" {}", message), Style::default().fg(Color::Green)),
                Span::styled(
                    format!("  · next sort {}", next),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let key = |k: &'static str| {
            Span::styled(k, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        };
        let line = Line::from(vec![
            key(" s "),
            Span::raw("Sort  "),
            key(" h/l "),
            Span::raw("Column  "),
            key(" t "),
            Span::raw("Type  "),
            key(" r "),
            Span::raw("Reload  "),
            key(" ? "),
            Span::raw("Help  "),
            key(" q "),
            Span::raw("Quit"),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            self.handle_modal_key_event(&modal, key)
        } else {
            self.table_view.handle_key_event(key)
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if !self.modals.is_empty() {
            return Ok(None);
        }
        self.table_view.handle_mouse_event(mouse)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick | Action::Resize(_, _) => {}
            Action::ForceQuit => {
                self.should_quit = true;
            }

            // ─────────────────────────────────────────────────────────────────
            // Scrolling and column selection (delegate to TableComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp
            | Action::ScrollDown
            | Action::PageUp
            | Action::PageDown
            | Action::FirstRow
            | Action::LastRow
            | Action::NextColumn
            | Action::PrevColumn => {
                self.table_view.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Sorting
            // ─────────────────────────────────────────────────────────────────
            Action::SortSelected => {
                let column = self.table_view.selected_column();
                self.sort_column(column);
            }
            Action::SortColumn(column) => {
                self.table_view.select_column(column);
                self.sort_column(column);
            }
            Action::CycleColumnType => self.cycle_column_type(),
            Action::Reload => self.reload(),

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.modals.push(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_main_layout(area);

        self.table_view.draw(frame, layout.table)?;
        self.draw_status(frame, layout.status);
        self.draw_help_bar(frame, layout.help);

        // Draw modal overlay if active
        match self.modals.top() {
            Some(Modal::QuitConfirm) => self.quit_dialog.draw(frame, area)?,
            Some(Modal::Help) => self.help_dialog.draw(frame, area)?,
            None => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;

    fn runs_table() -> Table {
        Table::new(
            vec!["model".to_string(), "finished".to_string(), "status".to_string()],
            vec![
                Row::from(vec!["orders", "2023-05-01", "fail"]),
                Row::from(vec!["Customers", "2021-01-10", "success"]),
                Row::from(vec!["payments", "2022-12-31", "fail"]),
            ],
        )
    }

    fn app() -> App {
        App::with_table(Config::default(), runs_table(), None)
    }

    fn column(app: &App, index: usize) -> Vec<String> {
        app.table.column(index).map(str::to_string).collect()
    }

    #[test]
    fn test_column_types_are_inferred() {
        let app = app();
        assert_eq!(
            app.column_types,
            vec![ColumnType::String, ColumnType::Date, ColumnType::Status]
        );
    }

    #[test]
    fn test_sort_selected_then_reverse() {
        let mut app = app();
        app.update(Action::SortSelected).unwrap();
        assert_eq!(column(&app, 0), vec!["Customers", "orders", "payments"]);
        assert!(app.sort_state.descending);

        app.update(Action::SortSelected).unwrap();
        assert_eq!(column(&app, 0), vec!["payments", "orders", "Customers"]);
        assert!(!app.sort_state.descending);
    }

    #[test]
    fn test_header_click_sorts_by_date() {
        let mut app = app();
        app.update(Action::SortColumn(1)).unwrap();

        assert_eq!(column(&app, 1), vec!["2021-01-10", "2022-12-31", "2023-05-01"]);
        assert_eq!(app.table_view.selected_column(), 1);
        assert_eq!(app.sort_state.last_sort, Some((1, ColumnType::Date)));
    }

    #[test]
    fn test_status_sort_puts_success_first() {
        let mut app = app();
        app.update(Action::SortColumn(2)).unwrap();
        assert_eq!(column(&app, 2), vec!["success", "fail", "fail"]);
        assert_eq!(column(&app, 0), vec!["Customers", "orders", "payments"]);
    }

    #[test]
    fn test_out_of_range_click_reports_error_and_keeps_state() {
        let mut app = app();
        app.sort_column(7);

        assert!(app.error.is_some());
        assert!(!app.sort_state.descending);
        assert_eq!(app.table, runs_table());
    }

    #[test]
    fn test_cycle_column_type_changes_comparison() {
        let mut app = app();
        app.update(Action::NextColumn).unwrap();
        app.update(Action::CycleColumnType).unwrap();
        assert_eq!(app.column_type(1), ColumnType::Status);

        // No date cell is a status token, so nothing moves.
        app.update(Action::SortSelected).unwrap();
        assert_eq!(column(&app, 1), vec!["2023-05-01", "2021-01-10", "2022-12-31"]);
    }

    #[test]
    fn test_start_descending_from_config() {
        let config = Config {
            start_descending: true,
            ..Default::default()
        };
        let mut app = App::with_table(config, runs_table(), None);
        app.update(Action::SortSelected).unwrap();
        assert_eq!(column(&app, 0), vec!["payments", "orders", "Customers"]);
    }

    #[test]
    fn test_run_sorts_toggles_between_specs() {
        let mut app = app();
        let specs: Vec<SortSpec> = vec!["finished".parse().unwrap(), "model:string".parse().unwrap()];
        app.run_sorts(&specs).unwrap();

        // Second sort runs descending because the first flipped the flag.
        assert_eq!(column(&app, 0), vec!["payments", "orders", "Customers"]);
        assert!(!app.sort_state.descending);
    }

    #[test]
    fn test_run_sorts_rejects_unknown_column() {
        let mut app = app();
        let specs: Vec<SortSpec> = vec!["nope".parse().unwrap()];
        assert!(app.run_sorts(&specs).is_err());
        assert_eq!(app.table, runs_table());
    }

    #[test]
    fn test_reload_without_source_sets_error() {
        let mut app = app();
        app.update(Action::Reload).unwrap();
        assert!(app.error.is_some());
    }

    #[test]
    fn test_modals_capture_keys() {
        let mut app = app();
        app.update(Action::OpenQuitDialog).unwrap();
        let action = app.handle_key_event(KeyEvent::from(KeyCode::Char('s'))).unwrap();
        assert_eq!(action, None);

        let action = app.handle_key_event(KeyEvent::from(KeyCode::Char('y'))).unwrap();
        assert_eq!(action, Some(Action::ForceQuit));
        app.update(Action::ForceQuit).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut app = app();
        app.update(Action::OpenHelp).unwrap();
        let action = app
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(action, Some(Action::ForceQuit));
    }
}
