//! Table component for sortable tabular data
//!
//! Renders a fixed header (with column type tags and the sort arrow) above
//! scrollable rows. Clicking a header cell sorts by that column.

use crate::action::Action;
use crate::component::Component;
use crate::model::{ColumnType, TableSortState};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a column is allowed to get
const MAX_COLUMN_WIDTH: usize = 50;
/// Separator drawn between columns
const COLUMN_SEPARATOR: &str = " │ ";
const PAGE_SIZE: usize = 10;

/// Table component for displaying and sorting tabular data
pub struct TableComponent {
    title: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    types: Vec<ColumnType>,
    /// Column holding the current sort and its arrow
    indicator: Option<(usize, &'static str)>,
    selected_column: usize,
    scroll: usize,
    /// Header row position from the last draw, for mouse hit-testing
    header_area: Option<Rect>,
}

impl Default for TableComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl TableComponent {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            headers: Vec::new(),
            rows: Vec::new(),
            types: Vec::new(),
            indicator: None,
            selected_column: 0,
            scroll: 0,
            header_area: None,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the rendered rows. The scroll position is kept when possible.
    pub fn set_data(&mut self, headers: Vec<String>, rows: Vec<Vec<String>>) {
        self.headers = headers;
        self.rows = rows;
        self.scroll = self.scroll.min(self.max_scroll());
        self.selected_column = self
            .selected_column
            .min(self.headers.len().saturating_sub(1));
    }

    pub fn set_types(&mut self, types: Vec<ColumnType>) {
        self.types = types;
    }

    /// Refresh the header arrow from the sort state
    pub fn set_sort_state(&mut self, state: &TableSortState) {
        self.indicator = state
            .last_sort
            .and_then(|(column, _)| state.indicator(column).map(|arrow| (column, arrow)));
    }

    pub fn selected_column(&self) -> usize {
        self.selected_column
    }

    pub fn select_column(&mut self, column: usize) {
        if column < self.headers.len() {
            self.selected_column = column;
        }
    }

    fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    /// Scroll position as a paragraph offset, saturating on very long tables
    fn scroll_offset(&self) -> u16 {
        u16::try_from(self.scroll).unwrap_or(u16::MAX)
    }

    /// Header text for a column: name, type tag and sort arrow
    fn header_label(&self, column: usize) -> String {
        let name = self.headers.get(column).map(String::as_str).unwrap_or("");
        let mut label = match self.types.get(column) {
            Some(kind) => format!("{} [{}]", name, kind.tag()),
            None => name.to_string(),
        };
        if let Some((sorted, arrow)) = self.indicator {
            if sorted == column {
                label.push(' ');
                label.push_str(arrow);
            }
        }
        label
    }

    /// Display width of every column, capped at `MAX_COLUMN_WIDTH`
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = (0..self.headers.len())
            .map(|i| self.header_label(i).width())
            .collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.width());
                }
            }
        }
        for width in &mut widths {
            *width = (*width).min(MAX_COLUMN_WIDTH);
        }
        widths
    }

    /// Column under screen column `x`, using the last drawn header position
    pub fn column_at(&self, x: u16, y: u16) -> Option<usize> {
        let area = self.header_area?;
        if y != area.y || x < area.x {
            return None;
        }

        let offset = (x - area.x) as usize;
        let separator = COLUMN_SEPARATOR.width();
        let mut start = 0;
        for (column, width) in self.column_widths().into_iter().enumerate() {
            if offset < start + width + separator {
                return Some(column);
            }
            start += width + separator;
        }
        None
    }

    /// Header line plus separator line
    pub fn build_header_lines(&self) -> Vec<Line<'static>> {
        let widths = self.column_widths();

        let header_spans: Vec<Span> = widths
            .iter()
            .enumerate()
            .flat_map(|(i, &width)| {
                let mut style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
                if i == self.selected_column {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                vec![
                    Span::styled(fit(&self.header_label(i), width), style),
                    Span::raw(COLUMN_SEPARATOR),
                ]
            })
            .collect();

        let separator: String = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");

        vec![
            Line::from(header_spans),
            Line::from(Span::styled(separator, Style::default().fg(Color::DarkGray))),
        ]
    }

    /// One line per data row
    pub fn build_row_lines(&self) -> Vec<Line<'static>> {
        let widths = self.column_widths();

        self.rows
            .iter()
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .enumerate()
                    .flat_map(|(i, cell)| {
                        let width = widths.get(i).copied().unwrap_or(10);
                        let mut style = Style::default().fg(Color::White);
                        if i == self.selected_column {
                            style = style.fg(Color::Yellow);
                        }
                        vec![Span::styled(fit(cell, width), style), Span::raw(COLUMN_SEPARATOR)]
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

/// Pad or truncate `text` to exactly `width` display columns
fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        let padding = width - text.width();
        return format!("{}{}", text, " ".repeat(padding));
    }

    let budget = width.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(&".".repeat(width.min(3)));
    out.push_str(&" ".repeat(budget - used));
    out
}

impl Component for TableComponent {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageDown)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageUp)
            }
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstRow),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastRow),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => Some(Action::NextColumn),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::BackTab => Some(Action::PrevColumn),
            KeyCode::Char('s') | KeyCode::Enter => Some(Action::SortSelected),
            KeyCode::Char('t') => Some(Action::CycleColumnType),
            KeyCode::Char('r') => Some(Action::Reload),
            KeyCode::Char('?') => Some(Action::OpenHelp),
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::OpenQuitDialog),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        let action = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self
                .column_at(mouse.column, mouse.row)
                .map(Action::SortColumn),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::ScrollDown => {
                if self.scroll < self.max_scroll() {
                    self.scroll += 1;
                }
            }
            Action::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            Action::PageDown => {
                self.scroll = (self.scroll + PAGE_SIZE).min(self.max_scroll());
            }
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(PAGE_SIZE);
            }
            Action::FirstRow => self.scroll = 0,
            Action::LastRow => self.scroll = self.max_scroll(),
            Action::NextColumn => {
                if self.selected_column + 1 < self.headers.len() {
                    self.selected_column += 1;
                }
            }
            Action::PrevColumn => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let title = format!(" {} ({} rows) ", self.title, self.rows.len());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.headers.is_empty() {
            self.header_area = None;
            frame.render_widget(Paragraph::new("Empty table"), inner);
            return Ok(());
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        self.header_area = Some(chunks[0]);
        frame.render_widget(Paragraph::new(self.build_header_lines()), chunks[0]);

        let content = self.build_row_lines();
        let visible_height = chunks[1].height as usize;
        frame.render_widget(
            Paragraph::new(content.clone()).scroll((self.scroll_offset(), 0)),
            chunks[1],
        );

        // Render scrollbar if content exceeds visible area
        let total = content.len();
        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(total.saturating_sub(visible_height)).position(self.scroll);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}
