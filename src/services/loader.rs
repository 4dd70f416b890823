//! Table loading from CSV/TSV files and pipe-delimited text tables

use crate::model::{Row, Table};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Regex to match ANSI escape codes
static ANSI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("valid ANSI regex")
});

/// Errors raised while loading a table
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("No header row found in {0}")]
    NoHeader(String),
}

/// Input format, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
    /// `| a | b |` rows as printed by `dbt show` and markdown
    Pipe,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> TableFormat {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => TableFormat::Csv,
            Some("tsv") | Some("tab") => TableFormat::Tsv,
            _ => TableFormat::Pipe,
        }
    }
}

/// Load a table from disk
pub fn load_table(path: &Path) -> Result<Table, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let format = TableFormat::from_path(path);
    log::info!("loading {} as {:?}", path.display(), format);

    let table = match format {
        TableFormat::Csv => parse_delimited(&content, b',')?,
        TableFormat::Tsv => parse_delimited(&content, b'\t')?,
        TableFormat::Pipe => parse_pipe_table(&content),
    };

    if table.is_empty() {
        return Err(LoadError::NoHeader(path.display().to_string()));
    }

    log::info!(
        "loaded {} columns, {} rows from {}",
        table.width(),
        table.rows.len(),
        path.display()
    );
    Ok(table)
}

/// Parse CSV-style content; the first record is the header
pub fn parse_delimited(content: &str, delimiter: u8) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()?
        .iter()
        .map(|s| s.trim().to_string())
        .collect::<Vec<String>>();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        rows.push(Row::new(row));
    }

    Ok(Table::new(headers, rows))
}

/// Parse a pipe-delimited text table
///
/// ```text
/// | column1 | column2 | column3 |
/// |---------|---------|---------|
/// | value1  | value2  | value3  |
/// ```
///
/// Lines without a pipe are ignored, so surrounding log output is harmless.
pub fn parse_pipe_table(content: &str) -> Table {
    let mut headers: Vec<String> = Vec::new();
    let mut rows = Vec::new();

    for line in content.lines() {
        let line = ANSI_REGEX.replace_all(line, "");
        let trimmed = line.trim();

        if trimmed.is_empty() || !trimmed.contains('|') {
            continue;
        }

        // Skip separator lines (only -, |, +, :, whitespace)
        if trimmed
            .chars()
            .all(|c| c == '-' || c == '|' || c == '+' || c == ':' || c.is_whitespace())
        {
            continue;
        }

        let inner = trimmed.strip_prefix('|').unwrap_or(trimmed);
        let inner = inner.strip_suffix('|').unwrap_or(inner);
        let cells: Vec<String> = inner.split('|').map(|s| s.trim().to_string()).collect();

        if headers.is_empty() {
            headers = cells;
        } else {
            rows.push(Row::new(cells));
        }
    }

    Table::new(headers, rows)
}
