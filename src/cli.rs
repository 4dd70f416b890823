//! Command-line arguments

use crate::model::{ColumnType, SortError, Table};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "table-sort", version, about = "Sort table rows by column in the terminal")]
pub struct Cli {
    /// Table file: .csv, .tsv, or a pipe-delimited text table
    pub file: Option<PathBuf>,

    /// Apply a sort before showing the table: COLUMN[:TYPE], where COLUMN is
    /// a zero-based index or header name and TYPE is string, date or status.
    /// Repeat to sort several times; each sort flips the direction.
    #[arg(short, long = "sort", value_name = "COLUMN[:TYPE]")]
    pub sorts: Vec<SortSpec>,

    /// Print the sorted table as CSV to stdout instead of opening the viewer
    #[arg(short, long)]
    pub print: bool,

    /// Make the first sort descending
    #[arg(short, long)]
    pub descending: bool,

    /// Config file (defaults to ~/.table-sort/config.json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file (defaults to ~/.table-sort/table-sort.log)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    pub init_config: bool,
}

/// One `--sort` argument, resolved against a table later
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub kind: Option<ColumnType>,
}

impl std::str::FromStr for SortSpec {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Header names may contain ':', so only a known type suffix is split off.
        if let Some((column, kind)) = s.rsplit_once(':') {
            if let Ok(kind) = kind.parse::<ColumnType>() {
                return Ok(SortSpec {
                    column: column.to_string(),
                    kind: Some(kind),
                });
            }
            if !column.is_empty() && !kind.is_empty() && !kind.chars().any(char::is_whitespace) {
                return Err(SortError::UnknownColumnType(kind.to_string()));
            }
        }
        Ok(SortSpec {
            column: s.to_string(),
            kind: None,
        })
    }
}

impl SortSpec {
    /// Resolve the column reference to an index in `table`
    pub fn column_index(&self, table: &Table) -> anyhow::Result<usize> {
        table
            .column_index(&self.column)
            .ok_or_else(|| anyhow::anyhow!("No column named '{}'", self.column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Row;

    #[test]
    fn test_sort_spec_with_type() {
        let spec: SortSpec = "started:date".parse().unwrap();
        assert_eq!(spec.column, "started");
        assert_eq!(spec.kind, Some(ColumnType::Date));
    }

    #[test]
    fn test_sort_spec_without_type() {
        let spec: SortSpec = "2".parse().unwrap();
        assert_eq!(spec.column, "2");
        assert_eq!(spec.kind, None);
    }

    #[test]
    fn test_sort_spec_rejects_unknown_type() {
        let result = "name:number".parse::<SortSpec>();
        assert_eq!(result, Err(SortError::UnknownColumnType("number".to_string())));
    }

    #[test]
    fn test_sort_spec_resolves_column() {
        let table = Table::new(vec!["a".to_string(), "b".to_string()], vec![Row::from(vec!["1", "2"])]);
        let spec: SortSpec = "B".parse().unwrap();
        assert_eq!(spec.column_index(&table).unwrap(), 1);

        let spec: SortSpec = "zzz".parse().unwrap();
        assert!(spec.column_index(&table).is_err());
    }

    #[test]
    fn test_cli_parses_repeated_sorts() {
        let cli = Cli::parse_from(["table-sort", "runs.csv", "-s", "status:status", "-s", "0", "--print"]);
        assert_eq!(cli.file, Some(PathBuf::from("runs.csv")));
        assert_eq!(cli.sorts.len(), 2);
        assert!(cli.print);
        assert!(!cli.descending);
    }
}
