//! CSV export of a table in its current row order

use crate::model::Table;
use anyhow::Result;
use std::io::Write;

/// Write headers then rows as CSV
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(&row.cells)?;
    }
    writer.flush()?;

    Ok(())
}
