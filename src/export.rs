//! CSV export of scan results and import of deletion input.
//!
//! The header row carries the column names `Date`, `OwningResource`,
//! `ContainerId`, `ItemPath`, `ItemfileLength` and `ItemType`. An empty
//! result set produces an empty file, and an empty file imports as no rows.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::types::error::SweepError;
use crate::types::{DeletionCsvRow, ScanResultRow};

/// Serialize `rows` with a header row.
pub fn write_rows<W: Write>(writer: W, rows: &[ScanResultRow]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer
            .serialize(row)
            .context("Failed to serialize a scan result row.")?;
    }
    csv_writer.flush().context("Failed to flush CSV output.")?;
    Ok(())
}

/// Parse rows keyed by the header row. The first malformed row is an error.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<DeletionCsvRow>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    csv_reader
        .deserialize()
        .collect::<Result<Vec<DeletionCsvRow>, csv::Error>>()
        .map_err(|e| anyhow!(SweepError::InvalidRecord(e.to_string())))
}

pub fn write_csv_file(path: &Path, rows: &[ScanResultRow]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}.", path.display()))?;
    write_rows(file, rows)?;

    info!("{} record(s) written to {}", rows.len(), path.display());
    Ok(())
}

pub fn read_csv_file(path: &Path) -> Result<Vec<DeletionCsvRow>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}.", path.display()))?;
    let rows = read_rows(file).with_context(|| format!("Failed to parse {}.", path.display()))?;

    info!("{} record(s) read from {}", rows.len(), path.display());
    Ok(rows)
}
