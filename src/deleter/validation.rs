//! Validation of imported deletion rows.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};

use crate::types::error::SweepError;
use crate::types::{DeletionCsvRow, DeletionRecord};

const MIN_ITEM_PATH_SEGMENTS: usize = 2;

/// Validate every row, failing on the first invalid one.
///
/// Nothing is deleted unless the whole input is valid.
pub fn validate_records(rows: Vec<DeletionCsvRow>) -> Result<Vec<DeletionRecord>> {
    rows.into_iter()
        .map(|row| validate_record(row).map_err(|e| anyhow!(e)))
        .collect()
}

/// `ContainerId` must be a positive integer and `ItemPath` must have at least
/// two `/`-delimited segments. `Date` and `ItemfileLength` are informational
/// and kept only when they parse.
pub fn validate_record(row: DeletionCsvRow) -> Result<DeletionRecord, SweepError> {
    let container_id = parse_container_id(row.container_id.as_deref())?;

    let item_path = row.item_path.unwrap_or_default();
    if item_path.split('/').count() < MIN_ITEM_PATH_SEGMENTS {
        return Err(SweepError::InvalidRecord(format!(
            "ItemPaths with less than two segments not supported: {item_path}"
        )));
    }

    Ok(DeletionRecord {
        date: row
            .date
            .as_deref()
            .and_then(|date| DateTime::parse_from_rfc3339(date.trim()).ok())
            .map(|date| date.with_timezone(&Utc)),
        owning_resource: row.owning_resource,
        container_id,
        item_path,
        item_length: row
            .item_length
            .as_deref()
            .and_then(|length| length.trim().parse().ok()),
        item_type: row.item_type.unwrap_or_default(),
    })
}

fn parse_container_id(value: Option<&str>) -> Result<u64, SweepError> {
    let value = value.unwrap_or_default();
    match value.trim().parse::<u64>() {
        Ok(container_id) if container_id > 0 => Ok(container_id),
        _ => Err(SweepError::InvalidRecord(format!(
            "ContainerId isn't an integer: {value}"
        ))),
    }
}
