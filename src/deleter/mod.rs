//! Confirmation and execution of container item deletions.
//!
//! Records are validated as a whole, listed, confirmed by the user and then
//! deleted one at a time in input order. In dry-run mode the deletions are
//! only logged.

use std::collections::HashSet;
use std::fmt;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::DeleteConfig;
use crate::safety::{PromptHandler, StdioPromptHandler, prompt_yes_no};
use crate::storage::Storage;
use crate::types::DeletionRecord;

mod validation;

pub use validation::{validate_record, validate_records};


// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Counts shown in the confirmation question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionSummary {
    pub files: usize,
    pub folders: usize,
    pub containers: usize,
}

impl DeletionSummary {
    pub fn new(records: &[DeletionRecord]) -> Self {
        let files = records.iter().filter(|record| record.is_file()).count();
        let containers = records
            .iter()
            .map(|record| record.container_id)
            .collect::<HashSet<u64>>()
            .len();

        Self {
            files,
            folders: records.len() - files,
            containers,
        }
    }
}

impl fmt::Display for DeletionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s), {} folder(s) across {} container(s)",
            self.files, self.folders, self.containers
        )
    }
}

/// Outcome of [`DeletionConfirmer::execute`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionReport {
    pub deleted: usize,
    pub simulated: usize,
}

// ---------------------------------------------------------------------------
// DeletionConfirmer
// ---------------------------------------------------------------------------

pub struct DeletionConfirmer {
    dry_run: bool,
    prompt_handler: Box<dyn PromptHandler>,
}

impl DeletionConfirmer {
    /// Uses [`StdioPromptHandler`] for the confirmation question.
    pub fn new(config: &DeleteConfig) -> Self {
        Self::with_prompt_handler(config, Box::new(StdioPromptHandler))
    }

    pub fn with_prompt_handler(config: &DeleteConfig, prompt_handler: Box<dyn PromptHandler>) -> Self {
        Self {
            dry_run: config.dry_run,
            prompt_handler,
        }
    }

    pub fn prompt_handler(&self) -> &dyn PromptHandler {
        self.prompt_handler.as_ref()
    }

    /// List every record and ask whether to delete them.
    ///
    /// Dry runs are confirmed too, so the listing can be reviewed first.
    pub fn confirm(&self, records: &[DeletionRecord]) -> Result<bool> {
        println!("FileContainer items:");
        for record in records {
            println!("{}", format_listing_line(record));
        }
        println!();

        let summary = DeletionSummary::new(records);
        let confirmed = prompt_yes_no(
            self.prompt_handler.as_ref(),
            &format!("Do you want to delete {summary}?"),
        )?;

        debug!(confirmed = confirmed, dry_run = self.dry_run, "deletion confirmation answered.");
        Ok(confirmed)
    }

    /// Delete the records in order. The first failure aborts the run; items
    /// deleted before it stay deleted.
    pub async fn execute(&self, storage: &Storage, records: &[DeletionRecord]) -> Result<DeletionReport> {
        let mut report = DeletionReport::default();

        for record in records {
            info!("{}", format_deletion_line(record, self.dry_run));
            if self.dry_run {
                report.simulated += 1;
                continue;
            }

            storage
                .delete_item(record.container_id, &record.item_path)
                .await?;
            report.deleted += 1;
        }

        debug!(
            deleted = report.deleted,
            simulated = report.simulated,
            "deletion has been completed."
        );
        Ok(report)
    }
}

/// Progress line logged for each record, prefixed with `[Dryrun]` when
/// nothing is actually deleted.
pub fn format_deletion_line(record: &DeletionRecord, dry_run: bool) -> String {
    format!(
        "{}Deleting ContainerId {}, {} {}...",
        if dry_run { "[Dryrun] " } else { "" },
        record.container_id,
        record.item_type,
        record.item_path
    )
}

pub fn format_listing_line(record: &DeletionRecord) -> String {
    format!(
        "* ContainerId: {}, ItemPath: {}, ItemType: {}",
        record.container_id, record.item_path, record.item_type
    )
}
