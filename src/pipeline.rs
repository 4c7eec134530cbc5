//! Build artifact scan.
//!
//! Walks builds → artifacts → container items sequentially and collects one
//! [`ScanResultRow`] per matching file, in traversal order.
//!
//! ```text
//! BuildService::list_builds → list_artifacts → locator → ContainerScanner → rows
//! ```

use anyhow::Result;
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::locator::parse_container_locator;
use crate::scanner::ContainerScanner;
use crate::storage::{BuildService, Storage};
use crate::types::{BuildRef, ScanResultRow};

pub struct ArtifactScanPipeline {
    config: ScanConfig,
    builds: BuildService,
    scanner: ContainerScanner,
}

impl ArtifactScanPipeline {
    pub fn new(config: ScanConfig, builds: BuildService, storage: Storage) -> Self {
        let scanner = ContainerScanner::new(storage, config.filter_config.clone());
        Self {
            config,
            builds,
            scanner,
        }
    }

    /// Run the scan. Artifacts that are not file container drops are skipped;
    /// any collaborator failure aborts the whole scan.
    pub async fn run(&self) -> Result<Vec<ScanResultRow>> {
        if let Some(min_time) = self.config.age_window.min_time {
            debug!("Minimum datetime: {min_time}");
        }
        if let Some(max_time) = self.config.age_window.max_time {
            debug!("Maximum datetime: {max_time}");
        }

        debug!(
            "Getting builds in definition {}...",
            self.config.definition_id
        );
        let builds = self
            .builds
            .list_builds(
                &self.config.project,
                self.config.definition_id,
                &self.config.age_window,
            )
            .await?;
        debug!("{} build(s) returned.", builds.len());

        let mut rows = Vec::new();
        for build in &builds {
            rows.extend(self.scan_build(build).await?);
        }

        info!(
            builds = builds.len(),
            "{} matching item(s) found.",
            rows.len()
        );
        Ok(rows)
    }

    async fn scan_build(&self, build: &BuildRef) -> Result<Vec<ScanResultRow>> {
        debug!(
            "Getting artifacts for build {} ({})...",
            build.build_number, build.id
        );
        let artifacts = self
            .builds
            .list_artifacts(build.id, &self.config.project)
            .await?;
        debug!(
            "build {} ({}) has {} artifact(s).",
            build.build_number,
            build.id,
            artifacts.len()
        );

        let mut rows = Vec::new();
        for artifact in &artifacts {
            debug!(
                "Artifact found. Id: {}, name: {}, type: {}.",
                artifact.id,
                artifact.name,
                artifact.resource_type().unwrap_or_default()
            );

            let reference = match parse_container_locator(artifact) {
                Ok(reference) => reference,
                Err(skip) => {
                    debug!(artifact_id = artifact.id, "{skip}");
                    continue;
                }
            };

            let items = self.scanner.scan(&reference).await?;
            rows.extend(
                items
                    .iter()
                    .map(|item| ScanResultRow::new(build, &reference, item)),
            );
        }

        Ok(rows)
    }
}
