//! Listing of a single file container, narrowed by the configured patterns.

use anyhow::Result;
use tracing::debug;

use crate::config::FilterConfig;
use crate::filters::filter_items;
use crate::storage::Storage;
use crate::types::{ContainerItem, ContainerReference};

/// Lists the items of one container and keeps those matching the patterns.
///
/// Storage failures are returned as-is; a missing container aborts the scan.
#[derive(Clone)]
pub struct ContainerScanner {
    storage: Storage,
    filter_config: FilterConfig,
}

impl ContainerScanner {
    pub fn new(storage: Storage, filter_config: FilterConfig) -> Self {
        Self {
            storage,
            filter_config,
        }
    }

    /// Matching file items below the reference's root path, in storage order.
    pub async fn scan(&self, reference: &ContainerReference) -> Result<Vec<ContainerItem>> {
        debug!(
            "Getting items in containerId {} under path {}.",
            reference.container_id, reference.root_path
        );
        let items = self
            .storage
            .list_items(reference.container_id, &reference.root_path)
            .await?;

        debug!(
            container_id = reference.container_id,
            root_path = %reference.root_path,
            "Container {} has {} item(s) under path {}.",
            reference.container_id,
            items.len(),
            reference.root_path
        );

        let matched = filter_items(items, &self.filter_config);

        debug!(
            container_id = reference.container_id,
            matched = matched.len(),
            "container scan has been completed."
        );

        Ok(matched)
    }
}
