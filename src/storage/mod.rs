use anyhow::Result;
use async_trait::async_trait;
use dyn_clone::DynClone;

use crate::config::AgeWindow;
use crate::types::{ArtifactRef, BuildRef, ContainerItem};

pub mod azure_devops;

/// Type alias for a boxed build service.
pub type BuildService = Box<dyn BuildServiceTrait + Send + Sync>;

/// Type alias for a boxed file container storage.
pub type Storage = Box<dyn StorageTrait + Send + Sync>;

/// Builds and their artifacts.
///
/// Every call returns the complete result set; there is no paging.
#[async_trait]
pub trait BuildServiceTrait: DynClone {
    /// List builds of a definition whose queue time lies within `age_window`.
    async fn list_builds(
        &self,
        project: &str,
        definition_id: u32,
        age_window: &AgeWindow,
    ) -> Result<Vec<BuildRef>>;

    /// List the artifacts attached to a build.
    async fn list_artifacts(&self, build_id: u64, project: &str) -> Result<Vec<ArtifactRef>>;
}

dyn_clone::clone_trait_object!(BuildServiceTrait);

/// File container operations.
#[async_trait]
pub trait StorageTrait: DynClone {
    /// List every item below `root_path` in a container, in storage order.
    ///
    /// Fails if the container does not exist.
    async fn list_items(&self, container_id: u64, root_path: &str) -> Result<Vec<ContainerItem>>;

    /// Delete one item (file or folder) of a container.
    ///
    /// Fails on a missing item or an authorization error.
    async fn delete_item(&self, container_id: u64, item_path: &str) -> Result<()>;
}

dyn_clone::clone_trait_object!(StorageTrait);
