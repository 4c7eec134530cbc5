//! Resource locator classification.
//!
//! A build artifact stored in a file container carries a locator of the form
//! `#/<container id>/drop`. Anything else is skipped with a diagnostic; a skip
//! never aborts a scan.

use thiserror::Error;

use crate::types::{ArtifactRef, ContainerReference};

/// Resource type of artifacts stored in a file container.
pub const CONTAINER_RESOURCE_TYPE: &str = "Container";

/// Root path under which container artifacts store their files.
pub const DROP_PATH: &str = "drop";

const LOCATOR_ROOT: &str = "#";

/// Why an artifact was not scanned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocatorSkip {
    #[error("Artifact {artifact_id} isn't a File Container artifact.")]
    NotContainer { artifact_id: u64 },

    #[error("\"{data}\" isn't formatted like a container drop path.")]
    NotDropPath { data: String },

    #[error("\"{segment}\" isn't an integer.")]
    NonIntegerContainerId { segment: String },
}

/// Resolve the container an artifact lives in.
pub fn parse_container_locator(artifact: &ArtifactRef) -> Result<ContainerReference, LocatorSkip> {
    match &artifact.resource {
        Some(resource) if resource.resource_type == CONTAINER_RESOURCE_TYPE => {
            parse_drop_locator(&resource.data)
        }
        _ => Err(LocatorSkip::NotContainer {
            artifact_id: artifact.id,
        }),
    }
}

/// Parse a `#/<integer>/drop` locator.
pub fn parse_drop_locator(data: &str) -> Result<ContainerReference, LocatorSkip> {
    let segments: Vec<&str> = data.split('/').collect();

    let [root, container_id, root_path] = segments.as_slice() else {
        return Err(LocatorSkip::NotDropPath {
            data: data.to_string(),
        });
    };

    if *root != LOCATOR_ROOT || *root_path != DROP_PATH {
        return Err(LocatorSkip::NotDropPath {
            data: data.to_string(),
        });
    }

    let container_id =
        container_id
            .parse::<u64>()
            .map_err(|_| LocatorSkip::NonIntegerContainerId {
                segment: container_id.to_string(),
            })?;

    Ok(ContainerReference {
        container_id,
        root_path: root_path.to_string(),
    })
}
