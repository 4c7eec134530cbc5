/*!
# Overview
artifact-sweep audits and prunes the file containers behind Azure DevOps
(or TFS) build artifacts.

`scan` walks the builds of one build definition within an optional age
window, lists the files of every "Container" artifact, keeps the files whose
path and/or file name match the given regular expressions and writes them to
a CSV file. `delete` reads such a file back, shows what it is about to delete,
asks for confirmation and deletes the listed items one by one.

## As a Library
The artifact-sweep CLI is a thin wrapper over this library. The Azure DevOps
REST client sits behind the [`storage::BuildServiceTrait`] and
[`storage::StorageTrait`] traits, so the scan and the deletion can be driven
against any implementation.

Example usage
=============

```no_run
use artifact_sweep::config::args::build_config_from_args;
use artifact_sweep::config::Command;
use artifact_sweep::storage::azure_devops::Connection;
use artifact_sweep::types::PersonalAccessToken;
use artifact_sweep::ArtifactScanPipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = build_config_from_args([
        "artifact-sweep",
        "scan",
        "--url",
        "https://dev.azure.com/contoso",
        "--project",
        "app",
        "--definition-id",
        "12",
        "--filename-regex",
        r"\.pdb$",
        "--out-csv",
        "pdb.csv",
    ])
    .map_err(anyhow::Error::msg)?;

    let Command::Scan(scan_config) = config.command else {
        unreachable!();
    };

    let token = PersonalAccessToken::new("my-token");
    let connection = Connection::connect(&config.connection, token).await?;
    let pipeline =
        ArtifactScanPipeline::new(scan_config, connection.build_service(), connection.storage());

    for row in pipeline.run().await? {
        println!("{} {}", row.container_id, row.item_path);
    }
    Ok(())
}
```
*/

#![allow(clippy::collapsible_if)]

pub mod config;
pub mod deleter;
pub mod export;
pub mod filters;
pub mod locator;
pub mod pipeline;
pub mod safety;
pub mod scanner;
pub mod storage;
pub mod types;

#[cfg(test)]
mod lib_properties;

pub use config::Config;
pub use config::args::CLIArgs;
pub use deleter::{DeletionConfirmer, DeletionReport, DeletionSummary};
pub use locator::{LocatorSkip, parse_container_locator};
pub use pipeline::ArtifactScanPipeline;
pub use scanner::ContainerScanner;
pub use storage::azure_devops::Connection;
pub use types::error::{SweepError, exit_code_from_error};
