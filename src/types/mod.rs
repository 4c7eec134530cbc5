use std::fmt;
use std::fmt::{Debug, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize_derive::{Zeroize, ZeroizeOnDrop};

pub mod error;

/// A build returned by the Build REST API.
///
/// Only the fields needed to label exported rows are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRef {
    pub id: u64,
    pub build_number: String,
    pub queue_time: DateTime<Utc>,
}

/// An artifact attached to a build.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRef {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub resource: Option<ArtifactResource>,
}

/// Where the content of an artifact lives.
///
/// `data` is the resource locator. For file container artifacts it looks like
/// `#/<container id>/drop`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArtifactResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub data: String,
}

impl ArtifactRef {
    pub fn resource_type(&self) -> Option<&str> {
        self.resource.as_ref().map(|r| r.resource_type.as_str())
    }
}

/// A file container and the root path an artifact occupies inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerReference {
    pub container_id: u64,
    pub root_path: String,
}

/// Kind of a file container entry.
///
/// The REST API serializes this either by name (`"file"`, `"folder"`) or by
/// its numeric value (`1` = folder, `2` = file). Both forms are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawContainerItemType")]
pub enum ContainerItemType {
    Folder,
    File,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawContainerItemType {
    Code(u8),
    Name(String),
}

impl TryFrom<RawContainerItemType> for ContainerItemType {
    type Error = String;

    fn try_from(raw: RawContainerItemType) -> Result<Self, Self::Error> {
        match raw {
            RawContainerItemType::Code(1) => Ok(ContainerItemType::Folder),
            RawContainerItemType::Code(2) => Ok(ContainerItemType::File),
            RawContainerItemType::Name(name) if name.eq_ignore_ascii_case("folder") => {
                Ok(ContainerItemType::Folder)
            }
            RawContainerItemType::Name(name) if name.eq_ignore_ascii_case("file") => {
                Ok(ContainerItemType::File)
            }
            RawContainerItemType::Code(code) => Err(format!("unknown container item type: {code}")),
            RawContainerItemType::Name(name) => Err(format!("unknown container item type: {name}")),
        }
    }
}

impl ContainerItemType {
    /// Lowercase label used in the `ItemType` CSV column.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerItemType::Folder => "folder",
            ContainerItemType::File => "file",
        }
    }
}

impl fmt::Display for ContainerItemType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry of a file container as returned by the File Container REST API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerItem {
    pub path: String,
    pub item_type: ContainerItemType,
    #[serde(default)]
    pub file_length: u64,
}

impl ContainerItem {
    pub fn is_file(&self) -> bool {
        self.item_type == ContainerItemType::File
    }

    /// Last `/`-delimited segment of the item path.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }
}

/// One exported row of a scan. Column names are part of the CSV format that
/// the `delete` command reads back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanResultRow {
    #[serde(rename = "Date")]
    pub date: DateTime<Utc>,
    #[serde(rename = "OwningResource")]
    pub owning_resource: String,
    #[serde(rename = "ContainerId")]
    pub container_id: u64,
    #[serde(rename = "ItemPath")]
    pub item_path: String,
    #[serde(rename = "ItemfileLength")]
    pub item_length: u64,
    #[serde(rename = "ItemType")]
    pub item_type: String,
}

impl ScanResultRow {
    pub fn new(build: &BuildRef, reference: &ContainerReference, item: &ContainerItem) -> Self {
        Self {
            date: build.queue_time,
            owning_resource: format!("Build {}", build.build_number),
            container_id: reference.container_id,
            item_path: item.path.clone(),
            item_length: item.file_length,
            item_type: item.item_type.as_str().to_string(),
        }
    }
}

/// A row of an imported CSV file before validation.
///
/// Every column is optional so that hand-edited files produce a validation
/// error naming the offending value instead of a parser error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DeletionCsvRow {
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "OwningResource", default)]
    pub owning_resource: Option<String>,
    #[serde(rename = "ContainerId", default)]
    pub container_id: Option<String>,
    #[serde(rename = "ItemPath", default)]
    pub item_path: Option<String>,
    #[serde(rename = "ItemfileLength", default)]
    pub item_length: Option<String>,
    #[serde(rename = "ItemType", default)]
    pub item_type: Option<String>,
}

/// A validated row of the deletion input.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletionRecord {
    pub date: Option<DateTime<Utc>>,
    pub owning_resource: Option<String>,
    pub container_id: u64,
    pub item_path: String,
    pub item_length: Option<u64>,
    pub item_type: String,
}

impl DeletionRecord {
    /// Case-insensitive comparison of `ItemType` with `file`. Anything else
    /// is handled as a folder.
    pub fn is_file(&self) -> bool {
        self.item_type.eq_ignore_ascii_case(ContainerItemType::File.as_str())
    }
}

impl From<ScanResultRow> for DeletionRecord {
    fn from(row: ScanResultRow) -> Self {
        Self {
            date: Some(row.date),
            owning_resource: Some(row.owning_resource),
            container_id: row.container_id,
            item_path: row.item_path,
            item_length: Some(row.item_length),
            item_type: row.item_type,
        }
    }
}

/// Personal access token used to authenticate against Azure DevOps.
///
/// The token is cleared from memory when dropped and never printed by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PersonalAccessToken {
    token: String,
}

impl PersonalAccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }
}

impl Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersonalAccessToken")
            .field("token", &"** redacted **")
            .finish()
    }
}
