//! Azure DevOps REST implementation of the build and storage collaborators.
//!
//! All handles created from one [`Connection`] share a single HTTP client and
//! the personal access token, sent as basic auth with an empty user name.

pub mod client_builder;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use urlencoding::encode;

use crate::config::{AgeWindow, ConnectionConfig};
use crate::storage::{BuildService, BuildServiceTrait, Storage, StorageTrait};
use crate::types::error::SweepError;
use crate::types::{ArtifactRef, BuildRef, ContainerItem, PersonalAccessToken};

const BUILD_API_VERSION: &str = "6.0";
const FILE_CONTAINER_API_VERSION: &str = "5.0-preview";
const CONNECTION_DATA_API_VERSION: &str = "5.0-preview";

#[derive(Deserialize)]
struct ListResponse<T> {
    value: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionData {
    authenticated_user: Option<Identity>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Identity {
    provider_display_name: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

/// An authenticated session against one organization or collection.
#[derive(Clone, Debug)]
pub struct Connection {
    api: ApiClient,
}

impl Connection {
    /// Verify the organization URL and token with a `connectionData` request.
    pub async fn connect(config: &ConnectionConfig, token: PersonalAccessToken) -> Result<Self> {
        let api = ApiClient {
            client: Arc::new(client_builder::create_client()?),
            base_url: config.url.trim_end_matches('/').to_string(),
            token: Arc::new(token),
        };

        debug!(url = %api.base_url, "connecting to Azure DevOps.");
        let connection_data: ConnectionData = api
            .get_json(
                &api.url("_apis/connectionData"),
                &[("api-version", CONNECTION_DATA_API_VERSION.to_string())],
            )
            .await
            .context("Failed to connect to Azure DevOps.")?;

        let user = connection_data
            .authenticated_user
            .and_then(|identity| identity.provider_display_name)
            .unwrap_or_default();
        debug!(url = %api.base_url, user = %user, "connected to Azure DevOps.");

        Ok(Self { api })
    }

    pub fn build_service(&self) -> BuildService {
        Box::new(AzureDevOpsBuildService {
            api: self.api.clone(),
        })
    }

    pub fn storage(&self) -> Storage {
        Box::new(FileContainerStorage {
            api: self.api.clone(),
        })
    }
}

#[derive(Clone, Debug)]
struct ApiClient {
    client: Arc<Client>,
    base_url: String,
    token: Arc<PersonalAccessToken>,
}

impl ApiClient {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, method: Method, url: &str, query: &[(&str, String)]) -> Result<Response> {
        trace!(method = %method, url = url, "sending request.");

        let response = self
            .client
            .request(method.clone(), url)
            .basic_auth("", Some(self.token.as_str()))
            .query(query)
            .send()
            .await
            .map_err(|e| anyhow!(SweepError::Api(format!("{method} {url} failed: {e}"))))?;

        check_status(&method, url, response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, String)]) -> Result<T> {
        self.send(Method::GET, url, query)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse response of GET {url} as JSON."))
    }
}

/// Turn a non-success status into `SweepError::Api`.
///
/// Azure DevOps answers requests with a rejected token by `203` and an HTML
/// sign-in page, so `203` is treated as an authentication failure.
async fn check_status(method: &Method, url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() && status != StatusCode::NON_AUTHORITATIVE_INFORMATION {
        return Ok(response);
    }

    let message = if status == StatusCode::NON_AUTHORITATIVE_INFORMATION {
        "authentication failed, check the personal access token".to_string()
    } else {
        let body = response.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or(body)
    };

    debug!(
        method = %method,
        url = url,
        status = status.as_u16(),
        "Azure DevOps API call failed: {message}"
    );
    Err(anyhow!(SweepError::Api(format!(
        "{method} {url} returned {status}: {message}"
    ))))
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Build REST API.
#[derive(Clone)]
struct AzureDevOpsBuildService {
    api: ApiClient,
}

#[async_trait]
impl BuildServiceTrait for AzureDevOpsBuildService {
    async fn list_builds(
        &self,
        project: &str,
        definition_id: u32,
        age_window: &AgeWindow,
    ) -> Result<Vec<BuildRef>> {
        let url = self
            .api
            .url(&format!("{}/_apis/build/builds", encode(project)));

        let mut query = vec![
            ("definitions", definition_id.to_string()),
            ("api-version", BUILD_API_VERSION.to_string()),
        ];
        if let Some(min_time) = age_window.min_time {
            query.push(("minTime", format_time(&min_time)));
        }
        if let Some(max_time) = age_window.max_time {
            query.push(("maxTime", format_time(&max_time)));
        }

        let response: ListResponse<BuildRef> = self.api.get_json(&url, &query).await?;
        Ok(response.value)
    }

    async fn list_artifacts(&self, build_id: u64, project: &str) -> Result<Vec<ArtifactRef>> {
        let url = self.api.url(&format!(
            "{}/_apis/build/builds/{build_id}/artifacts",
            encode(project)
        ));

        let response: ListResponse<ArtifactRef> = self
            .api
            .get_json(&url, &[("api-version", BUILD_API_VERSION.to_string())])
            .await?;
        Ok(response.value)
    }
}

/// File Container REST API.
#[derive(Clone)]
struct FileContainerStorage {
    api: ApiClient,
}

impl FileContainerStorage {
    fn container_url(&self, container_id: u64) -> String {
        self.api
            .url(&format!("_apis/resources/Containers/{container_id}"))
    }
}

#[async_trait]
impl StorageTrait for FileContainerStorage {
    async fn list_items(&self, container_id: u64, root_path: &str) -> Result<Vec<ContainerItem>> {
        let query = [
            ("itemPath", root_path.to_string()),
            ("api-version", FILE_CONTAINER_API_VERSION.to_string()),
        ];

        let response: ListResponse<ContainerItem> = self
            .api
            .get_json(&self.container_url(container_id), &query)
            .await?;
        Ok(response.value)
    }

    async fn delete_item(&self, container_id: u64, item_path: &str) -> Result<()> {
        let query = [
            ("itemPath", item_path.to_string()),
            ("api-version", FILE_CONTAINER_API_VERSION.to_string()),
        ];

        self.api
            .send(Method::DELETE, &self.container_url(container_id), &query)
            .await?;
        Ok(())
    }
}
