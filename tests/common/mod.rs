//! Shared integration test infrastructure for artifact-sweep.
//!
//! Provides `TestHelper`, which runs a local mock of the Azure DevOps REST
//! endpoints used by the scan and the deletion, and a scripted prompt handler.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{Value, json};

use artifact_sweep::Connection;
use artifact_sweep::config::ConnectionConfig;
use artifact_sweep::safety::PromptHandler;
use artifact_sweep::types::PersonalAccessToken;

pub const PROJECT: &str = "app";
pub const TOKEN: &str = "test-token";

/// `Basic base64(":test-token")`
pub const BASIC_AUTH: &str = "Basic OnRlc3QtdG9rZW4=";

pub struct TestHelper {
    pub server: ServerGuard,
    connection_mock: Mock,
}

impl TestHelper {
    /// Start a mock organization that accepts [`TOKEN`].
    pub async fn new() -> Self {
        let mut server = Server::new_async().await;
        let connection_mock = server
            .mock("GET", "/_apis/connectionData")
            .match_query(Matcher::Any)
            .match_header("authorization", BASIC_AUTH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"authenticatedUser": {"providerDisplayName": "Test User"}}).to_string(),
            )
            .create_async()
            .await;

        Self {
            server,
            connection_mock,
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            url: self.url(),
            pat: Some(PersonalAccessToken::new(TOKEN)),
        }
    }

    pub async fn connect(&self) -> Connection {
        Connection::connect(&self.connection_config(), PersonalAccessToken::new(TOKEN))
            .await
            .unwrap()
    }

    async fn mock_list(&mut self, path: &str, query: Matcher, value: Value) -> Mock {
        self.server
            .mock("GET", path)
            .match_query(query)
            .match_header("authorization", BASIC_AUTH)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"count": value.as_array().map_or(0, Vec::len), "value": value}).to_string())
            .create_async()
            .await
    }

    pub async fn mock_builds(&mut self, definition_id: u32, builds: Value) -> Mock {
        self.mock_list(
            &format!("/{PROJECT}/_apis/build/builds"),
            Matcher::UrlEncoded("definitions".into(), definition_id.to_string()),
            builds,
        )
        .await
    }

    pub async fn mock_artifacts(&mut self, build_id: u64, artifacts: Value) -> Mock {
        self.mock_list(
            &format!("/{PROJECT}/_apis/build/builds/{build_id}/artifacts"),
            Matcher::Any,
            artifacts,
        )
        .await
    }

    pub async fn mock_container(&mut self, container_id: u64, items: Value) -> Mock {
        self.mock_list(
            &format!("/_apis/resources/Containers/{container_id}"),
            Matcher::UrlEncoded("itemPath".into(), "drop".into()),
            items,
        )
        .await
    }

    pub async fn mock_missing_container(&mut self, container_id: u64) -> Mock {
        self.server
            .mock("GET", format!("/_apis/resources/Containers/{container_id}").as_str())
            .match_query(Matcher::Any)
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(
                json!({"message": format!("The container {container_id} could not be found.")})
                    .to_string(),
            )
            .create_async()
            .await
    }

    /// Expect exactly `hits` deletions of one item.
    pub async fn mock_delete(&mut self, container_id: u64, item_path: &str, hits: usize) -> Mock {
        self.server
            .mock("DELETE", format!("/_apis/resources/Containers/{container_id}").as_str())
            .match_query(Matcher::UrlEncoded("itemPath".into(), item_path.into()))
            .match_header("authorization", BASIC_AUTH)
            .with_status(200)
            .expect(hits)
            .create_async()
            .await
    }

    /// Match any deletion, for asserting that none happens.
    pub async fn mock_any_delete(&mut self) -> Mock {
        self.server
            .mock("DELETE", Matcher::Any)
            .with_status(200)
            .expect(0)
            .create_async()
            .await
    }

    pub async fn assert_connected(&self) {
        self.connection_mock.assert_async().await;
    }
}

/// Fresh path in a per-test temp directory.
pub fn temp_csv_path(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("artifact_sweep_integration")
        .join(test_name);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("items.csv");
    let _ = std::fs::remove_file(&path);
    path
}

/// Prompt handler answering from a fixed script, recording every prompt.
pub struct ScriptedPromptHandler {
    responses: Mutex<VecDeque<String>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPromptHandler {
    pub fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        self.prompts.clone()
    }
}

impl PromptHandler for ScriptedPromptHandler {
    fn read_line(&self, prompt: &str) -> Result<Option<String>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.responses.lock().unwrap().pop_front())
    }
}
