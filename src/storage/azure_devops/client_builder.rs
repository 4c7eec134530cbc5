use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

const USER_AGENT: &str = concat!("artifact-sweep/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT_SECONDS: u64 = 30;

/// Build the HTTP client shared by every API handle of a connection.
///
/// Authentication is added per request, so the client itself holds no secret.
pub fn create_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECONDS))
        .build()
        .context("Failed to create HTTP client.")
}
