//! HTTP client construction for release downloads

use al_core::config::release::{HTTP_TIMEOUT, USER_AGENT};
use al_core::{DispatchError, Result};
use reqwest::blocking::Client;
use std::time::Duration;

/// Builds the blocking client used for release requests
pub fn build_client() -> Result<Client> {
    build_client_with_timeout(HTTP_TIMEOUT)
}

/// Builds a blocking client with an explicit timeout
pub fn build_client_with_timeout(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| DispatchError::HttpClient(e.to_string()))
}
