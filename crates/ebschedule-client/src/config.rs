use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Where and how to reach the scheduling service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the service. Takes precedence over `region`.
    pub endpoint: Option<String>,
    /// Region used to derive the endpoint when none is given.
    pub region: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            region: None,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The service base URL without a trailing slash.
    pub fn base_url(&self) -> ClientResult<String> {
        if let Some(endpoint) = &self.endpoint {
            return Ok(endpoint.trim_end_matches('/').to_string());
        }
        match &self.region {
            Some(region) => Ok(format!("https://scheduler.{region}.amazonaws.com")),
            None => Err(ClientError::InvalidRequest(
                "no endpoint or region configured".to_string(),
            )),
        }
    }
}
