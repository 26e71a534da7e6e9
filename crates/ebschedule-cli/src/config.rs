use std::path::Path;

use anyhow::Context;
use ebschedule_client::ClientConfig;
use ebschedule_diff::NormalizeConfig;
use serde::Deserialize;

/// Settings loaded from the optional `--config` TOML file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub client: ClientConfig,
    pub normalize: NormalizeConfig,
}

impl FileConfig {
    /// Load the file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
    }

    /// Command-line values take precedence over the file.
    pub fn with_overrides(mut self, endpoint: Option<String>, region: Option<String>) -> Self {
        if endpoint.is_some() {
            self.client.endpoint = endpoint;
        }
        if region.is_some() {
            self.client.region = region;
        }
        self
    }
}
