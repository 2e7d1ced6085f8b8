use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_URL: &str = "http://localhost:8080";
pub const DEFAULT_NOTIFY: &str = "blackhole";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PromsaintConfig {
    pub url: String,
    pub notify: String,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct Config {
    promsaint: PromsaintConfig,
}

impl PromsaintConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config.promsaint)
    }

    /// Applies values given on the command line over the loaded ones.
    pub fn with_overrides(
        mut self,
        url: Option<&str>,
        notify: Option<&str>,
        log_file: Option<&Path>,
    ) -> Self {
        if let Some(url) = url {
            self.url = url.to_string();
        }
        if let Some(notify) = notify {
            self.notify = notify.to_string();
        }
        if let Some(log_file) = log_file {
            self.log_file = Some(log_file.to_path_buf());
        }
        self
    }
}

impl Default for PromsaintConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            notify: DEFAULT_NOTIFY.to_string(),
            log_file: None,
        }
    }
}
