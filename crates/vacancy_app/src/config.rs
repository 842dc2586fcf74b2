use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use scrape_logging::scrape_info;
use serde::{Deserialize, Serialize};
use vacancy_engine::{EngineConfig, FetchSettings, OnError};

use crate::cli::ScrapeArgs;

const DEFAULT_CONFIG_FILE: &str = "./vacancy_scout.ron";

/// Error policy as written in the config file and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ErrorPolicy {
    #[default]
    Continue,
    Abort,
}

impl From<ErrorPolicy> for OnError {
    fn from(policy: ErrorPolicy) -> Self {
        match policy {
            ErrorPolicy::Continue => OnError::Continue,
            ErrorPolicy::Abort => OnError::Abort,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub concurrency: usize,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    pub on_error: ErrorPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            output_dir: PathBuf::from("."),
            concurrency: 1,
            request_timeout_secs: fetch.request_timeout.as_secs(),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            user_agent: fetch.user_agent,
            on_error: ErrorPolicy::default(),
        }
    }
}

impl AppConfig {
    /// Reads `explicit` if given, else `./vacancy_scout.ron` when it exists,
    /// else the defaults. A named file that cannot be read is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        scrape_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Command-line values win over file values.
    pub fn apply(&mut self, args: &ScrapeArgs) {
        if let Some(output_dir) = &args.output_dir {
            self.output_dir = output_dir.clone();
        }
        if let Some(concurrency) = args.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(timeout) = args.timeout_secs {
            self.request_timeout_secs = timeout;
        }
        if let Some(user_agent) = &args.user_agent {
            self.user_agent = user_agent.clone();
        }
        if let Some(on_error) = args.on_error {
            self.on_error = on_error;
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            fetch: FetchSettings {
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                connect_timeout: Duration::from_secs(self.connect_timeout_secs),
                user_agent: self.user_agent.clone(),
                ..FetchSettings::default()
            },
            concurrency: self.concurrency,
            on_error: self.on_error.into(),
        }
    }
}
