use std::{
    env,
    fmt::Display,
    fs::read_to_string,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use roster::DEFAULT_DATA_FILE;
use thiserror::Error;
use tracing::{info, warn};

pub const SECRETS_DIR: &str = "/run/secrets";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_file: PathBuf,
    pub apps_script_url: Option<String>,
    pub api_key: Option<String>,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok(), Path::new(SECRETS_DIR))
    }

    /// Builds the config from `lookup` instead of the process environment.
    /// `API_KEY` falls back to the file of the same name under `secrets_dir`.
    pub fn from_lookup<F>(lookup: F, secrets_dir: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs: u64 = try_load(&lookup, "UPSTREAM_TIMEOUT_SECS", "30")?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "UPSTREAM_TIMEOUT_SECS",
                value: timeout_secs.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            port: try_load(&lookup, "RUST_PORT", "1111")?,
            data_file: PathBuf::from(
                var(&lookup, "DATA_FILE").unwrap_or_else(|| DEFAULT_DATA_FILE.to_string()),
            ),
            apps_script_url: var(&lookup, "APPS_SCRIPT_URL"),
            api_key: var(&lookup, "API_KEY").or_else(|| read_secret(secrets_dir, "API_KEY")),
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let value = var(lookup, key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

fn read_secret(secrets_dir: &Path, secret_name: &str) -> Option<String> {
    let path = secrets_dir.join(secret_name);

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .map_err(|e| {
            warn!("Failed to read {secret_name} from {}: {e}", path.display());
        })
        .ok()
        .filter(|s| !s.is_empty())
}
