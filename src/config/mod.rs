mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use tracing::debug;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

pub async fn load() -> Result<Config> {
    match env::var("CONFIG_PATH") {
        Ok(config_path) => load_from(&config_path).await,
        Err(_) => {
            if Path::new(DEFAULT_CONFIG_PATH).exists() {
                load_from(DEFAULT_CONFIG_PATH).await
            } else {
                debug!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
                Ok(Config::default())
            }
        }
    }
}

pub async fn load_from(config_path: impl AsRef<Path>) -> Result<Config> {
    let config_path = config_path.as_ref();
    debug!("Loading configuration from: {}", config_path.display());

    let config_str = tokio::fs::read_to_string(config_path).await?;
    parse(&config_str)
}

pub fn parse(config_str: &str) -> Result<Config> {
    let config: Config = serde_yaml::from_str(config_str)?;

    if config.model.paths.is_empty() {
        return Err(Error::config("model.paths must list at least one location"));
    }

    Ok(config)
}
