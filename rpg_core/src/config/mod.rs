//! Config - TOML loading helpers and tunable game constants

mod constants;

pub use constants::{
    AiConstants, CombatConstants, EffectConstants, GameConstants, InventoryConstants,
    SkillConstants, WorldConstants,
};

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while loading or validating game data
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid game data: {0}")]
    ValidationError(String),
}

/// Read and deserialize a TOML file
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    parse_toml(&content)
}

/// Deserialize TOML text
pub fn parse_toml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    Ok(toml::from_str(content)?)
}
