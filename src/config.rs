//! JSON configuration loader.
//!
//! The config file tunes process-wide hashing behavior: the default
//! format for bare salts and the work factors used when synthesizing
//! salts. All fields are optional; an empty object is a valid config.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::format::{self, Format};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(String),
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("unknown format token: {0}")]
    UnknownFormat(String),
}

#[derive(Debug, Deserialize)]
struct RawCryptConfig {
    #[serde(rename = "defaultFormat")]
    default_format: Option<String>,
    #[serde(rename = "bcryptCost")]
    bcrypt_cost: Option<u32>,
    #[serde(rename = "shaCryptRounds")]
    sha_crypt_rounds: Option<u32>,
}

/// Resolved configuration values.
#[derive(Debug)]
pub struct RuntimeConfig {
    pub default_format: Option<Format>,
    pub bcrypt_cost: Option<u32>,
    pub sha_crypt_rounds: Option<u32>,
}

impl RuntimeConfig {
    /// Applies the configured default format to the process, if one is set.
    pub fn apply(&self) {
        if let Some(format) = self.default_format {
            format::set_format(format);
        }
    }
}

/// Loads and resolves the JSON configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<RuntimeConfig, ConfigError> {
    let raw_json = fs::read_to_string(&path).map_err(|e| ConfigError::Io(format!("{e}")))?;
    let raw_config: RawCryptConfig =
        serde_json::from_str(&raw_json).map_err(|e| ConfigError::Parse(format!("{e}")))?;

    let default_format = match raw_config.default_format {
        Some(token) => Some(
            Format::from_token(&token).ok_or(ConfigError::UnknownFormat(token))?,
        ),
        None => None,
    };

    Ok(RuntimeConfig {
        default_format,
        bcrypt_cost: raw_config.bcrypt_cost,
        sha_crypt_rounds: raw_config.sha_crypt_rounds,
    })
}
