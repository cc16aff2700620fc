use std::{env, num::ParseIntError, path::PathBuf};

use log::warn;
use thiserror::Error;

use crate::{DEFAULT_CHUNK_SIZE, DEFAULT_OUTPUT_DIR};

pub const CHUNK_SIZE_VAR: &str = "FILE_REVERSER_CHUNK_SIZE";
pub const OUTPUT_DIR_VAR: &str = "FILE_REVERSER_OUTPUT_DIR";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("FILE_REVERSER_CHUNK_SIZE is not a number: {0}")]
    ChunkSize(#[from] ParseIntError),
    #[error("FILE_REVERSER_CHUNK_SIZE must be greater than zero")]
    ZeroChunkSize,
    #[error("FILE_REVERSER_OUTPUT_DIR must not be empty")]
    EmptyOutputDir,
}

/// Settings shared by both binaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub chunk_size: usize,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            chunk_size: DEFAULT_CHUNK_SIZE,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl Config {
    /// Reads [`CHUNK_SIZE_VAR`] and [`OUTPUT_DIR_VAR`], falling back to the
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_vars(
            env::var(CHUNK_SIZE_VAR).ok().as_deref(),
            env::var(OUTPUT_DIR_VAR).ok().as_deref(),
        )
    }

    /// Like [`Config::from_env`], but an invalid variable is logged and the
    /// defaults are used instead. For tools that must always run to the end.
    pub fn from_env_or_default() -> Self {
        Config::from_vars_or_default(
            env::var(CHUNK_SIZE_VAR).ok().as_deref(),
            env::var(OUTPUT_DIR_VAR).ok().as_deref(),
        )
    }

    pub fn from_vars_or_default(chunk_size: Option<&str>, output_dir: Option<&str>) -> Self {
        Config::from_vars(chunk_size, output_dir).unwrap_or_else(|err| {
            warn!("ignoring invalid configuration: {err}");
            Config::default()
        })
    }

    pub fn from_vars(
        chunk_size: Option<&str>,
        output_dir: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if let Some(chunk_size) = chunk_size {
            config.chunk_size = chunk_size.trim().parse()?;
            if config.chunk_size == 0 {
                return Err(ConfigError::ZeroChunkSize);
            }
        }
        if let Some(output_dir) = output_dir {
            if output_dir.is_empty() {
                return Err(ConfigError::EmptyOutputDir);
            }
            config.output_dir = PathBuf::from(output_dir);
        }
        Ok(config)
    }
}
