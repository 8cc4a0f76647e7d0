//! Configuration file loading (JSON format).
//!
//! Both the settings file and the language file are created with their
//! defaults on first run, so a fresh install only has to fill in the
//! token and channel.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::common::error::ConfigError;
use crate::config::lang::Lang;
use crate::config::types::Config;

/// Load the settings file, writing defaults if it does not exist yet.
pub fn load_or_create_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let (config, created) = load_or_create(path.as_ref())?;
    if created {
        warn!("Default configuration file created at {}", path.as_ref().display());
    }
    Ok(config)
}

/// Load the language file, writing defaults if it does not exist yet.
pub fn load_or_create_lang(path: impl AsRef<Path>) -> Result<Lang, ConfigError> {
    let (lang, created) = load_or_create(path.as_ref())?;
    if created {
        warn!("Default language file created at {}", path.as_ref().display());
    }
    Ok(lang)
}

fn load_or_create<T>(path: &Path) -> Result<(T, bool), ConfigError>
where
    T: Default + Serialize + DeserializeOwned,
{
    match fs::read_to_string(path) {
        Ok(content) => {
            let value = serde_json::from_str(&content).map_err(|source| {
                ConfigError::ParseError {
                    path: path.display().to_string(),
                    source,
                }
            })?;
            Ok((value, false))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let value = T::default();
            write_pretty(path, &value)?;
            Ok((value, true))
        }
        Err(source) => Err(ConfigError::IoError {
            path: path.display().to_string(),
            source,
        }),
    }
}

fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let write_error = |source| ConfigError::WriteError {
        path: path.display().to_string(),
        source,
    };

    // Serializing plain structs of strings, bools and floats cannot fail.
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| write_error(std::io::Error::new(ErrorKind::InvalidData, e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    fs::write(path, json + "\n").map_err(write_error)
}
