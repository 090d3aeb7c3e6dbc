/*
 * SPDX-FileCopyrightText: 2025 Wavelens UG <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fmt, fs, io};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

const APP_DIR: &str = "roster";
const CONFIG_FILE: &str = "config.toml";
const DEVELOPER_CACHE_FILE: &str = "developers.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find configuration directory")]
    NoConfigDir,
    #[error("Failed to read configuration file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Failed to write configuration file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

#[derive(Clone, Copy, Debug, EnumIter, Hash, Eq, PartialEq)]
pub enum ConfigKey {
    Server,
    AuthToken,
    CacheFile,
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

impl std::str::FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::iter()
            .find(|key| key.to_string() == s.to_lowercase())
            .ok_or_else(|| ConfigError::InvalidKey(s.to_string()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authtoken: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cachefile: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&get_config_file()?)
    }

    /// A missing file yields the empty configuration.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&get_config_file()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(write_err)
    }

    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::Server => self.server.as_deref(),
            ConfigKey::AuthToken => self.authtoken.as_deref(),
            ConfigKey::CacheFile => self.cachefile.as_deref(),
        }
    }

    /// An empty value unsets the key.
    pub fn set(&mut self, key: ConfigKey, value: Option<String>) {
        let value = value.filter(|value| !value.trim().is_empty());

        match key {
            ConfigKey::Server => self.server = value,
            ConfigKey::AuthToken => self.authtoken = value,
            ConfigKey::CacheFile => self.cachefile = value,
        }
    }

    pub fn developer_cache_file(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.cachefile {
            return Ok(PathBuf::from(path));
        }

        let mut cache_dir = dirs::cache_dir().ok_or(ConfigError::NoConfigDir)?;
        cache_dir.push(APP_DIR);
        cache_dir.push(DEVELOPER_CACHE_FILE);
        Ok(cache_dir)
    }
}

fn get_config_file() -> Result<PathBuf, ConfigError> {
    let mut config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    config_dir.push(APP_DIR);
    config_dir.push(CONFIG_FILE);
    Ok(config_dir)
}

/// Backs `roster config <key> [value]`: sets the key when a value is given,
/// otherwise prints it.
pub fn set_get_value(
    key: &str,
    value: Option<String>,
    quiet: bool,
) -> Result<Option<String>, ConfigError> {
    let config_key = match key.parse::<ConfigKey>() {
        Ok(config_key) => config_key,
        Err(e) => {
            if !quiet {
                println!("Valid keys are:");
                for config_key in ConfigKey::iter() {
                    println!("{}", config_key);
                }
            }

            return Err(e);
        }
    };

    let mut config = Config::load()?;

    if let Some(value) = value {
        config.set(config_key, Some(value));
        config.save()?;

        let value = config.get(config_key).map(str::to_string);
        if !quiet {
            match &value {
                Some(value) => println!("{} set to \"{}\"", config_key, value),
                None => println!("{} unset", config_key),
            }
        }

        return Ok(value);
    }

    let value = config.get(config_key).map(str::to_string);
    if !quiet {
        println!("{}", value.as_deref().unwrap_or("[unset]"));
    }

    Ok(value)
}
